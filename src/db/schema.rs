//! SQL DDL for the record table.
//! The table name is configurable, so statements are built per store.

/// Quote a MySQL identifier with backticks, doubling any embedded backtick.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Schema with:
/// - `ID` VARCHAR(255), unique and required
/// - `data` INT, required
pub fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (ID VARCHAR(255) UNIQUE NOT NULL, data INT NOT NULL)",
        quote_ident(table)
    )
}
