use crate::db::models::Record;
use crate::db::schema::{create_table_sql, quote_ident};
use sqlx::mysql::MySqlQueryResult;
use sqlx::{MySql, MySqlConnection};

pub type MySqlResult = MySqlQueryResult;

/// Statements for one record table. Holds no connection; callers lend one.
#[derive(Debug, Clone)]
pub struct RecordStorage {
    table: String,
    quoted: String,
}

impl RecordStorage {
    pub fn new(table: impl Into<String>) -> Self {
        let table = table.into();
        let quoted = quote_ident(&table);
        Self { table, quoted }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub async fn create_table(
        &self,
        conn: &mut MySqlConnection,
    ) -> Result<MySqlResult, sqlx::Error> {
        sqlx::query(&create_table_sql(&self.table))
            .execute(&mut *conn)
            .await
    }

    pub async fn insert(
        &self,
        conn: &mut MySqlConnection,
        record: &Record,
    ) -> Result<MySqlResult, sqlx::Error> {
        let sql = format!("INSERT INTO {} (`ID`, `data`) VALUES (?, ?)", self.quoted);
        sqlx::query(&sql)
            .bind(&record.id)
            .bind(record.data)
            .execute(&mut *conn)
            .await
    }

    pub async fn select_one(
        &self,
        conn: &mut MySqlConnection,
        id: &str,
    ) -> Result<Option<Record>, sqlx::Error> {
        let sql = format!("SELECT * FROM {} WHERE `ID` = ?", self.quoted);
        sqlx::query_as::<MySql, Record>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
    }

    pub async fn update(
        &self,
        conn: &mut MySqlConnection,
        record: &Record,
    ) -> Result<MySqlResult, sqlx::Error> {
        let sql = format!("UPDATE {} SET `data` = ? WHERE `ID` = ?", self.quoted);
        sqlx::query(&sql)
            .bind(record.data)
            .bind(&record.id)
            .execute(&mut *conn)
            .await
    }

    pub async fn delete(
        &self,
        conn: &mut MySqlConnection,
        id: &str,
    ) -> Result<MySqlResult, sqlx::Error> {
        let sql = format!("DELETE FROM {} WHERE `ID` = ?", self.quoted);
        sqlx::query(&sql).bind(id).execute(&mut *conn).await
    }

    pub async fn select_all(&self, conn: &mut MySqlConnection) -> Result<Vec<Record>, sqlx::Error> {
        let sql = format!("SELECT * FROM {}", self.quoted);
        sqlx::query_as::<MySql, Record>(&sql)
            .fetch_all(&mut *conn)
            .await
    }

    pub async fn drop_table(&self, conn: &mut MySqlConnection) -> Result<MySqlResult, sqlx::Error> {
        let sql = format!("DROP TABLE {}", self.quoted);
        sqlx::query(&sql).execute(&mut *conn).await
    }
}
