use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One `(ID, data)` row. Serialized with the column names used by the table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Record {
    #[serde(rename = "ID")]
    #[sqlx(rename = "ID")]
    pub id: String,
    pub data: i32,
}

impl Record {
    pub fn new(id: impl Into<String>, data: i32) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_column_names() {
        let rec = Record::new("alice", 100);
        let json = serde_json::to_string(&rec).unwrap();
        assert_eq!(json, r#"{"ID":"alice","data":100}"#);

        let back: Record = serde_json::from_str(r#"{"ID":"bob","data":-5}"#).unwrap();
        assert_eq!(back, Record::new("bob", -5));
    }
}
