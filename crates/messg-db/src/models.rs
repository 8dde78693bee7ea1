/// Database row types — these map directly to SQLite rows.
/// Distinct from messg-types wire models to keep the DB layer independent.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRow {
    pub id: i64,
    /// Nullable in the schema; rows written through the API always carry text.
    pub text: Option<String>,
    pub counter: i64,
}

impl From<MessageRow> for messg_types::models::Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            counter: row.counter,
            text: row.text.unwrap_or_default(),
        }
    }
}
