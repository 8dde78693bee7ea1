use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use messg_db::{Database, MessageRepository};
use messg_types::models::{MAX_TEXT_CHARS, Message};

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Business rules for messages. Every call re-reads the store; nothing is
/// cached between calls.
#[derive(Clone)]
pub struct MessageService {
    db: Arc<Database>,
}

impl MessageService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn list(&self) -> Result<Vec<Message>, MessageError> {
        let rows = self.db.with_conn(|conn| conn.list_all())?;
        Ok(rows.into_iter().map(Message::from).collect())
    }

    /// Fetch a message and count the read.
    pub fn get(&self, id: i64) -> Result<Message, MessageError> {
        let row = self.db.transaction(|tx| {
            let Some(mut row) = tx.find_by_id(id)? else {
                return Ok(None);
            };
            row.counter = row
                .counter
                .checked_add(1)
                .ok_or_else(|| anyhow::anyhow!("Read counter of message {} overflowed", id))?;
            tx.update(&row)?;
            Ok(Some(row))
        })?;

        row.map(Message::from).ok_or(MessageError::NotFound)
    }

    pub fn create(&self, text: &str) -> Result<Message, MessageError> {
        if text.chars().count() > MAX_TEXT_CHARS {
            return Err(MessageError::Validation(format!(
                "ensure text value has at most {} characters",
                MAX_TEXT_CHARS
            )));
        }

        let row = self.db.transaction(|tx| tx.insert(text))?;
        debug!("Created message {}", row.id);
        Ok(row.into())
    }

    /// Overwrite the text and reset the counter. The length bound of
    /// [`MessageService::create`] is intentionally not applied here.
    pub fn replace(&self, id: i64, text: &str) -> Result<Message, MessageError> {
        let row = self.db.transaction(|tx| {
            let Some(mut row) = tx.find_by_id(id)? else {
                return Ok(None);
            };
            row.text = Some(text.to_string());
            row.counter = 0;
            tx.update(&row)?;
            Ok(Some(row))
        })?;

        let row = row.ok_or(MessageError::NotFound)?;
        debug!("Replaced message {}", row.id);
        Ok(row.into())
    }

    pub fn delete(&self, id: i64) -> Result<(), MessageError> {
        if !self.db.transaction(|tx| tx.delete(id))? {
            return Err(MessageError::NotFound);
        }
        debug!("Deleted message {}", id);
        Ok(())
    }
}
