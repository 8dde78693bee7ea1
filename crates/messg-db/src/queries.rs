use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::models::MessageRow;

/// Storage operations on the `message` table.
///
/// Implemented for [`Connection`], so the methods are also available on a
/// `rusqlite::Transaction` through deref. Callers that read then write should
/// do so inside [`crate::Database::transaction`].
pub trait MessageRepository {
    fn find_by_id(&self, id: i64) -> Result<Option<MessageRow>>;

    /// Insert a new message with a zero counter and return the stored row.
    fn insert(&self, text: &str) -> Result<MessageRow>;

    /// Overwrite `text` and `counter` of an existing row.
    fn update(&self, row: &MessageRow) -> Result<()>;

    /// Returns `false` when no row had this id.
    fn delete(&self, id: i64) -> Result<bool>;

    /// Every message, in id order.
    fn list_all(&self) -> Result<Vec<MessageRow>>;
}

/// Lookups on the `apikey` table. Keys are compared in canonical text form.
pub trait ApiKeyRepository {
    /// True if at least one row holds `key`.
    fn api_key_exists(&self, key: &str) -> Result<bool>;

    fn insert_api_key(&self, key: &str) -> Result<i64>;

    fn count_api_keys(&self, key: &str) -> Result<usize>;
}

impl MessageRepository for Connection {
    fn find_by_id(&self, id: i64) -> Result<Option<MessageRow>> {
        let mut stmt = self.prepare_cached("SELECT id, text, counter FROM message WHERE id = ?1")?;

        let row = stmt.query_row([id], map_message).optional()?;

        Ok(row)
    }

    fn insert(&self, text: &str) -> Result<MessageRow> {
        self.execute("INSERT INTO message (text, counter) VALUES (?1, 0)", [text])?;

        Ok(MessageRow {
            id: self.last_insert_rowid(),
            text: Some(text.to_string()),
            counter: 0,
        })
    }

    fn update(&self, row: &MessageRow) -> Result<()> {
        let changed = self.execute(
            "UPDATE message SET text = ?1, counter = ?2 WHERE id = ?3",
            rusqlite::params![row.text, row.counter, row.id],
        )?;

        if changed == 0 {
            anyhow::bail!("Message {} vanished during update", row.id);
        }
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<bool> {
        let changed = self.execute("DELETE FROM message WHERE id = ?1", [id])?;
        Ok(changed > 0)
    }

    fn list_all(&self) -> Result<Vec<MessageRow>> {
        let mut stmt = self.prepare_cached("SELECT id, text, counter FROM message ORDER BY id")?;

        let rows = stmt
            .query_map([], map_message)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

impl ApiKeyRepository for Connection {
    fn api_key_exists(&self, key: &str) -> Result<bool> {
        let found = self
            .query_row("SELECT 1 FROM apikey WHERE key = ?1 LIMIT 1", [key], |_| Ok(()))
            .optional()?;

        Ok(found.is_some())
    }

    fn insert_api_key(&self, key: &str) -> Result<i64> {
        self.execute("INSERT INTO apikey (key) VALUES (?1)", [key])?;
        Ok(self.last_insert_rowid())
    }

    fn count_api_keys(&self, key: &str) -> Result<usize> {
        let count: i64 =
            self.query_row("SELECT COUNT(*) FROM apikey WHERE key = ?1", [key], |r| r.get(0))?;
        Ok(count as usize)
    }
}

fn map_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        text: row.get(1)?,
        counter: row.get(2)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    const KEY: &str = "b8fd018e-6be3-11eb-9439-0242ac130002";

    #[test]
    fn insert_assigns_increasing_ids() {
        let db = Database::open_in_memory().unwrap();

        let (a, b) = db
            .transaction(|tx| Ok((tx.insert("first")?, tx.insert("second")?)))
            .unwrap();

        assert!(b.id > a.id);
        assert_eq!(a.counter, 0);
        assert_eq!(a.text.as_deref(), Some("first"));
    }

    #[test]
    fn find_missing_returns_none() {
        let db = Database::open_in_memory().unwrap();
        let found = db.with_conn(|conn| conn.find_by_id(42)).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn update_persists_text_and_counter() {
        let db = Database::open_in_memory().unwrap();
        let mut row = db.transaction(|tx| tx.insert("before")).unwrap();

        row.text = Some("after".into());
        row.counter = 9;
        db.transaction(|tx| tx.update(&row)).unwrap();

        let stored = db.with_conn(|conn| conn.find_by_id(row.id)).unwrap().unwrap();
        assert_eq!(stored, row);
    }

    #[test]
    fn update_of_missing_row_fails() {
        let db = Database::open_in_memory().unwrap();
        let ghost = MessageRow {
            id: 5,
            text: None,
            counter: 0,
        };
        assert!(db.transaction(|tx| tx.update(&ghost)).is_err());
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let db = Database::open_in_memory().unwrap();
        let first = db.transaction(|tx| tx.insert("a")).unwrap();
        assert!(db.transaction(|tx| tx.delete(first.id)).unwrap());
        assert!(!db.transaction(|tx| tx.delete(first.id)).unwrap());

        let second = db.transaction(|tx| tx.insert("b")).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn list_all_is_in_id_order() {
        let db = Database::open_in_memory().unwrap();
        db.transaction(|tx| {
            tx.insert("one")?;
            tx.insert("two")?;
            tx.insert("three")?;
            Ok(())
        })
        .unwrap();

        let texts: Vec<_> = db
            .with_conn(|conn| conn.list_all())
            .unwrap()
            .into_iter()
            .map(|r| r.text.unwrap_or_default())
            .collect();
        assert_eq!(texts, ["one", "two", "three"]);
    }

    #[test]
    fn failed_transaction_rolls_back() {
        let db = Database::open_in_memory().unwrap();

        let result: Result<()> = db.transaction(|tx| {
            tx.insert("doomed")?;
            anyhow::bail!("abort");
        });
        assert!(result.is_err());

        let rows = db.with_conn(|conn| conn.list_all()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn null_text_is_read_back_as_none() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            conn.execute("INSERT INTO message (text) VALUES (NULL)", [])?;
            Ok(())
        })
        .unwrap();

        let rows = db.with_conn(|conn| conn.list_all()).unwrap();
        assert_eq!(rows[0].text, None);
        assert_eq!(messg_types::models::Message::from(rows[0].clone()).text, "");
    }

    #[test]
    fn duplicate_api_keys_still_authorize() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            assert!(!conn.api_key_exists(KEY)?);
            conn.insert_api_key(KEY)?;
            conn.insert_api_key(KEY)?;
            assert!(conn.api_key_exists(KEY)?);
            assert_eq!(conn.count_api_keys(KEY)?, 2);
            Ok(())
        })
        .unwrap();
    }
}
