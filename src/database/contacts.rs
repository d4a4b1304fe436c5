//! Contact directory: display name to chat id

use anyhow::Result;
use sqlite::{State, Statement};

use super::Database;

/// A chat identity addressable by display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub chat_id: i64,
    pub name: String,
}

impl Contact {
    fn from_row(statement: &Statement<'_>) -> Result<Self> {
        Ok(Contact {
            chat_id: statement.read("chat_id")?,
            name: statement.read("name")?,
        })
    }
}

impl Database {
    /// Insert or overwrite the name for `chat_id` (last write wins)
    pub async fn upsert_contact(&self, chat_id: i64, name: &str) -> Result<()> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(
            "INSERT INTO contacts (chat_id, name) VALUES (?, ?)
             ON CONFLICT(chat_id) DO UPDATE SET name = excluded.name",
        )?;
        statement.bind((1, chat_id))?;
        statement.bind((2, name))?;
        while statement.next()? != State::Done {}
        Ok(())
    }

    /// Case-insensitive exact name lookup.
    ///
    /// Several chats may register the same name; the lowest chat id wins.
    /// Matching happens here rather than in SQL because sqlite's `lower()`
    /// only folds ASCII.
    pub async fn find_contact_by_name(&self, name: &str) -> Result<Option<Contact>> {
        let needle = name.trim().to_lowercase();
        let contacts = self.all_contacts("ORDER BY chat_id").await?;
        Ok(contacts
            .into_iter()
            .find(|contact| contact.name.to_lowercase() == needle))
    }

    pub async fn get_contact(&self, chat_id: i64) -> Result<Option<Contact>> {
        let connection = self.connection.lock().await;
        let mut statement =
            connection.prepare("SELECT chat_id, name FROM contacts WHERE chat_id = ?")?;
        statement.bind((1, chat_id))?;
        match statement.next()? {
            State::Row => Ok(Some(Contact::from_row(&statement)?)),
            State::Done => Ok(None),
        }
    }

    /// All contacts ordered case-insensitively by name
    pub async fn list_contacts(&self) -> Result<Vec<Contact>> {
        let mut contacts = self.all_contacts("").await?;
        contacts.sort_by_cached_key(|contact| (contact.name.to_lowercase(), contact.chat_id));
        Ok(contacts)
    }

    async fn all_contacts(&self, order: &str) -> Result<Vec<Contact>> {
        let connection = self.connection.lock().await;
        let mut statement = connection.prepare(format!("SELECT chat_id, name FROM contacts {order}"))?;
        let mut contacts = Vec::new();
        while let State::Row = statement.next()? {
            contacts.push(Contact::from_row(&statement)?);
        }
        Ok(contacts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_and_find_case_insensitive() {
        let db = Database::in_memory().unwrap();
        db.upsert_contact(100, "Ivan").await.unwrap();

        let found = db.find_contact_by_name("iVAN").await.unwrap();
        assert_eq!(
            found,
            Some(Contact {
                chat_id: 100,
                name: "Ivan".to_string()
            })
        );
        assert!(db.find_contact_by_name("Iva").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_keeps_latest_name_only() {
        let db = Database::in_memory().unwrap();
        db.upsert_contact(100, "Ivan").await.unwrap();
        db.upsert_contact(100, "Vanya").await.unwrap();

        assert!(db.find_contact_by_name("Ivan").await.unwrap().is_none());
        assert_eq!(
            db.find_contact_by_name("vanya").await.unwrap().map(|c| c.chat_id),
            Some(100)
        );
        assert_eq!(db.list_contacts().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_names_pick_lowest_chat_id() {
        let db = Database::in_memory().unwrap();
        db.upsert_contact(300, "Alex").await.unwrap();
        db.upsert_contact(200, "alex").await.unwrap();

        let found = db.find_contact_by_name("ALEX").await.unwrap().unwrap();
        assert_eq!(found.chat_id, 200);
    }

    #[tokio::test]
    async fn test_find_folds_non_ascii_case() {
        let db = Database::in_memory().unwrap();
        db.upsert_contact(7, "Иван").await.unwrap();
        let found = db.find_contact_by_name("иван").await.unwrap();
        assert_eq!(found.map(|c| c.chat_id), Some(7));
    }

    #[tokio::test]
    async fn test_list_contacts_sorted_by_name() {
        let db = Database::in_memory().unwrap();
        db.upsert_contact(1, "bob").await.unwrap();
        db.upsert_contact(2, "Alice").await.unwrap();
        db.upsert_contact(3, "carol").await.unwrap();

        let names: Vec<String> = db
            .list_contacts()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Alice", "bob", "carol"]);
        assert_eq!(db.get_contact(3).await.unwrap().unwrap().name, "carol");
        assert!(db.get_contact(4).await.unwrap().is_none());
    }
}
