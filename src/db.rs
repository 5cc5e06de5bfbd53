use crate::entities::Entity;
use crate::gateway::Gateway;
use crate::paging::{Order, Page, PageRequest};
use crate::schema::SchemaValidator;
use anyhow::{anyhow, Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use std::marker::PhantomData;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// One connection shared by every gateway; each gateway call holds the lock
/// for the duration of its statements.
pub type SharedConnection = Arc<Mutex<Connection>>;

/// Open the document store. `:memory:` gives a private in-memory database.
pub fn open_database(path: &str) -> Result<Connection> {
    let conn = if path == ":memory:" {
        Connection::open_in_memory().context("Failed to open in-memory database")?
    } else {
        let conn = Connection::open(Path::new(path))
            .with_context(|| format!("Failed to open database at {}", path))?;
        // Enable WAL mode for crash recovery
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn
    };

    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // ==========================================================================
    // Documents Table (one row per record, JSON body, any collection)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS documents (
            seq INTEGER PRIMARY KEY AUTOINCREMENT,
            collection TEXT NOT NULL,
            doc_id TEXT NOT NULL,
            body TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            UNIQUE (collection, doc_id)
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection, seq)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// SQLITE GATEWAY
// ============================================================================

/// Document-store gateway for entity type `E`, scoped to `E::COLLECTION`.
pub struct SqliteGateway<E> {
    conn: SharedConnection,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> SqliteGateway<E> {
    pub fn new(conn: SharedConnection) -> Self {
        SqliteGateway {
            conn,
            _entity: PhantomData,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Document store connection lock poisoned"))
    }

    fn decode(body: &str) -> Result<E> {
        serde_json::from_str(body)
            .with_context(|| format!("Failed to decode {} document", E::COLLECTION))
    }
}

/// Build the ORDER BY clause plus the JSON paths it binds, numbered from
/// `?{first_param}`. Undeclared fields would sort every row as null, so they
/// are left out; insertion order breaks ties.
fn order_clause<E: Entity>(sort: &[Order], first_param: usize) -> (String, Vec<String>) {
    let mut terms = Vec::with_capacity(sort.len() + 1);
    let mut paths = Vec::new();

    for order in sort {
        if !SchemaValidator::is_sortable::<E>(&order.field) {
            debug!(entity = E::NAME, field = %order.field, "Ignoring unknown sort field");
            continue;
        }
        let column = if order.field == "id" {
            "doc_id".to_string()
        } else {
            paths.push(format!("$.{}", order.field));
            format!("json_extract(body, ?{})", first_param + paths.len() - 1)
        };
        terms.push(format!("{} {}", column, order.direction.as_sql()));
    }

    terms.push("seq ASC".to_string());
    (terms.join(", "), paths)
}

impl<E: Entity> Gateway<E> for SqliteGateway<E> {
    fn save(&self, mut entity: E) -> Result<E> {
        let id = match entity.id() {
            Some(id) => id.to_string(),
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                entity.set_id(id.clone());
                id
            }
        };

        let body = serde_json::to_string(&entity)
            .with_context(|| format!("Failed to encode {} document", E::COLLECTION))?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO documents (collection, doc_id, body) VALUES (?1, ?2, ?3)
             ON CONFLICT (collection, doc_id)
             DO UPDATE SET body = excluded.body, updated_at = CURRENT_TIMESTAMP",
            params![E::COLLECTION, id, body],
        )
        .with_context(|| format!("Failed to save {} {}", E::NAME, id))?;

        Ok(entity)
    }

    fn find_all(&self, request: &PageRequest) -> Result<Page<E>> {
        let (order_by, paths) = order_clause::<E>(&request.sort, 4);
        let limit = i64::from(request.size);
        let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);

        let mut args: Vec<Value> = vec![
            Value::from(E::COLLECTION.to_string()),
            Value::from(limit),
            Value::from(offset),
        ];
        args.extend(paths.into_iter().map(Value::from));

        let conn = self.lock()?;

        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            params![E::COLLECTION],
            |row| row.get(0),
        )?;

        let sql = format!(
            "SELECT body FROM documents WHERE collection = ?1 ORDER BY {} LIMIT ?2 OFFSET ?3",
            order_by
        );
        let mut stmt = conn.prepare(&sql)?;
        let bodies = stmt
            .query_map(params_from_iter(args), |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let content = bodies
            .iter()
            .map(|body| Self::decode(body))
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(content, request, total.max(0) as u64))
    }

    fn find_by_id(&self, id: &str) -> Result<Option<E>> {
        let conn = self.lock()?;

        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND doc_id = ?2",
                params![E::COLLECTION, id],
                |row| row.get(0),
            )
            .optional()?;

        body.as_deref().map(Self::decode).transpose()
    }

    fn delete_by_id(&self, id: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND doc_id = ?2",
            params![E::COLLECTION, id],
        )
        .with_context(|| format!("Failed to delete {} {}", E::NAME, id))?;
        Ok(())
    }

    fn count(&self) -> Result<u64> {
        let conn = self.lock()?;
        let total: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            params![E::COLLECTION],
            |row| row.get(0),
        )?;
        Ok(total.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CheckingAccount, Customer, Transaction, TransactionKind};
    use crate::paging::Direction;

    fn shared_memory_db() -> SharedConnection {
        Arc::new(Mutex::new(open_database(":memory:").unwrap()))
    }

    fn customer(name: &str, tax_id: &str) -> Customer {
        Customer {
            name: Some(name.to_string()),
            tax_id: Some(tax_id.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_save_assigns_id_and_round_trips() {
        let gateway = SqliteGateway::<Customer>::new(shared_memory_db());

        let saved = gateway.save(customer("AAAAA", "AAAAA")).unwrap();
        let id = saved.id.clone().expect("store should assign an id");
        assert!(!id.is_empty());

        let found = gateway.find_by_id(&id).unwrap().unwrap();
        assert_eq!(found, saved);
        assert_eq!(gateway.count().unwrap(), 1);
    }

    #[test]
    fn test_save_with_id_replaces_in_full() {
        let gateway = SqliteGateway::<Customer>::new(shared_memory_db());
        let mut saved = gateway
            .save(Customer {
                birth_date: chrono::NaiveDate::from_ymd_opt(1970, 1, 1),
                ..customer("AAAAA", "AAAAA")
            })
            .unwrap();

        saved.name = Some("BBBBB".to_string());
        saved.birth_date = None;
        gateway.save(saved.clone()).unwrap();

        let found = gateway.find_by_id(saved.id.as_deref().unwrap()).unwrap().unwrap();
        assert_eq!(found.name.as_deref(), Some("BBBBB"));
        assert_eq!(found.birth_date, None);
        assert_eq!(gateway.count().unwrap(), 1);
    }

    #[test]
    fn test_save_with_unknown_id_upserts() {
        let gateway = SqliteGateway::<CheckingAccount>::new(shared_memory_db());

        let account = CheckingAccount {
            id: Some("caller-chosen".to_string()),
            code: None,
            balance: Some(10.0),
        };
        gateway.save(account.clone()).unwrap();

        assert_eq!(gateway.find_by_id("caller-chosen").unwrap(), Some(account));
    }

    #[test]
    fn test_find_missing_and_delete_missing() {
        let gateway = SqliteGateway::<Transaction>::new(shared_memory_db());

        assert_eq!(gateway.find_by_id("nope").unwrap(), None);
        gateway.delete_by_id("nope").unwrap();
        assert_eq!(gateway.count().unwrap(), 0);
    }

    #[test]
    fn test_delete_removes_record() {
        let gateway = SqliteGateway::<Transaction>::new(shared_memory_db());
        let saved = gateway
            .save(Transaction {
                amount: Some(5.0),
                kind: Some(TransactionKind::Credit),
                ..Default::default()
            })
            .unwrap();
        let id = saved.id.unwrap();

        gateway.delete_by_id(&id).unwrap();

        assert_eq!(gateway.find_by_id(&id).unwrap(), None);
        assert_eq!(gateway.count().unwrap(), 0);
    }

    #[test]
    fn test_collections_are_isolated() {
        let conn = shared_memory_db();
        let customers = SqliteGateway::<Customer>::new(conn.clone());
        let accounts = SqliteGateway::<CheckingAccount>::new(conn);

        let saved = customers.save(customer("AAAAA", "AAAAA")).unwrap();
        accounts
            .save(CheckingAccount {
                balance: Some(0.0),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(customers.count().unwrap(), 1);
        assert_eq!(accounts.count().unwrap(), 1);
        assert_eq!(accounts.find_by_id(saved.id.as_deref().unwrap()).unwrap(), None);
    }

    #[test]
    fn test_find_all_pages_and_sorts() {
        let gateway = SqliteGateway::<Customer>::new(shared_memory_db());
        for name in ["carol", "alice", "bob", "dave", "erin"] {
            gateway.save(customer(name, "000")).unwrap();
        }

        let request = PageRequest::new(0, 2).with_order("name", Direction::Asc);
        let page = gateway.find_all(&request).unwrap();
        let names: Vec<_> = page.content.iter().map(|c| c.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["alice", "bob"]);
        assert_eq!(page.total_elements, 5);
        assert_eq!(page.total_pages(), 3);

        let last = gateway
            .find_all(&PageRequest::new(2, 2).with_order("name", Direction::Asc))
            .unwrap();
        assert_eq!(last.content.len(), 1);
        assert_eq!(last.content[0].name.as_deref(), Some("erin"));
    }

    #[test]
    fn test_find_all_by_id_desc() {
        let gateway = SqliteGateway::<Customer>::new(shared_memory_db());
        for i in 0..4 {
            gateway.save(customer(&format!("c{}", i), "000")).unwrap();
        }

        let page = gateway
            .find_all(&PageRequest::new(0, 10).with_order("id", Direction::Desc))
            .unwrap();
        let ids: Vec<String> = page.content.iter().map(|c| c.id.clone().unwrap()).collect();

        let mut expected = ids.clone();
        expected.sort();
        expected.reverse();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_unsorted_uses_insertion_order() {
        let gateway = SqliteGateway::<Customer>::new(shared_memory_db());
        let first = gateway.save(customer("zed", "1")).unwrap();
        gateway.save(customer("amy", "2")).unwrap();

        // Replacing keeps the original position
        gateway
            .save(Customer {
                name: Some("zeb".to_string()),
                ..first.clone()
            })
            .unwrap();

        let page = gateway.find_all(&PageRequest::new(0, 10)).unwrap();
        let names: Vec<_> = page.content.iter().map(|c| c.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["zeb", "amy"]);
    }

    #[test]
    fn test_unknown_sort_field_keeps_insertion_order() {
        let gateway = SqliteGateway::<Customer>::new(shared_memory_db());
        for name in ["carol", "alice", "bob"] {
            gateway.save(customer(name, "000")).unwrap();
        }

        for field in ["nome", "name) --", "$.name"] {
            let request = PageRequest::new(0, 10).with_order(field, Direction::Desc);
            let page = gateway.find_all(&request).unwrap();
            let names: Vec<_> = page.content.iter().map(|c| c.name.clone().unwrap()).collect();
            assert_eq!(names, vec!["carol", "alice", "bob"], "sort on {:?}", field);
            assert_eq!(page.total_elements, 3);
        }
    }

    #[test]
    fn test_unknown_sort_field_before_known_one() {
        let gateway = SqliteGateway::<Customer>::new(shared_memory_db());
        for name in ["carol", "alice", "bob"] {
            gateway.save(customer(name, "000")).unwrap();
        }

        let request = PageRequest::new(0, 10)
            .with_order("nome", Direction::Asc)
            .with_order("name", Direction::Desc);
        let page = gateway.find_all(&request).unwrap();
        let names: Vec<_> = page.content.iter().map(|c| c.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["carol", "bob", "alice"]);
    }
}
