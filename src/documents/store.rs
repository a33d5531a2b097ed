//! SQLite-backed document collections.
//!
//! All collections share one `documents` table; each row holds the JSON body
//! of one document. Field filters compile to `json_extract` expressions, and
//! the secondary indexes are partial expression indexes over the same
//! expressions so the planner can use them.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{types::Value as SqlValue, Connection, ErrorCode, OptionalExtension};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::models::{new_id, Collection, Document};
use crate::core::paths::ensure_parent;
use crate::error::{Result, StatsError};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS documents (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    body TEXT NOT NULL,
    UNIQUE (collection, id)
);
"#;

const INDEX_PREFIX: &str = "doc_idx_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    Asc,
    Desc,
}

/// A secondary index over one or more document fields.
struct IndexSpec {
    name: &'static str,
    collection: Collection,
    fields: &'static [&'static str],
    order: Order,
}

/// Lookup indexes for the fields the REST queries filter and sort on.
const INDEXES: &[IndexSpec] = &[
    IndexSpec {
        name: "teams_team_name",
        collection: Collection::Teams,
        fields: &["team_name"],
        order: Order::Asc,
    },
    IndexSpec {
        name: "matches_date",
        collection: Collection::Matches,
        fields: &["date"],
        order: Order::Asc,
    },
    IndexSpec {
        name: "matches_text_search",
        collection: Collection::Matches,
        fields: &["home_team_name", "away_team_name", "status"],
        order: Order::Asc,
    },
    IndexSpec {
        name: "injuries_text_search",
        collection: Collection::PlayerInjuries,
        fields: &["player_name", "team_name", "status"],
        order: Order::Asc,
    },
    IndexSpec {
        name: "transfers_text_search",
        collection: Collection::PlayerTransfers,
        fields: &["player_name", "from_team_name", "team_name"],
        order: Order::Asc,
    },
    IndexSpec {
        name: "transfers_transfer_date",
        collection: Collection::PlayerTransfers,
        fields: &["transfer_date"],
        order: Order::Desc,
    },
    IndexSpec {
        name: "awards_text_search",
        collection: Collection::Awards,
        fields: &["recipient_name", "award_name"],
        order: Order::Asc,
    },
    IndexSpec {
        name: "awards_season",
        collection: Collection::Awards,
        fields: &["season"],
        order: Order::Asc,
    },
    IndexSpec {
        name: "player_values_player_name",
        collection: Collection::PlayerValues,
        fields: &["player_name"],
        order: Order::Asc,
    },
];

impl IndexSpec {
    fn create_sql(&self) -> String {
        let direction = match self.order {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        };
        let columns = self
            .fields
            .iter()
            .map(|field| format!("{} {}", field_expr(field), direction))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "CREATE INDEX IF NOT EXISTS {}{} ON documents ({}) WHERE collection = '{}'",
            INDEX_PREFIX,
            self.name,
            columns,
            self.collection.name()
        )
    }
}

/// Document query predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Every document in the collection.
    All,
    /// Field equals value; `Value::Null` also matches a missing field.
    Eq(String, Value),
    /// Field is present and not null.
    NotNull(String),
    Or(Vec<Filter>),
    And(Vec<Filter>),
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq(field.into(), value.into())
    }

    pub fn not_null(field: impl Into<String>) -> Self {
        Filter::NotNull(field.into())
    }

    fn to_sql(&self, params: &mut Vec<SqlValue>) -> Result<String> {
        match self {
            Filter::All => Ok("1 = 1".to_string()),
            Filter::Eq(field, value) => {
                validate_field(field)?;
                let expr = field_expr(field);
                match value {
                    Value::Null => Ok(format!("{} IS NULL", expr)),
                    Value::Bool(b) => {
                        params.push(SqlValue::Integer(i64::from(*b)));
                        Ok(format!("{} = ?", expr))
                    }
                    Value::Number(n) => {
                        params.push(match n.as_i64() {
                            Some(i) => SqlValue::Integer(i),
                            None => SqlValue::Real(n.as_f64().unwrap_or(f64::NAN)),
                        });
                        Ok(format!("{} = ?", expr))
                    }
                    Value::String(s) => {
                        params.push(SqlValue::Text(s.clone()));
                        Ok(format!("{} = ?", expr))
                    }
                    Value::Array(_) | Value::Object(_) => {
                        params.push(SqlValue::Text(value.to_string()));
                        Ok(format!("{} = json(?)", expr))
                    }
                }
            }
            Filter::NotNull(field) => {
                validate_field(field)?;
                Ok(format!("{} IS NOT NULL", field_expr(field)))
            }
            Filter::Or(filters) => combine(filters, " OR ", "1 = 0", params),
            Filter::And(filters) => combine(filters, " AND ", "1 = 1", params),
        }
    }
}

fn combine(
    filters: &[Filter],
    joiner: &str,
    empty: &str,
    params: &mut Vec<SqlValue>,
) -> Result<String> {
    if filters.is_empty() {
        return Ok(empty.to_string());
    }
    let parts = filters
        .iter()
        .map(|f| f.to_sql(params).map(|sql| format!("({})", sql)))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(joiner))
}

/// Field names are spliced into SQL, so only plain identifiers are allowed.
fn validate_field(field: &str) -> Result<()> {
    let mut chars = field.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StatsError::invalid("field", format!("'{}' is not a valid field name", field)))
    }
}

fn field_expr(field: &str) -> String {
    format!("json_extract(body, '$.{}')", field)
}

/// Thread-safe handle on the document database.
#[derive(Clone)]
pub struct DocumentStore {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl DocumentStore {
    /// Open or create the store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        ensure_parent(path)?;
        info!(path = %path.display(), "opening document store");
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open an in-memory store (for testing)
    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Drop every secondary index and build them again.
    pub fn create_indexes(&self) -> Result<()> {
        let conn = self.conn.lock()?;

        let existing = {
            let mut stmt = conn.prepare(
                "SELECT name FROM sqlite_master WHERE type = 'index' AND name LIKE ?",
            )?;
            let names = stmt
                .query_map([format!("{}%", INDEX_PREFIX)], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            names
        };
        for name in &existing {
            if let Err(e) = conn.execute(&format!("DROP INDEX IF EXISTS {}", name), []) {
                warn!(index = %name, error = %e, "failed to drop index");
            }
        }
        debug!(dropped = existing.len(), "dropped document indexes");

        for index in INDEXES {
            conn.execute(&index.create_sql(), [])?;
        }
        info!(count = INDEXES.len(), "document indexes created");
        Ok(())
    }

    /// Names of the secondary indexes currently present.
    pub fn index_names(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'index' AND name LIKE ? ORDER BY name",
        )?;
        let names = stmt
            .query_map([format!("{}%", INDEX_PREFIX)], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(names
            .into_iter()
            .map(|n| n.trim_start_matches(INDEX_PREFIX).to_string())
            .collect())
    }

    /// Insert a raw JSON object, assigning `_id` when missing, and return
    /// the stored document.
    pub fn insert_value(&self, collection: Collection, document: Value) -> Result<Value> {
        let mut object: Map<String, Value> = match document {
            Value::Object(map) => map,
            other => {
                return Err(StatsError::invalid(
                    "document",
                    format!("expected a JSON object, got {}", json_kind(&other)),
                ))
            }
        };

        let id = match object.get("_id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Null) | None => {
                let id = new_id();
                object.insert("_id".to_string(), Value::String(id.clone()));
                id
            }
            Some(other) => other.to_string(),
        };
        let body = Value::Object(object);

        {
            let conn = self.conn.lock()?;
            conn.execute(
                "INSERT INTO documents (collection, id, body) VALUES (?, ?, ?)",
                (collection.name(), &id, body.to_string()),
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(ref err, _)
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    StatsError::invalid("_id", format!("duplicate id '{}' in {}", id, collection))
                }
                other => StatsError::from(other),
            })?;
        }
        debug!(collection = %collection, id = %id, "document inserted");

        self.find_by_id(collection, &id)?
            .ok_or_else(|| StatsError::Storage {
                message: format!("inserted document {} not readable", id),
            })
    }

    /// Insert a typed document and return it as stored.
    pub fn insert<T: Document>(&self, document: &T) -> Result<T> {
        let stored = self.insert_value(T::COLLECTION, serde_json::to_value(document)?)?;
        Ok(serde_json::from_value(stored)?)
    }

    pub fn find_by_id(&self, collection: Collection, id: &str) -> Result<Option<Value>> {
        let conn = self.conn.lock()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ? AND id = ?",
                (collection.name(), id),
                |row| row.get(0),
            )
            .optional()?;
        body.map(|b| serde_json::from_str(&b).map_err(StatsError::from))
            .transpose()
    }

    /// Matching documents in insertion order.
    pub fn find_values(
        &self,
        collection: Collection,
        filter: &Filter,
        limit: Option<usize>,
    ) -> Result<Vec<Value>> {
        let mut params = Vec::new();
        let predicate = filter.to_sql(&mut params)?;
        let mut sql = format!(
            "SELECT body FROM documents WHERE collection = '{}' AND ({}) ORDER BY seq",
            collection.name(),
            predicate
        );
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare(&sql)?;
        let bodies = stmt
            .query_map(rusqlite::params_from_iter(params), |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        bodies
            .iter()
            .map(|b| serde_json::from_str(b).map_err(StatsError::from))
            .collect()
    }

    pub fn find<T: Document>(&self, filter: &Filter, limit: Option<usize>) -> Result<Vec<T>> {
        self.find_values(T::COLLECTION, filter, limit)?
            .into_iter()
            .map(|v| serde_json::from_value(v).map_err(StatsError::from))
            .collect()
    }

    pub fn find_one<T: Document>(&self, filter: &Filter) -> Result<Option<T>> {
        Ok(self.find(filter, Some(1))?.into_iter().next())
    }

    pub fn count(&self, collection: Collection) -> Result<u64> {
        let conn = self.conn.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?",
            [collection.name()],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Remove every document from one collection.
    pub fn delete_all(&self, collection: Collection) -> Result<usize> {
        let conn = self.conn.lock()?;
        let deleted = conn.execute(
            "DELETE FROM documents WHERE collection = ?",
            [collection.name()],
        )?;
        Ok(deleted)
    }

    /// Remove every document from every collection in one transaction.
    pub fn delete_everything(&self) -> Result<usize> {
        let mut conn = self.conn.lock()?;
        let tx = conn.transaction()?;
        let mut total = 0;
        for collection in Collection::ALL {
            total += tx.execute(
                "DELETE FROM documents WHERE collection = ?",
                [collection.name()],
            )?;
        }
        tx.commit()?;
        info!(deleted = total, "all documents deleted");
        Ok(total)
    }

    /// Run a store operation on tokio's blocking pool so SQLite work never
    /// holds up a runtime worker.
    pub async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&DocumentStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.clone();
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| StatsError::Storage {
                message: format!("store task failed: {}", e),
            })?
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
