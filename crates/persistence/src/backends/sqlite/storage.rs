//! RecordStorage implementation for SQLite.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use serde_json::Value;

use crate::core::RecordStorage;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::{Association, Record, Relation, RelationKind, Scope};

use super::SqliteBackend;
use super::backend::BACKEND_NAME;
use super::query_builder::{QueryBuilder, SqlFragment};

/// Maximum number of keys bound into one `IN (...)` list.
const IN_BATCH_SIZE: usize = 500;

fn internal_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::Internal {
        backend_name: BACKEND_NAME.to_string(),
        message,
        source: None,
    })
}

fn serialization_error(message: String) -> StorageError {
    StorageError::Backend(BackendError::SerializationError { message })
}

fn query_error(e: rusqlite::Error) -> StorageError {
    StorageError::Backend(BackendError::QueryError {
        message: e.to_string(),
    })
}

/// Decodes one `(id, data)` row into a record.
fn decode_record(resource_type: &str, id: i64, data: &str) -> StorageResult<Record> {
    let value: Value = serde_json::from_str(data)
        .map_err(|e| serialization_error(format!("Failed to deserialize record: {}", e)))?;

    Record::from_value(resource_type, id, value).ok_or_else(|| {
        serialization_error(format!(
            "Stored document for {}/{} is not a JSON object",
            resource_type, id
        ))
    })
}

/// Runs a `SELECT id, data` fragment and decodes the rows.
fn query_records(
    conn: &Connection,
    resource_type: &str,
    fragment: &SqlFragment,
) -> StorageResult<Vec<Record>> {
    let mut stmt = conn.prepare(&fragment.sql).map_err(query_error)?;

    let rows = stmt
        .query_map(fragment.bound().as_slice(), |row| {
            let id: i64 = row.get(0)?;
            let data: String = row.get(1)?;
            Ok((id, data))
        })
        .map_err(query_error)?;

    let mut records = Vec::new();
    for row in rows {
        let (id, data) = row.map_err(query_error)?;
        records.push(decode_record(resource_type, id, &data)?);
    }
    Ok(records)
}

/// Fetches every record of `resource_type` whose `column` is in `keys`,
/// batching the `IN` list.
fn query_in(
    conn: &Connection,
    resource_type: &str,
    column: &str,
    keys: &BTreeSet<i64>,
) -> StorageResult<Vec<Record>> {
    let keys: Vec<i64> = keys.iter().copied().collect();
    let mut records = Vec::new();
    for chunk in keys.chunks(IN_BATCH_SIZE) {
        let fragment = QueryBuilder::build_in(resource_type, column, chunk);
        records.extend(query_records(conn, resource_type, &fragment)?);
    }
    Ok(records)
}

/// Loads each relation for all records with one batched query per relation.
fn load_associations(
    conn: &Connection,
    records: &mut [Record],
    relations: &[Relation],
) -> StorageResult<()> {
    if records.is_empty() {
        return Ok(());
    }

    for relation in relations {
        match relation.kind() {
            RelationKind::BelongsTo { foreign_key } => {
                let keys: BTreeSet<i64> = records
                    .iter()
                    .filter_map(|r| r.integer_attribute(foreign_key))
                    .collect();

                let targets: HashMap<i64, Record> = if keys.is_empty() {
                    HashMap::new()
                } else {
                    query_in(conn, relation.target(), "id", &keys)?
                        .into_iter()
                        .map(|r| (r.id(), r))
                        .collect()
                };

                for record in records.iter_mut() {
                    let target = record
                        .integer_attribute(foreign_key)
                        .and_then(|key| targets.get(&key))
                        .cloned()
                        .map(Box::new);
                    record.set_association(relation.name(), Association::One(target));
                }
            }
            RelationKind::HasMany { foreign_key } => {
                let keys: BTreeSet<i64> = records.iter().map(Record::id).collect();

                let mut grouped: HashMap<i64, Vec<Record>> = HashMap::new();
                for target in query_in(conn, relation.target(), foreign_key, &keys)? {
                    if let Some(owner) = target.integer_attribute(foreign_key) {
                        grouped.entry(owner).or_default().push(target);
                    }
                }

                for record in records.iter_mut() {
                    let targets = grouped.get(&record.id()).cloned().unwrap_or_default();
                    record.set_association(relation.name(), Association::Many(targets));
                }
            }
        }

        tracing::trace!(
            relation = relation.name(),
            target = relation.target(),
            records = records.len(),
            "Eager loaded relation"
        );
    }

    Ok(())
}

#[async_trait]
impl RecordStorage for SqliteBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn insert(&self, resource_type: &str, attributes: Value) -> StorageResult<Record> {
        let Value::Object(mut attributes) = attributes else {
            return Err(StorageError::InvalidRecord {
                resource_type: resource_type.to_string(),
                message: "attributes must be a JSON object".to_string(),
            });
        };

        let mut conn = self.get_connection()?;
        // Ids come from MAX(id), so hold the write lock from the start
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| internal_error(format!("Failed to begin transaction: {}", e)))?;

        let id: i64 = tx
            .query_row(
                "SELECT COALESCE(MAX(id), 0) + 1 FROM records WHERE resource_type = ?1",
                params![resource_type],
                |row| row.get(0),
            )
            .map_err(query_error)?;

        let now = Utc::now().to_rfc3339();
        let created_at = attributes
            .entry("created_at")
            .or_insert_with(|| Value::String(now.clone()))
            .as_str()
            .unwrap_or(&now)
            .to_string();
        let updated_at = attributes
            .entry("updated_at")
            .or_insert_with(|| Value::String(now.clone()))
            .as_str()
            .unwrap_or(&now)
            .to_string();

        let record = Record::new(resource_type, id, attributes);

        let data = serde_json::to_string(record.attributes())
            .map_err(|e| serialization_error(format!("Failed to serialize record: {}", e)))?;

        tx.execute(
            "INSERT INTO records (resource_type, id, data, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![resource_type, id, data, created_at, updated_at],
        )
        .map_err(|e| internal_error(format!("Failed to insert record: {}", e)))?;

        tx.commit()
            .map_err(|e| internal_error(format!("Failed to commit insert: {}", e)))?;

        Ok(record)
    }

    async fn find(
        &self,
        resource_type: &str,
        id: i64,
        eager: &[Relation],
    ) -> StorageResult<Option<Record>> {
        let conn = self.get_connection()?;

        let data: Option<String> = conn
            .query_row(
                "SELECT data FROM records WHERE resource_type = ?1 AND id = ?2",
                params![resource_type, id],
                |row| row.get(0),
            )
            .optional()
            .map_err(query_error)?;

        let Some(data) = data else {
            return Ok(None);
        };

        let mut records = vec![decode_record(resource_type, id, &data)?];
        load_associations(&conn, &mut records, eager)?;
        Ok(records.pop())
    }

    async fn fetch(&self, scope: &Scope) -> StorageResult<Vec<Record>> {
        let conn = self.get_connection()?;
        let fragment = QueryBuilder::build(scope);

        tracing::debug!(sql = %fragment.sql, params = fragment.params.len(), "Executing scope");

        let mut records = query_records(&conn, scope.resource_type(), &fragment)?;
        load_associations(&conn, &mut records, scope.eager_loads())?;
        Ok(records)
    }

    async fn count(&self, resource_type: &str) -> StorageResult<u64> {
        let conn = self.get_connection()?;
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM records WHERE resource_type = ?1",
                params![resource_type],
                |row| row.get(0),
            )
            .map_err(query_error)?;
        Ok(count as u64)
    }
}
