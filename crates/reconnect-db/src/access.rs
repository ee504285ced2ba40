//! Relational access layer
//!
//! A minimal, uniform interface over the pooled connection: `query`,
//! `query_one`, `insert`, `update`, and `transaction`. Callers never manage
//! connection acquisition or transaction boilerplate themselves, and every
//! failure comes back as a structured [`AccessError`] kind rather than a
//! message to be string-matched.
//!
//! The layer performs no retries and no silent recovery; the store is
//! assumed local and reliable, and every failure is the caller's decision.

use futures::future::BoxFuture;
use sqlx::error::ErrorKind;
use sqlx::query::{Query, QueryAs};
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteQueryResult, SqliteRow};
use sqlx::{Executor, FromRow, Transaction};

use chrono::{DateTime, NaiveDate, Utc};
use reconnect_core::Id;

use crate::pool::Database;

/// Result type for access-layer operations.
pub type AccessResult<T> = Result<T, AccessError>;

/// Which store constraint a statement violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
    NotNull,
    Check,
}

/// Error taxonomy surfaced to callers of the access layer.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// Foreign-key, uniqueness, not-null, or check violation.
    #[error("constraint violation ({kind:?}): {message}")]
    Constraint {
        kind: ConstraintKind,
        message: String,
    },

    /// Raised by callers when zero affected rows means a missing entity.
    /// `query`/`query_one` never produce this; absence is `Ok` there.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: Id },

    /// An insert statement produced no new row identifier.
    #[error("insert returned no identifier: {0}")]
    Insert(String),

    /// Connection, pool, or protocol failure. Fatal to the current request,
    /// never retried here.
    #[error("transport error: {0}")]
    Transport(String),

    /// A row could not be decoded into the caller-supplied record type.
    #[error("failed to decode column {column}: {message}")]
    Decode { column: String, message: String },

    /// Any other store-reported failure.
    #[error("database error: {0}")]
    Database(String),
}

impl AccessError {
    /// Classify an underlying driver error into the structured taxonomy.
    fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) => {
                let message = db.message().to_string();
                let kind = match db.kind() {
                    ErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
                    ErrorKind::ForeignKeyViolation => Some(ConstraintKind::ForeignKey),
                    ErrorKind::NotNullViolation => Some(ConstraintKind::NotNull),
                    ErrorKind::CheckViolation => Some(ConstraintKind::Check),
                    _ => None,
                };
                match kind {
                    Some(kind) => AccessError::Constraint { kind, message },
                    None => AccessError::Database(message),
                }
            }
            sqlx::Error::ColumnNotFound(column) => AccessError::Decode {
                column,
                message: "column not found in result row".to_string(),
            },
            sqlx::Error::ColumnDecode { index, source } => AccessError::Decode {
                column: index,
                message: source.to_string(),
            },
            sqlx::Error::Io(e) => AccessError::Transport(e.to_string()),
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Protocol(_) => AccessError::Transport(err.to_string()),
            other => AccessError::Database(other.to_string()),
        }
    }

    /// Whether this error is a constraint violation of the given kind.
    pub fn is_constraint(&self, kind: ConstraintKind) -> bool {
        matches!(self, AccessError::Constraint { kind: k, .. } if *k == kind)
    }
}

/// A positional statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Bool(bool),
    Blob(Vec<u8>),
    Timestamp(DateTime<Utc>),
    Date(NaiveDate),
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Integer(v as i64)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Real(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&String> for SqlValue {
    fn from(v: &String) -> Self {
        SqlValue::Text(v.clone())
    }
}

impl From<Vec<u8>> for SqlValue {
    fn from(v: Vec<u8>) -> Self {
        SqlValue::Blob(v)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(v: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(value) => value.into(),
            None => SqlValue::Null,
        }
    }
}

/// Build a positional parameter slice for an access-layer call.
#[macro_export]
macro_rules! params {
    () => {
        &[] as &[$crate::access::SqlValue]
    };
    ($($value:expr),+ $(,)?) => {
        &[$($crate::access::SqlValue::from($value)),+] as &[$crate::access::SqlValue]
    };
}

fn bind_query<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in params {
        query = match value {
            SqlValue::Null => query.bind(Option::<i64>::None),
            SqlValue::Integer(v) => query.bind(*v),
            SqlValue::Real(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::Bool(v) => query.bind(*v),
            SqlValue::Blob(v) => query.bind(v.as_slice()),
            SqlValue::Timestamp(v) => query.bind(*v),
            SqlValue::Date(v) => query.bind(*v),
        };
    }
    query
}

fn bind_query_as<'q, T>(
    mut query: QueryAs<'q, Sqlite, T, SqliteArguments<'q>>,
    params: &'q [SqlValue],
) -> QueryAs<'q, Sqlite, T, SqliteArguments<'q>> {
    for value in params {
        query = match value {
            SqlValue::Null => query.bind(Option::<i64>::None),
            SqlValue::Integer(v) => query.bind(*v),
            SqlValue::Real(v) => query.bind(*v),
            SqlValue::Text(v) => query.bind(v.as_str()),
            SqlValue::Bool(v) => query.bind(*v),
            SqlValue::Blob(v) => query.bind(v.as_slice()),
            SqlValue::Timestamp(v) => query.bind(*v),
            SqlValue::Date(v) => query.bind(*v),
        };
    }
    query
}

async fn fetch_all<'e, T, E>(executor: E, sql: &str, params: &[SqlValue]) -> AccessResult<Vec<T>>
where
    E: Executor<'e, Database = Sqlite>,
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    bind_query_as(sqlx::query_as::<Sqlite, T>(sql), params)
        .fetch_all(executor)
        .await
        .map_err(AccessError::from_sqlx)
}

async fn fetch_optional<'e, T, E>(
    executor: E,
    sql: &str,
    params: &[SqlValue],
) -> AccessResult<Option<T>>
where
    E: Executor<'e, Database = Sqlite>,
    T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
{
    bind_query_as(sqlx::query_as::<Sqlite, T>(sql), params)
        .fetch_optional(executor)
        .await
        .map_err(AccessError::from_sqlx)
}

async fn execute<'e, E>(
    executor: E,
    sql: &str,
    params: &[SqlValue],
) -> AccessResult<SqliteQueryResult>
where
    E: Executor<'e, Database = Sqlite>,
{
    bind_query(sqlx::query(sql), params)
        .execute(executor)
        .await
        .map_err(AccessError::from_sqlx)
}

fn insert_id(result: SqliteQueryResult, sql: &str) -> AccessResult<Id> {
    if result.rows_affected() == 0 {
        return Err(AccessError::Insert(format!(
            "statement affected no rows: {sql}"
        )));
    }
    let id = result.last_insert_rowid();
    if id == 0 {
        return Err(AccessError::Insert(format!(
            "store reported no identifier: {sql}"
        )));
    }
    Ok(id)
}

impl Database {
    /// Execute a read statement; zero rows is an empty Vec, never an error.
    pub async fn query<T>(&self, sql: &str, params: &[SqlValue]) -> AccessResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        fetch_all(self.pool(), sql, params).await
    }

    /// Execute a read statement and return the first row, or `None`.
    pub async fn query_one<T>(&self, sql: &str, params: &[SqlValue]) -> AccessResult<Option<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        fetch_optional(self.pool(), sql, params).await
    }

    /// Execute an INSERT expected to create exactly one row and return the
    /// store-assigned identifier.
    pub async fn insert(&self, sql: &str, params: &[SqlValue]) -> AccessResult<Id> {
        let result = execute(self.pool(), sql, params).await?;
        insert_id(result, sql)
    }

    /// Execute an UPDATE or DELETE and return the affected-row count.
    /// Zero is a valid outcome; the caller decides what it means.
    pub async fn update(&self, sql: &str, params: &[SqlValue]) -> AccessResult<u64> {
        let result = execute(self.pool(), sql, params).await?;
        Ok(result.rows_affected())
    }

    /// Run `body` inside a transaction on one borrowed connection.
    ///
    /// Commits when `body` returns `Ok`, rolls back and re-raises when it
    /// returns `Err`. The connection goes back to the pool on every exit
    /// path, and a rollback failure is surfaced to the caller.
    pub async fn transaction<T, F>(&self, body: F) -> AccessResult<T>
    where
        F: for<'t> FnOnce(&'t mut TxHandle) -> BoxFuture<'t, AccessResult<T>>,
        T: Send,
    {
        let tx = self
            .pool()
            .begin()
            .await
            .map_err(AccessError::from_sqlx)?;
        let mut handle = TxHandle { tx };

        match body(&mut handle).await {
            Ok(value) => {
                handle
                    .tx
                    .commit()
                    .await
                    .map_err(AccessError::from_sqlx)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = handle.tx.rollback().await {
                    tracing::error!(
                        error = %err,
                        "transaction body failed and rollback also failed"
                    );
                    return Err(AccessError::from_sqlx(rollback_err));
                }
                Err(err)
            }
        }
    }
}

/// Statement handle passed to a [`Database::transaction`] body.
///
/// Statements run sequentially on the one borrowed connection and are
/// committed or rolled back together.
pub struct TxHandle {
    tx: Transaction<'static, Sqlite>,
}

impl TxHandle {
    pub async fn query<T>(&mut self, sql: &str, params: &[SqlValue]) -> AccessResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        fetch_all(&mut *self.tx, sql, params).await
    }

    pub async fn query_one<T>(&mut self, sql: &str, params: &[SqlValue]) -> AccessResult<Option<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        fetch_optional(&mut *self.tx, sql, params).await
    }

    pub async fn insert(&mut self, sql: &str, params: &[SqlValue]) -> AccessResult<Id> {
        let result = execute(&mut *self.tx, sql, params).await?;
        insert_id(result, sql)
    }

    pub async fn update(&mut self, sql: &str, params: &[SqlValue]) -> AccessResult<u64> {
        let result = execute(&mut *self.tx, sql, params).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn sql_value_conversions() {
        assert_eq!(SqlValue::from(42i64), SqlValue::Integer(42));
        assert_eq!(SqlValue::from(7i32), SqlValue::Integer(7));
        assert_eq!(SqlValue::from("abc"), SqlValue::Text("abc".to_string()));
        assert_eq!(SqlValue::from(true), SqlValue::Bool(true));
        assert_eq!(SqlValue::from(Option::<i64>::None), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(5i64)), SqlValue::Integer(5));
    }

    #[test]
    fn params_macro() {
        let params = params![1i64, "two", Option::<i64>::None];
        assert_eq!(
            params,
            &[
                SqlValue::Integer(1),
                SqlValue::Text("two".to_string()),
                SqlValue::Null,
            ]
        );

        let empty = params![];
        assert!(empty.is_empty());
    }
}
