//! Generic repository contract and its SQLite implementation.
//!
//! Each entity describes its table once through [`Record`]; the single
//! [`SqliteRepository`] then provides the whole [`Repository`] surface for it.
//! Storage errors never reach the caller: writes report `false`, reads report
//! nothing, and the underlying error goes to the log.

use crate::database::Database;
use crate::error::is_missing_table;
use organizer_types::ProjectId;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension, Params, Row};
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, error, warn};

/// Queries shorter than this (after trimming) return no results.
pub const MIN_SEARCH_LEN: usize = 2;

/// Table mapping for one entity type.
pub trait Record: Sized {
    type Id: Copy + fmt::Display;

    const TABLE: &'static str;
    /// Columns in binding order. The first is always the `id` primary key.
    const COLUMNS: &'static [&'static str];
    /// `ORDER BY` body: flagged rows first, then the natural key, then
    /// `created_at ASC` as tie-break.
    const ORDER_BY: &'static str;
    /// Human-readable text columns matched by [`Repository::search`].
    const SEARCH_COLUMNS: &'static [&'static str];

    fn id(&self) -> Self::Id;

    /// Values for [`Self::COLUMNS`], same order.
    fn to_values(&self) -> Vec<Value>;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Records carrying a `project_id` column.
pub trait ProjectScoped: Record {
    fn project_id(&self) -> ProjectId;
}

/// Uniform CRUD and query surface every entity repository offers.
pub trait Repository {
    type Entity;
    type Id;

    /// False on any storage error, including a duplicate id.
    fn insert(&self, entity: &Self::Entity) -> bool;

    /// Full-row replace keyed by id. False when the row does not exist.
    fn update(&self, entity: &Self::Entity) -> bool;

    /// Deleting an id that is not stored still succeeds.
    fn delete(&self, id: &Self::Id) -> bool;

    fn delete_all(&self) -> bool;

    fn fetch_by_id(&self, id: &Self::Id) -> Option<Self::Entity>;

    fn fetch_all(&self) -> Vec<Self::Entity>;

    /// Case-insensitive substring match over the entity's text fields.
    /// Case folding is Unicode-aware.
    fn search(&self, query: &str) -> Vec<Self::Entity>;

    fn count(&self) -> i64;
}

/// Repositories whose rows belong to a project.
pub trait ProjectScopedRepository: Repository {
    fn fetch_by_project_id(&self, project_id: &ProjectId) -> Vec<Self::Entity>;

    fn delete_by_project_id(&self, project_id: &ProjectId) -> bool;
}

/// [`Repository`] over the table described by `R`.
pub struct SqliteRepository<R> {
    db: Database,
    _record: PhantomData<fn() -> R>,
}

impl<R> Clone for SqliteRepository<R> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> fmt::Debug for SqliteRepository<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteRepository")
            .field("table", &R::TABLE)
            .finish()
    }
}

impl<R: Record> SqliteRepository<R> {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            _record: PhantomData,
        }
    }

    fn select_sql() -> String {
        format!("SELECT {} FROM {}", R::COLUMNS.join(", "), R::TABLE)
    }

    /// Rows where `column = value`, in designated order.
    pub(crate) fn fetch_where(&self, op: &'static str, column: &str, value: String) -> Vec<R> {
        let sql = format!(
            "{} WHERE {column} = ?1 ORDER BY {}",
            Self::select_sql(),
            R::ORDER_BY
        );
        self.read_rows(op, &sql, params![value])
    }

    /// Delete rows where `column = value`. A missing table counts as success:
    /// there is nothing in it to orphan.
    pub(crate) fn delete_where(&self, op: &'static str, column: &str, value: String) -> bool {
        let sql = format!("DELETE FROM {} WHERE {column} = ?1", R::TABLE);
        self.write(op, &sql, params![value]).is_some()
    }

    /// Raw `id` values where `column = value`, without decoding rows into
    /// entities. `None` when the read fails; a missing table yields no ids.
    pub(crate) fn fetch_ids_where(
        &self,
        op: &'static str,
        column: &str,
        value: String,
    ) -> Option<Vec<String>> {
        let sql = format!("SELECT id FROM {} WHERE {column} = ?1", R::TABLE);
        let conn = self.db.lock_conn();
        let result = conn.prepare(&sql).and_then(|mut stmt| {
            stmt.query_map(params![value], |row| row.get::<_, String>(0))?
                .collect::<rusqlite::Result<Vec<_>>>()
        });
        match result {
            Ok(ids) => Some(ids),
            Err(e) if is_missing_table(&e) => {
                debug!(table = R::TABLE, op, "Table missing, no ids");
                Some(Vec::new())
            }
            Err(e) => {
                error!(table = R::TABLE, op, error = %e, "Id read failed");
                None
            }
        }
    }

    /// Run a SELECT whose columns are [`Record::COLUMNS`].
    pub(crate) fn read_rows<P: Params>(&self, op: &'static str, sql: &str, params: P) -> Vec<R> {
        self.read_mapped(op, sql, params, R::from_row)
    }

    /// Run a SELECT with a custom row mapper. Unreadable rows are skipped.
    pub(crate) fn read_mapped<T, P, F>(&self, op: &'static str, sql: &str, params: P, map: F) -> Vec<T>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.db.lock_conn();
        let mut stmt = match conn.prepare(sql) {
            Ok(stmt) => stmt,
            Err(e) => {
                log_read_failure(R::TABLE, op, &e);
                return Vec::new();
            }
        };
        let rows = match stmt.query_map(params, map) {
            Ok(rows) => rows,
            Err(e) => {
                log_read_failure(R::TABLE, op, &e);
                return Vec::new();
            }
        };
        let values = rows
            .filter_map(|r| match r {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(table = R::TABLE, op, error = %e, "Skipping unreadable row");
                    None
                }
            })
            .collect();
        values
    }

    /// Single-value query; `None` on error or missing table.
    pub(crate) fn read_scalar<T, P>(&self, op: &'static str, sql: &str, params: P) -> Option<T>
    where
        T: rusqlite::types::FromSql,
        P: Params,
    {
        let conn = self.db.lock_conn();
        match conn.query_row(sql, params, |row| row.get::<_, T>(0)) {
            Ok(value) => Some(value),
            Err(e) => {
                log_read_failure(R::TABLE, op, &e);
                None
            }
        }
    }

    /// Execute a write, returning the number of changed rows. `None` means
    /// the statement failed (already logged).
    pub(crate) fn write<P: Params>(&self, op: &'static str, sql: &str, params: P) -> Option<usize> {
        let conn = self.db.lock_conn();
        match conn.execute(sql, params) {
            Ok(changed) => Some(changed),
            Err(e) if is_missing_table(&e) && op.starts_with("delete") => {
                debug!(table = R::TABLE, op, "Table missing, nothing to delete");
                Some(0)
            }
            Err(e) => {
                error!(table = R::TABLE, op, error = %e, "Write failed");
                None
            }
        }
    }
}

impl<R: Record> Repository for SqliteRepository<R> {
    type Entity = R;
    type Id = R::Id;

    fn insert(&self, entity: &R) -> bool {
        let placeholders = (1..=R::COLUMNS.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({placeholders})",
            R::TABLE,
            R::COLUMNS.join(", ")
        );
        self.write("insert", &sql, params_from_iter(entity.to_values()))
            .is_some()
    }

    fn update(&self, entity: &R) -> bool {
        let assignments = R::COLUMNS
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, col)| format!("{col} = ?{}", i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE {} SET {assignments} WHERE id = ?1", R::TABLE);
        match self.write("update", &sql, params_from_iter(entity.to_values())) {
            Some(0) => {
                debug!(table = R::TABLE, id = %entity.id(), "Update matched no row");
                false
            }
            Some(_) => true,
            None => false,
        }
    }

    fn delete(&self, id: &R::Id) -> bool {
        self.delete_where("delete", "id", id.to_string())
    }

    fn delete_all(&self) -> bool {
        let sql = format!("DELETE FROM {}", R::TABLE);
        self.write("delete_all", &sql, []).is_some()
    }

    fn fetch_by_id(&self, id: &R::Id) -> Option<R> {
        let sql = format!("{} WHERE id = ?1", Self::select_sql());
        let conn = self.db.lock_conn();
        match conn
            .query_row(&sql, params![id.to_string()], R::from_row)
            .optional()
        {
            Ok(found) => found,
            Err(e) => {
                log_read_failure(R::TABLE, "fetch_by_id", &e);
                None
            }
        }
    }

    fn fetch_all(&self) -> Vec<R> {
        let sql = format!("{} ORDER BY {}", Self::select_sql(), R::ORDER_BY);
        self.read_rows("fetch_all", &sql, [])
    }

    fn search(&self, query: &str) -> Vec<R> {
        let needle = query.trim();
        if needle.chars().count() < MIN_SEARCH_LEN || R::SEARCH_COLUMNS.is_empty() {
            return Vec::new();
        }
        let conditions = R::SEARCH_COLUMNS
            .iter()
            .map(|col| format!("fold({col}) LIKE ?1 ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!(
            "{} WHERE {conditions} ORDER BY {}",
            Self::select_sql(),
            R::ORDER_BY
        );
        let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
        self.read_rows("search", &sql, params![pattern])
    }

    fn count(&self) -> i64 {
        let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
        self.read_scalar("count", &sql, []).unwrap_or(0)
    }
}

impl<R: ProjectScoped> ProjectScopedRepository for SqliteRepository<R> {
    fn fetch_by_project_id(&self, project_id: &ProjectId) -> Vec<R> {
        self.fetch_where("fetch_by_project_id", "project_id", project_id.to_string())
    }

    fn delete_by_project_id(&self, project_id: &ProjectId) -> bool {
        self.delete_where("delete_by_project_id", "project_id", project_id.to_string())
    }
}

fn log_read_failure(table: &'static str, op: &'static str, err: &rusqlite::Error) {
    if is_missing_table(err) {
        warn!(table, op, "Table missing, treating as empty");
    } else {
        error!(table, op, error = %err, "Read failed");
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
pub(crate) fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
