//! SimpleModel repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide save/find/delete/list over the `simple_models` table.
//! - Assign identifiers to unsaved models.
//!
//! # Invariants
//! - `save` is a full-replace upsert keyed by `id`.
//! - `find_all` returns rows in insertion order.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::simple_model::{SimpleModel, SimpleModelId, SimpleModelValidationError};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const MODEL_SELECT_SQL: &str = "SELECT id, name, description FROM simple_models";
const REQUIRED_COLUMNS: &[&str] = &["id", "name", "description", "created_at", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for entity persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Validation(SimpleModelValidationError),
    Db(DbError),
    /// `delete` was called with a model that has never been saved.
    MissingId,
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingId => write!(f, "cannot delete a model without an id"),
            Self::InvalidData(message) => write!(f, "invalid persisted model data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SimpleModelValidationError> for RepoError {
    fn from(value: SimpleModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Entity store contract.
pub trait SimpleRepository {
    /// Inserts or fully replaces `model`, assigning an id when absent.
    ///
    /// The returned value is authoritative; callers must not reuse the input.
    fn save(&self, model: &SimpleModel) -> RepoResult<SimpleModel>;
    fn find_by_id(&self, id: SimpleModelId) -> RepoResult<Option<SimpleModel>>;
    fn delete(&self, model: &SimpleModel) -> RepoResult<()>;
    fn find_all(&self) -> RepoResult<Vec<SimpleModel>>;
}

impl<R: SimpleRepository + ?Sized> SimpleRepository for &R {
    fn save(&self, model: &SimpleModel) -> RepoResult<SimpleModel> {
        (**self).save(model)
    }

    fn find_by_id(&self, id: SimpleModelId) -> RepoResult<Option<SimpleModel>> {
        (**self).find_by_id(id)
    }

    fn delete(&self, model: &SimpleModel) -> RepoResult<()> {
        (**self).delete(model)
    }

    fn find_all(&self) -> RepoResult<Vec<SimpleModel>> {
        (**self).find_all()
    }
}

/// SQLite-backed entity store.
pub struct SqliteSimpleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSimpleRepository<'conn> {
    /// Wraps a connection after checking it was bootstrapped by `db::open_db`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `user_version` is not the latest.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` on schema drift.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let columns = table_columns(conn, "simple_models")?;
        if columns.is_empty() {
            return Err(RepoError::MissingRequiredTable("simple_models"));
        }
        if let Some(column) = REQUIRED_COLUMNS
            .iter()
            .copied()
            .find(|required| !columns.iter().any(|name| name == required))
        {
            return Err(RepoError::MissingRequiredColumn {
                table: "simple_models",
                column,
            });
        }

        Ok(Self { conn })
    }
}

impl SimpleRepository for SqliteSimpleRepository<'_> {
    fn save(&self, model: &SimpleModel) -> RepoResult<SimpleModel> {
        model.validate()?;

        let mut saved = model.clone();
        let id = *saved.id.get_or_insert_with(Uuid::new_v4);

        self.conn.execute(
            "INSERT INTO simple_models (id, name, description)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                id.to_string(),
                saved.name.as_str(),
                saved.description.as_deref()
            ],
        )?;

        Ok(saved)
    }

    fn find_by_id(&self, id: SimpleModelId) -> RepoResult<Option<SimpleModel>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MODEL_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt
            .query_row([id.to_string()], |row| Ok(parse_model_row(row)))
            .optional()?;
        row.transpose()
    }

    fn delete(&self, model: &SimpleModel) -> RepoResult<()> {
        let id = model.id.ok_or(RepoError::MissingId)?;
        // Deleting an already-absent row is a no-op, matching a plain key-value delete.
        self.conn
            .execute("DELETE FROM simple_models WHERE id = ?1;", [id.to_string()])?;
        Ok(())
    }

    fn find_all(&self) -> RepoResult<Vec<SimpleModel>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MODEL_SELECT_SQL} ORDER BY rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut models = Vec::new();

        while let Some(row) = rows.next()? {
            models.push(parse_model_row(row)?);
        }

        Ok(models)
    }
}

fn table_columns(conn: &Connection, table: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>("name"))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}

fn parse_model_row(row: &Row<'_>) -> RepoResult<SimpleModel> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in simple_models.id"))
    })?;

    let model = SimpleModel {
        id: Some(id),
        name: row.get("name")?,
        description: row.get("description")?,
    };
    model.validate()?;
    Ok(model)
}
