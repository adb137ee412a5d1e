//! SQLite-backed user repository.
//!
//! # Responsibility
//! - Provide the `UserRepository` contract over the `users` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `AUTOINCREMENT` keeps deleted ids from being handed out again.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Result order is `id ASC` for every list query.

use crate::db::{open_db, open_db_in_memory};
use crate::model::filter::UserFilter;
use crate::model::user::{User, UserId};
use crate::repo::user_repo::{RepoError, RepoResult, UserRepository};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::Path;

const USER_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    created_at,
    active
FROM users";

/// SQLite-backed user repository owning its connection.
pub struct SqliteUserRepository {
    conn: Connection,
}

impl SqliteUserRepository {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `InvalidData` when the `users` table is missing.
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_users_table(&conn)?;
        Ok(Self { conn })
    }

    /// Opens (or creates) a database file and migrates it.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    fn query_users(&self, where_sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<User>> {
        let sql = format!("{USER_SELECT_SQL} WHERE 1 = 1{where_sql} ORDER BY id ASC;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut users = Vec::new();

        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        Ok(users)
    }
}

impl UserRepository for SqliteUserRepository {
    fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query(params![id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self) -> RepoResult<Vec<User>> {
        self.query_users("", Vec::new())
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Vec<User>> {
        self.query_users(" AND name = ?", vec![Value::Text(name.to_string())])
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Vec<User>> {
        self.query_users(" AND email = ?", vec![Value::Text(email.to_string())])
    }

    fn find_by_filter(&self, filter: &UserFilter) -> RepoResult<Vec<User>> {
        let mut where_sql = String::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(active) = filter.active {
            where_sql.push_str(" AND active = ?");
            bind_values.push(Value::Integer(bool_to_int(active)));
        }

        if let Some(min_id) = filter.min_id {
            where_sql.push_str(" AND id >= ?");
            bind_values.push(Value::Integer(min_id));
        }

        if let Some(max_id) = filter.max_id {
            where_sql.push_str(" AND id <= ?");
            bind_values.push(Value::Integer(max_id));
        }

        // `LIKE` is case-insensitive for ASCII in SQLite; `instr` is not.
        if !filter.name_like.is_empty() {
            where_sql.push_str(" AND instr(name, ?) > 0");
            bind_values.push(Value::Text(filter.name_like.clone()));
        }

        self.query_users(&where_sql, bind_values)
    }

    fn save(&mut self, user: &User) -> RepoResult<User> {
        let id = match user.assigned_id() {
            Some(id) => {
                self.conn.execute(
                    "INSERT INTO users (id, name, email, created_at, active)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT(id) DO UPDATE SET
                        name = excluded.name,
                        email = excluded.email,
                        created_at = excluded.created_at,
                        active = excluded.active;",
                    params![
                        id,
                        user.name(),
                        user.email(),
                        user.created_at(),
                        bool_to_int(user.is_active()),
                    ],
                )?;
                id
            }
            None => {
                self.conn.execute(
                    "INSERT INTO users (name, email, created_at, active)
                     VALUES (?1, ?2, ?3, ?4);",
                    params![
                        user.name(),
                        user.email(),
                        user.created_at(),
                        bool_to_int(user.is_active()),
                    ],
                )?;
                self.conn.last_insert_rowid()
            }
        };

        debug!("event=user_save module=repo backend=sqlite status=ok id={id}");
        self.find_by_id(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("saved user {id} missing on read-back"))
        })
    }

    fn delete_by_id(&mut self, id: UserId) -> RepoResult<()> {
        let removed = self
            .conn
            .execute("DELETE FROM users WHERE id = ?1;", params![id])?;
        debug!(
            "event=user_delete module=repo backend=sqlite status=ok id={} removed={}",
            id,
            removed > 0
        );
        Ok(())
    }

    fn exists_by_id(&self, id: UserId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = ?1);",
            params![id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn count(&self) -> RepoResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("invalid user count `{count}`")))
    }

    fn update_user_status(&mut self, id: UserId, active: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE users SET active = ?1 WHERE id = ?2;",
            params![bool_to_int(active), id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        debug!(
            "event=user_status module=repo backend=sqlite status=ok id={} active={}",
            id, active
        );
        Ok(())
    }
}

fn ensure_users_table(conn: &Connection) -> RepoResult<()> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'users';",
            [],
            |row| row.get(0),
        )
        .optional()?;

    if found.is_none() {
        return Err(RepoError::InvalidData(
            "users table is missing; open the connection through db::open_db".to_string(),
        ));
    }

    Ok(())
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id: UserId = row.get("id")?;
    let active = match row.get::<_, i64>("active")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid active value `{other}` in users.active"
            )));
        }
    };

    Ok(User::from_parts(
        id,
        row.get::<_, String>("name")?,
        row.get::<_, String>("email")?,
        row.get::<_, i64>("created_at")?,
        active,
    ))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
