//! User repository.

use lode_core::entities::User;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime};
use crate::service::LodeService;

const USER_COLUMNS: &str = "id, username, password, date_joined";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get::<i64>(0)?,
        username: row.get::<String>(1)?,
        password: get_opt_string(row, 2)?,
        date_joined: parse_datetime(&row.get::<String>(3)?)?,
    })
}

/// Look up a user by id on `conn`.
pub(crate) async fn select_user(
    conn: &libsql::Connection,
    user_id: i64,
) -> Result<Option<User>, DatabaseError> {
    let mut rows = conn
        .query(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            [user_id],
        )
        .await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_user(&row)?)),
        None => Ok(None),
    }
}

impl LodeService {
    /// Create a user. `password` is the stored hash, or `None` for accounts
    /// that only log in through external identities.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the username is taken or the insert fails.
    pub async fn create_user(
        &self,
        username: &str,
        password: Option<&str>,
    ) -> Result<User, DatabaseError> {
        let _guard = self.write_lock().lock().await;
        let mut rows = self
            .db()
            .conn()
            .query(
                &format!(
                    "INSERT INTO users (username, password) VALUES (?1, ?2) RETURNING {USER_COLUMNS}"
                ),
                libsql::params![username, password],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let user = row_to_user(&row)?;
        tracing::debug!(user_id = user.id, username, "created user");
        Ok(user)
    }

    /// Fetch a user by id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no user has this id.
    pub async fn get_user(&self, user_id: i64) -> Result<User, DatabaseError> {
        self.find_user(user_id).await?.ok_or(DatabaseError::NoResult)
    }

    /// Fetch a user by id, or `None`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn find_user(&self, user_id: i64) -> Result<Option<User>, DatabaseError> {
        select_user(self.db().conn(), user_id).await
    }

    /// Replace the stored password hash. `None` clears it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the update fails.
    pub async fn set_password(
        &self,
        user_id: i64,
        password: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let _guard = self.write_lock().lock().await;
        self.db()
            .conn()
            .execute(
                "UPDATE users SET password = ?2 WHERE id = ?1",
                libsql::params![user_id, password],
            )
            .await?;
        Ok(())
    }
}
