//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{PasswordHash, User, UserId, UserProfile};

use super::diesel_basic_error_mapping::{
    DieselFailure, classify_diesel_error, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let id = UserId::new(row.id)
        .map_err(|err| UserPersistenceError::query(format!("stored user id is invalid: {err}")))?;
    Ok(User {
        id,
        profile: UserProfile {
            first_name: row.first_name,
            last_name: row.last_name,
            birth_date: row.birth_date,
            phone: row.phone,
            city: row.city,
            interests: row.interests.into_iter().collect(),
        },
        password_hash: PasswordHash::new(row.password_hash),
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let profile = &user.profile;
        let row = NewUserRow {
            id: user.id.as_ref(),
            first_name: profile.first_name.as_deref(),
            last_name: profile.last_name.as_deref(),
            birth_date: profile.birth_date,
            phone: profile.phone.as_deref(),
            city: profile.city.as_deref(),
            interests: profile.interests.iter().cloned().collect(),
            password_hash: user.password_hash.as_str(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| match classify_diesel_error(&err) {
                DieselFailure::UniqueViolation => UserPersistenceError::duplicate(user.id.as_ref()),
                _ => map_diesel_error(err),
            })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }
}
