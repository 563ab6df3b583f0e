//! User repository.

use std::sync::Arc;

use crate::entities::{
    User,
    user::{self, Role},
};
use docportal_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
    sea_query::{Expr, Func},
};

use super::map_write_err;

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        User::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(id.to_string()))
    }

    /// Find a user by email address.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Email.eq(email))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a user by session token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        User::find()
            .filter(user::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_write_err)
    }

    /// Update a user.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.update(self.db.as_ref()).await.map_err(map_write_err)
    }

    /// Delete a user. Their document requests go with them.
    ///
    /// Returns the number of rows removed (0 or 1).
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        User::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map(|res| res.rows_affected)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count users holding a role.
    pub async fn count_by_role(&self, role: Role) -> AppResult<u64> {
        User::find()
            .filter(user::Column::Role.eq(role))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Search residents by first name, last name or full name.
    ///
    /// Matching is a case-insensitive substring match: both sides are
    /// lowercased and `LIKE` wildcards in the query are escaped. An empty
    /// query returns every resident. Admin accounts never match.
    pub async fn search_residents(&self, query: &str) -> AppResult<Vec<user::Model>> {
        let mut condition = Condition::all().add(user::Column::Role.eq(Role::User));

        let query = query.trim();
        if !query.is_empty() {
            let pattern = like_pattern(query);
            condition = condition.add(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::FirstName))).like(&pattern))
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::LastName))).like(&pattern))
                    .add(Expr::expr(Func::lower(Expr::col(user::Column::Fullname))).like(&pattern)),
            );
        }

        User::find()
            .filter(condition)
            .order_by_asc(user::Column::Fullname)
            .order_by_asc(user::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

/// Build a lowercase `%...%` pattern with `\`, `%` and `_` escaped.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
