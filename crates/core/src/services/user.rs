//! User service.
//!
//! Accounts, sessions and the resident profile that gates request
//! submission.

use std::borrow::Cow;
use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use docportal_common::{AppError, AppResult, IdGenerator, config::AdminConfig};
use docportal_db::{
    entities::user::{self, Role},
    repositories::UserRepository,
};
use regex::Regex;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::context::RequestContext;

#[allow(clippy::expect_used)]
static CONTACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^09\d{9}$").expect("contact pattern compiles"));

/// Input for registering a resident account.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 128))]
    pub first_name: String,

    #[validate(length(min = 1, max = 128))]
    pub last_name: String,

    #[validate(email, length(max = 256))]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub confirm_password: String,
}

/// Input for signing in.
#[derive(Debug, Deserialize, Validate)]
pub struct SignInInput {
    #[validate(length(min = 1, max = 256))]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Input for editing one's own profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 128))]
    pub first_name: String,

    #[validate(length(min = 1, max = 128))]
    pub last_name: String,

    #[validate(custom(function = "validate_contact"))]
    pub contact: String,

    #[validate(email, length(max = 256))]
    pub email: String,

    /// New password; empty or absent keeps the current one.
    pub password: Option<String>,

    #[validate(length(max = 32))]
    pub birthdate: String,

    #[validate(length(max = 32))]
    pub civil_status: String,

    #[validate(length(max = 1024))]
    pub address: String,

    #[validate(length(max = 256))]
    pub fathers_name: Option<String>,

    #[validate(length(max = 256))]
    pub mothers_name: Option<String>,

    #[validate(length(max = 256))]
    pub birthplace: Option<String>,
}

/// A signed-in session.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user: user::Model,
}

/// A user's profile together with the submission gate.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    #[serde(flatten)]
    pub user: user::Model,
    pub profile_complete: bool,
}

impl From<user::Model> for Profile {
    fn from(user: user::Model) -> Self {
        let profile_complete = user.is_profile_complete();
        Self {
            user,
            profile_complete,
        }
    }
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a resident account and sign it in.
    pub async fn register(&self, input: RegisterInput) -> AppResult<Session> {
        input.validate()?;
        if input.password != input.confirm_password {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }

        let email = input.email.trim().to_string();
        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(AppError::IntegrityViolation("Email already exists".to_string()));
        }

        let first_name = input.first_name.trim().to_string();
        let last_name = input.last_name.trim().to_string();
        let token = self.id_gen.generate_token();

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            fullname: Set(format!("{first_name} {last_name}")),
            first_name: Set(first_name),
            last_name: Set(last_name),
            email: Set(email),
            password_hash: Set(hash_password(&input.password)?),
            token: Set(Some(token.clone())),
            role: Set(Role::User),
            contact: Set(None),
            birthdate: Set(None),
            civil_status: Set(None),
            address: Set(None),
            fathers_name: Set(None),
            mothers_name: Set(None),
            birthplace: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = %user.id, "Resident registered");
        Ok(Session { token, user })
    }

    /// Sign in with email and password, issuing a fresh token.
    pub async fn signin(&self, input: SignInInput) -> AppResult<Session> {
        input.validate()?;

        let user = self
            .user_repo
            .find_by_email(input.email.trim())
            .await?
            .ok_or_else(|| AppError::UserNotFound("You do not have an account".to_string()))?;

        if !verify_password(&input.password, &user.password_hash)? {
            tracing::debug!(user_id = %user.id, "Rejected sign-in with wrong password");
            return Err(AppError::Unauthorized);
        }

        let token = self.id_gen.generate_token();
        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(token.clone()));
        let user = self.user_repo.update(active).await?;

        tracing::info!(user_id = %user.id, role = user.role.as_str(), "Signed in");
        Ok(Session { token, user })
    }

    /// Invalidate the caller's session token.
    pub async fn signout(&self, ctx: &RequestContext) -> AppResult<()> {
        let caller = ctx.require_caller()?;
        let user = self.user_repo.get_by_id(&caller.user_id).await?;

        let mut active: user::ActiveModel = user.into();
        active.token = Set(None);
        self.user_repo.update(active).await?;
        Ok(())
    }

    /// Authenticate a user by token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// The caller's own profile.
    pub async fn profile(&self, ctx: &RequestContext) -> AppResult<Profile> {
        let caller = ctx.require_caller()?;
        self.user_repo
            .get_by_id(&caller.user_id)
            .await
            .map(Profile::from)
    }

    /// Edit the caller's own profile.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        input: UpdateProfileInput,
    ) -> AppResult<Profile> {
        let caller = ctx.require_caller()?;
        input.validate()?;

        let user = self.user_repo.get_by_id(&caller.user_id).await?;
        let first_name = input.first_name.trim().to_string();
        let last_name = input.last_name.trim().to_string();

        let mut active: user::ActiveModel = user.into();
        active.fullname = Set(format!("{first_name} {last_name}"));
        active.first_name = Set(first_name);
        active.last_name = Set(last_name);
        active.contact = Set(Some(input.contact.trim().to_string()));
        active.email = Set(input.email.trim().to_string());
        active.birthdate = Set(optional(Some(input.birthdate)));
        active.civil_status = Set(optional(Some(input.civil_status)));
        active.address = Set(optional(Some(input.address)));
        active.fathers_name = Set(optional(input.fathers_name));
        active.mothers_name = Set(optional(input.mothers_name));
        active.birthplace = Set(optional(input.birthplace));
        active.updated_at = Set(Some(Utc::now().into()));

        if let Some(password) = input.password.filter(|p| !p.is_empty()) {
            if password.len() < 8 {
                return Err(AppError::Validation(
                    "Password must be at least 8 characters".to_string(),
                ));
            }
            active.password_hash = Set(hash_password(&password)?);
        }

        let user = self.user_repo.update(active).await?;
        tracing::info!(user_id = %user.id, "Profile updated");
        Ok(Profile::from(user))
    }

    /// Full profile of any user, for the admin user panel.
    pub async fn view_user(&self, ctx: &RequestContext, user_id: &str) -> AppResult<Profile> {
        ctx.require_admin()?;
        self.user_repo.get_by_id(user_id).await.map(Profile::from)
    }

    /// Delete a resident account. Their active requests go with it;
    /// archive records stay.
    pub async fn delete_user(&self, ctx: &RequestContext, user_id: &str) -> AppResult<()> {
        ctx.require_admin()?;

        let user = self.user_repo.get_by_id(user_id).await?;
        if user.is_admin() {
            return Err(AppError::Forbidden(
                "administrator accounts cannot be deleted".to_string(),
            ));
        }

        if self.user_repo.delete(user_id).await? == 0 {
            return Err(AppError::UserNotFound(user_id.to_string()));
        }

        tracing::info!(user_id = %user_id, "User deleted");
        Ok(())
    }

    /// Create the configured administrator if no account uses its email.
    ///
    /// Returns `true` when an account was created.
    pub async fn seed_admin(&self, admin: &AdminConfig) -> AppResult<bool> {
        if self.user_repo.find_by_email(&admin.email).await?.is_some() {
            tracing::debug!(email = %admin.email, "Admin account already present");
            return Ok(false);
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            first_name: Set(admin.first_name.clone()),
            last_name: Set(admin.last_name.clone()),
            fullname: Set(format!("{} {}", admin.first_name, admin.last_name)),
            email: Set(admin.email.clone()),
            password_hash: Set(hash_password(&admin.password)?),
            token: Set(None),
            role: Set(Role::Admin),
            contact: Set(Some(admin.contact.clone())),
            birthdate: Set(None),
            civil_status: Set(None),
            address: Set(None),
            fathers_name: Set(None),
            mothers_name: Set(None),
            birthplace: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        match self.user_repo.create(model).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, email = %user.email, "Seeded admin account");
                Ok(true)
            }
            // Another instance seeded it first
            Err(AppError::IntegrityViolation(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Contact numbers are 11 digits starting with `09`.
fn validate_contact(contact: &str) -> Result<(), ValidationError> {
    if CONTACT_RE.is_match(contact.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("contact").with_message(Cow::Borrowed(
            "Contact number must be 11 digits and start with 09",
        )))
    }
}

/// Trim, mapping blank to `None`.
fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
