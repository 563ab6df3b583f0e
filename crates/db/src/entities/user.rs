//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Role {
    #[sea_orm(string_value = "user")]
    #[default]
    User,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl Role {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub first_name: String,

    pub last_name: String,

    /// "{first_name} {last_name}", kept in sync on every profile edit
    pub fullname: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Session token issued at sign-in
    #[sea_orm(unique, nullable)]
    #[serde(skip_serializing)]
    pub token: Option<String>,

    pub role: Role,

    #[sea_orm(nullable)]
    pub contact: Option<String>,

    #[sea_orm(nullable)]
    pub birthdate: Option<String>,

    #[sea_orm(nullable)]
    pub civil_status: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub address: Option<String>,

    #[sea_orm(nullable)]
    pub fathers_name: Option<String>,

    #[sea_orm(nullable)]
    pub mothers_name: Option<String>,

    #[sea_orm(nullable)]
    pub birthplace: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Birthdate, civil status and address are all filled in.
    ///
    /// Residents must complete these before they can submit requests.
    #[must_use]
    pub fn is_profile_complete(&self) -> bool {
        [&self.birthdate, &self.civil_status, &self.address]
            .iter()
            .all(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }

    /// Whether this account has staff privileges.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::document_request::Entity")]
    DocumentRequests,
}

impl Related<super::document_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DocumentRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
