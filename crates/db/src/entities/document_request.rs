//! Document request entity.

use std::fmt;
use std::str::FromStr;

use docportal_common::AppError;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Processing status of a document request.
///
/// Variants are listed in progression order. `Completed` and `Rejected`
/// are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[derive(Default)]
pub enum RequestStatus {
    #[sea_orm(string_value = "Pending")]
    #[serde(rename = "Pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "Processing")]
    #[serde(rename = "Processing")]
    Processing,
    #[sea_orm(string_value = "Verifying")]
    #[serde(rename = "Verifying")]
    Verifying,
    #[sea_orm(string_value = "Ready to be Claimed")]
    #[serde(rename = "Ready to be Claimed")]
    ReadyToBeClaimed,
    #[sea_orm(string_value = "Completed")]
    #[serde(rename = "Completed")]
    Completed,
    #[sea_orm(string_value = "Rejected")]
    #[serde(rename = "Rejected")]
    Rejected,
}

impl RequestStatus {
    /// Every status, in progression order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Processing,
        Self::Verifying,
        Self::ReadyToBeClaimed,
        Self::Completed,
        Self::Rejected,
    ];

    /// Exact wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Verifying => "Verifying",
            Self::ReadyToBeClaimed => "Ready to be Claimed",
            Self::Completed => "Completed",
            Self::Rejected => "Rejected",
        }
    }

    /// No further status is expected after this one.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    /// The following status in progression order, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Processing),
            Self::Processing => Some(Self::Verifying),
            Self::Verifying => Some(Self::ReadyToBeClaimed),
            Self::ReadyToBeClaimed => Some(Self::Completed),
            Self::Completed | Self::Rejected => None,
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = AppError;

    /// Exact, case-sensitive match against the wire strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::InvalidStatus(s.to_string()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "document_request")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning resident
    pub user_id: String,

    /// e.g. "Barangay Clearance"
    pub document_type: String,

    /// Name to print on the document
    pub full_name: String,

    #[sea_orm(column_type = "Text")]
    pub address: String,

    pub contact: String,

    #[sea_orm(column_type = "Text")]
    pub purpose: String,

    pub status: RequestStatus,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
