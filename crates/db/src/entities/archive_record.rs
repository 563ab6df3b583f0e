//! Archive record entity.
//!
//! A point-in-time copy of a document request taken when the request is
//! removed from active tracking. `request_id` and `user_id` are historical
//! references only; the rows they pointed at may no longer exist.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::document_request::RequestStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "archive_record")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub request_id: String,

    pub user_id: String,

    pub fullname: String,

    pub document_type: String,

    /// Status at the moment of archival
    pub status: RequestStatus,

    pub date_submitted: DateTimeWithTimeZone,

    pub archived_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
