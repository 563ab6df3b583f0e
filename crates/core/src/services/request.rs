//! Document request service.

use chrono::Utc;
use docportal_common::{AppError, AppResult, Config, IdGenerator, config::TransitionPolicy};
use docportal_db::{
    entities::document_request::{self, RequestStatus},
    repositories::{DocumentRequestRepository, UserRepository},
};
use sea_orm::{Set, prelude::DateTimeWithTimeZone};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::status::{StatusMachine, Transition};
use crate::context::RequestContext;

/// Input for submitting a document request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitRequestInput {
    #[validate(length(min = 1, max = 128))]
    pub document_type: String,

    #[validate(length(min = 1, max = 256))]
    pub full_name: String,

    #[validate(length(min = 1, max = 1024))]
    pub address: String,

    #[validate(length(min = 1, max = 32))]
    pub contact: String,

    #[validate(length(min = 1, max = 2048))]
    pub purpose: String,
}

impl SubmitRequestInput {
    fn trimmed(self) -> Self {
        Self {
            document_type: self.document_type.trim().to_string(),
            full_name: self.full_name.trim().to_string(),
            address: self.address.trim().to_string(),
            contact: self.contact.trim().to_string(),
            purpose: self.purpose.trim().to_string(),
        }
    }
}

/// One row of a resident's status page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub id: String,
    pub document_type: String,
    pub status: RequestStatus,
    pub created_at: DateTimeWithTimeZone,
}

impl From<document_request::Model> for StatusEntry {
    fn from(request: document_request::Model) -> Self {
        Self {
            id: request.id,
            document_type: request.document_type,
            status: request.status,
            created_at: request.created_at,
        }
    }
}

/// Document request service for business logic.
#[derive(Clone)]
pub struct RequestService {
    request_repo: DocumentRequestRepository,
    user_repo: UserRepository,
    machine: StatusMachine,
    id_gen: IdGenerator,
}

impl RequestService {
    /// Create a new request service.
    #[must_use]
    pub fn new(
        request_repo: DocumentRequestRepository,
        user_repo: UserRepository,
        config: &Config,
    ) -> Self {
        Self {
            request_repo,
            user_repo,
            machine: StatusMachine::new(config.requests.transition_policy),
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a new request on behalf of the calling resident.
    ///
    /// The caller's profile must be complete. The request starts `Pending`.
    pub async fn submit(
        &self,
        ctx: &RequestContext,
        input: SubmitRequestInput,
    ) -> AppResult<document_request::Model> {
        let caller = ctx.require_user()?;
        let owner = self.user_repo.get_by_id(&caller.user_id).await?;
        if !owner.is_profile_complete() {
            return Err(AppError::ProfileIncomplete);
        }

        let input = input.trimmed();
        input.validate()?;

        let model = document_request::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(owner.id),
            document_type: Set(input.document_type),
            full_name: Set(input.full_name),
            address: Set(input.address),
            contact: Set(input.contact),
            purpose: Set(input.purpose),
            status: Set(RequestStatus::Pending),
            created_at: Set(Utc::now().into()),
        };

        let request = self.request_repo.create(model).await?;
        tracing::info!(
            request_id = %request.id,
            user_id = %request.user_id,
            document_type = %request.document_type,
            "Document request submitted"
        );
        Ok(request)
    }

    /// Set a request's status.
    ///
    /// `raw_status` must be one of the exact status strings.
    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        request_id: &str,
        raw_status: &str,
    ) -> AppResult<RequestStatus> {
        ctx.require_admin()?;
        let status = StatusMachine::parse(raw_status)?;

        match self.machine.policy() {
            TransitionPolicy::Permissive => {
                let touched = self.request_repo.update_status(request_id, status).await?;
                if touched == 0 {
                    return Err(AppError::RequestNotFound(request_id.to_string()));
                }
            }
            TransitionPolicy::Progressive => {
                let current = self.request_repo.get_by_id(request_id).await?.status;
                if self.machine.check(current, status)? == Transition::Unchanged {
                    return Ok(status);
                }

                let touched = self
                    .request_repo
                    .compare_and_set_status(request_id, current, status)
                    .await?;
                if touched == 0 {
                    return match self.request_repo.find_by_id(request_id).await? {
                        None => Err(AppError::RequestNotFound(request_id.to_string())),
                        Some(_) => Err(AppError::InvalidStatus(format!(
                            "status of {request_id} changed concurrently"
                        ))),
                    };
                }
            }
        }

        tracing::info!(request_id = %request_id, status = %status, "Request status updated");
        Ok(status)
    }

    /// The calling resident's requests, newest first.
    pub async fn status_page(&self, ctx: &RequestContext) -> AppResult<Vec<StatusEntry>> {
        let caller = ctx.require_user()?;
        let requests = self.request_repo.find_by_user(&caller.user_id).await?;
        Ok(requests.into_iter().map(StatusEntry::from).collect())
    }
}
