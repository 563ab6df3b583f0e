//! Business logic services.

pub mod archive;
pub mod dashboard;
pub mod request;
pub mod search;
pub mod status;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use archive::ArchiveService;
pub use dashboard::{
    AdminDashboard, AdminDashboardQuery, DashboardService, RequestCounts, UserDashboard,
};
pub use request::{RequestService, StatusEntry, SubmitRequestInput};
pub use search::{ResidentSummary, SearchService};
pub use status::{StatusMachine, Transition};
pub use user::{
    Profile, RegisterInput, Session, SignInInput, UpdateProfileInput, UserService,
};
