//! Status machine for document requests.

use docportal_common::{AppError, AppResult, config::TransitionPolicy};
use docportal_db::entities::document_request::RequestStatus;

/// Outcome of checking a status change against the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Write the new status.
    Apply,
    /// The request already holds the target status.
    Unchanged,
}

/// Validates status changes under a [`TransitionPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusMachine {
    policy: TransitionPolicy,
}

impl StatusMachine {
    #[must_use]
    pub const fn new(policy: TransitionPolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub const fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    /// Parse an admin-supplied status string.
    pub fn parse(raw: &str) -> AppResult<RequestStatus> {
        raw.parse()
    }

    /// Statuses reachable from `current` under the progressive table.
    #[must_use]
    pub fn successors(current: RequestStatus) -> Vec<RequestStatus> {
        if current.is_terminal() {
            return Vec::new();
        }
        current
            .next()
            .into_iter()
            .chain(std::iter::once(RequestStatus::Rejected))
            .collect()
    }

    /// Check a change from `current` to `next`.
    pub fn check(&self, current: RequestStatus, next: RequestStatus) -> AppResult<Transition> {
        match self.policy {
            TransitionPolicy::Permissive => Ok(Transition::Apply),
            TransitionPolicy::Progressive if current == next => Ok(Transition::Unchanged),
            TransitionPolicy::Progressive if Self::successors(current).contains(&next) => {
                Ok(Transition::Apply)
            }
            TransitionPolicy::Progressive => Err(AppError::InvalidStatus(format!(
                "cannot move from {current} to {next}"
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_permissive_accepts_any_pair() {
        let machine = StatusMachine::new(TransitionPolicy::Permissive);
        for from in RequestStatus::ALL {
            for to in RequestStatus::ALL {
                assert_eq!(machine.check(from, to).unwrap(), Transition::Apply);
            }
        }
    }

    #[test]
    fn test_progressive_table() {
        let machine = StatusMachine::new(TransitionPolicy::Progressive);

        assert_eq!(
            machine
                .check(RequestStatus::Pending, RequestStatus::Processing)
                .unwrap(),
            Transition::Apply
        );
        assert_eq!(
            machine
                .check(RequestStatus::Verifying, RequestStatus::Rejected)
                .unwrap(),
            Transition::Apply
        );
        assert_eq!(
            machine
                .check(RequestStatus::Completed, RequestStatus::Completed)
                .unwrap(),
            Transition::Unchanged
        );
        assert!(matches!(
            machine.check(RequestStatus::Pending, RequestStatus::Completed),
            Err(AppError::InvalidStatus(_))
        ));
        assert!(matches!(
            machine.check(RequestStatus::Rejected, RequestStatus::Pending),
            Err(AppError::InvalidStatus(_))
        ));
    }

    #[test]
    fn test_successors() {
        assert_eq!(
            StatusMachine::successors(RequestStatus::ReadyToBeClaimed),
            vec![RequestStatus::Completed, RequestStatus::Rejected]
        );
        assert!(StatusMachine::successors(RequestStatus::Completed).is_empty());
    }

    #[test]
    fn test_parse() {
        assert_eq!(
            StatusMachine::parse("Ready to be Claimed").unwrap(),
            RequestStatus::ReadyToBeClaimed
        );
        assert!(matches!(
            StatusMachine::parse("Unknown"),
            Err(AppError::InvalidStatus(_))
        ));
    }
}
