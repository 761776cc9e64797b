//! # Domain Value Objects

use super::errors::TrackerError;

/// Separator of the caller ban list in `registerRemoteService`.
pub const BAN_LIST_SEPARATOR: char = '^';

/// Full service id of a remote service registered for direct mode.
///
/// No relay hub is involved, so the bxh segment is empty.
pub fn remote_full_service_id(chain_id: &str, service_id: &str) -> String {
    format!(":{}:{}", chain_id, service_id)
}

/// Direct-mode status of one interchain call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DirectTxStatus {
    /// Never started.
    #[default]
    Unset,
    /// Started, awaiting outcome.
    Begin,
    /// Rollback started.
    RollbackBegin,
    /// Finished successfully.
    Success,
    /// Finished with failure.
    Fail,
    /// Rollback finished.
    RollbackEnd,
}

impl DirectTxStatus {
    /// Stored code.
    pub const fn code(&self) -> u64 {
        match self {
            Self::Unset => 0,
            Self::Begin => 1,
            Self::RollbackBegin => 2,
            Self::Success => 3,
            Self::Fail => 4,
            Self::RollbackEnd => 5,
        }
    }

    /// Parse a stored code.
    pub fn from_code(code: u64) -> Result<Self, TrackerError> {
        match code {
            0 => Ok(Self::Unset),
            1 => Ok(Self::Begin),
            2 => Ok(Self::RollbackBegin),
            3 => Ok(Self::Success),
            4 => Ok(Self::Fail),
            5 => Ok(Self::RollbackEnd),
            other => Err(TrackerError::UnknownStatus(other)),
        }
    }

    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: DirectTxStatus) -> bool {
        matches!(
            (self, next),
            (Self::Unset, Self::Begin)
                | (Self::Begin, Self::Success)
                | (Self::Begin, Self::Fail)
                | (Self::Begin, Self::RollbackBegin)
                | (Self::RollbackBegin, Self::RollbackEnd)
        )
    }

    /// Error reported when moving to `next` is refused.
    pub fn rejection(next: DirectTxStatus) -> TrackerError {
        match next {
            Self::Begin => TrackerError::AlreadyRecorded,
            Self::RollbackEnd => TrackerError::NotBeginRollback,
            Self::Unset | Self::RollbackBegin | Self::Success | Self::Fail => TrackerError::NotBegin,
        }
    }
}
