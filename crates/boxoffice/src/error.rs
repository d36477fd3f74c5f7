use crate::{
    model::Entity,
    serialize::SerializeError,
    types::{Ulid, UlidError},
};
use candid::CandidType;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error taxonomy for callers and canister interfaces.
///
/// Every engine operation returns `Result<_, Error>`; nothing traps on
/// these conditions and nothing is retried internally.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
pub enum Error {
    /// Lookup by identifier failed in either store.
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: Ulid },

    /// Purchase attempted against an at-capacity offering.
    #[error("event ticket sold out: {id}")]
    SoldOut { id: Ulid },

    /// Reservation already held by a different principal.
    #[error("event ticket {id} is reserved by '{held_by}'")]
    ReservationConflict { id: Ulid, held_by: String },

    /// A stored row failed to decode.
    #[error("store corruption: {message}")]
    Corruption { message: String },

    /// Substrate failure the caller cannot remediate.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl Error {
    pub(crate) const fn not_found(entity: Entity, id: Ulid) -> Self {
        Self::NotFound { entity, id }
    }

    pub(crate) fn corruption(message: impl Into<String>) -> Self {
        Self::Corruption {
            message: message.into(),
        }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<SerializeError> for Error {
    fn from(err: SerializeError) -> Self {
        match err {
            SerializeError::Serialize(_) => Self::internal(err.to_string()),
            SerializeError::Deserialize(_) => Self::corruption(err.to_string()),
        }
    }
}

impl From<UlidError> for Error {
    fn from(err: UlidError) -> Self {
        Self::internal(err.to_string())
    }
}

///
/// TESTS
///
