mod event_ticket;
mod ticket_sold;

pub use event_ticket::EventTicket;
pub use ticket_sold::TicketSold;

use crate::types::Ulid;
use candid::CandidType;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt::{self, Display};

///
/// Entity
/// Names the two persisted collections; used for keying errors and metrics.
///

#[derive(CandidType, Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Entity {
    EventTicket,
    TicketSold,
}

impl Entity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EventTicket => "event_ticket",
            Self::TicketSold => "ticket_sold",
        }
    }
}

impl Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// EntityKind
/// Implemented by both persisted record types; lets one typed store
/// serve either collection.
///

pub trait EntityKind: Clone + DeserializeOwned + Serialize {
    const ENTITY: Entity;

    /// Primary key of this record.
    fn key(&self) -> Ulid;
}
