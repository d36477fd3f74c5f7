use crate::{
    model::{Entity, EntityKind},
    types::{Timestamp, Ulid},
};
use candid::CandidType;
use serde::{Deserialize, Serialize};

///
/// EventTicket
///
/// A sellable ticket-type offering with capacity and price.
///
/// `price` is in minor currency units and `capacity`/`total_ticket_sold`
/// are unsigned, so the non-negativity constraints hold by construction.
/// `reserved_at` is persisted alongside `reserved_by` as the extension
/// point for reservation expiry; nothing reads it yet.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventTicket {
    pub id: Ulid,
    pub title: String,
    pub description: String,
    pub price: u64,
    pub capacity: u32,
    pub total_ticket_sold: u32,
    pub reserved_by: Option<String>,
    pub reserved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl EventTicket {
    /// True while at least one unit remains sellable.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.total_ticket_sold < self.capacity
    }

    /// Units still sellable.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.total_ticket_sold)
    }
}

impl EntityKind for EventTicket {
    const ENTITY: Entity = Entity::EventTicket;

    fn key(&self) -> Ulid {
        self.id
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    fn offering(capacity: u32, sold: u32) -> EventTicket {
        EventTicket {
            id: Ulid::from_u128(1),
            title: "Standing".to_string(),
            description: String::new(),
            price: 1_000,
            capacity,
            total_ticket_sold: sold,
            reserved_by: None,
            reserved_at: None,
            created_at: Timestamp::EPOCH,
            updated_at: None,
        }
    }

    #[test]
    fn availability_tracks_capacity() {
        assert!(offering(2, 0).is_available());
        assert!(offering(2, 1).is_available());
        assert!(!offering(2, 2).is_available());
        assert!(!offering(0, 0).is_available());
    }

    #[test]
    fn remaining_saturates() {
        assert_eq!(offering(2, 1).remaining(), 1);
        assert_eq!(offering(1, 3).remaining(), 0);
    }
}
