use crate::{
    model::{Entity, EntityKind},
    types::Ulid,
};
use candid::CandidType;
use serde::{Deserialize, Serialize};

///
/// TicketSold
///
/// One sold/owned unit, referencing its offering. `event_ticket_id` is a
/// non-owning reference and is never rewritten; deleting the offering does
/// not cascade here, so orphaned references are tolerated.
///

#[derive(CandidType, Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TicketSold {
    pub id: Ulid,
    pub event_ticket_id: Ulid,
    pub username: String,
}

impl EntityKind for TicketSold {
    const ENTITY: Entity = Entity::TicketSold;

    fn key(&self) -> Ulid {
        self.id
    }
}
