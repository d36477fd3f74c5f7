//! Boxoffice: ticket inventory and transaction engine for Internet
//! Computer canisters.
//!
//! Two persisted collections — ticket offerings ([`model::EventTicket`])
//! and sold-ticket records ([`model::TicketSold`]) — live in stable
//! ordered maps, mutated only through [`inventory::Inventory`],
//! [`ledger::Ledger`], and the composed [`service::Tickets`] façade.
//! Correctness relies on the canister's single-threaded run-to-completion
//! execution model; there are no locks and no suspension points inside
//! any operation.

pub mod env;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod model;
pub mod obs;
pub mod serialize;
pub mod service;
pub mod store;
pub mod types;

#[doc(hidden)]
pub mod test_support;

///
/// Prelude
///
/// Domain vocabulary only; substrate types stay behind their modules.
///

pub mod prelude {
    pub use crate::{
        env::{CanisterEnv, Env},
        error::Error,
        model::{Entity, EventTicket, TicketSold},
        service::{Tickets, with_tickets},
        types::{Timestamp, Ulid},
    };
}
