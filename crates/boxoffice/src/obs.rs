use candid::CandidType;
use canic_cdk::utils::time::now_millis;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

///
/// Metrics
/// Ephemeral, in-memory counters for façade operations. Not persisted;
/// resets on upgrade.
///

#[derive(CandidType, Clone, Debug, Deserialize, Serialize)]
pub struct OpsState {
    pub ops: TicketOps,
    pub since_ms: u64,
}

impl Default for OpsState {
    fn default() -> Self {
        Self {
            ops: TicketOps::default(),
            since_ms: now_millis(),
        }
    }
}

///
/// TicketOps
///

#[derive(CandidType, Clone, Debug, Default, Deserialize, Serialize)]
pub struct TicketOps {
    // Façade entrypoints
    pub list_calls: u64,
    pub create_calls: u64,
    pub get_ticket_calls: u64,
    pub delete_calls: u64,
    pub get_sold_calls: u64,
    pub buy_calls: u64,
    pub resell_calls: u64,
    pub transfer_calls: u64,
    pub refund_calls: u64,
    pub restock_refund_calls: u64,
    pub reserve_calls: u64,
    pub availability_calls: u64,

    // Rejections
    pub sold_out_rejections: u64,
    pub reservation_conflicts: u64,
}

thread_local! {
    static OPS_STATE: RefCell<OpsState> = RefCell::new(OpsState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&OpsState) -> R) -> R {
    OPS_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut OpsState) -> R) -> R {
    OPS_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Snapshot all counters.
#[must_use]
pub fn snapshot() -> OpsState {
    with_state(Clone::clone)
}

/// Reset all counters (useful in tests).
pub fn reset() {
    with_state_mut(|m| *m = OpsState::default());
}

/// Bump one counter selected from `TicketOps`.
pub(crate) fn bump(select: impl FnOnce(&mut TicketOps) -> &mut u64) {
    with_state_mut(|m| {
        let counter = select(&mut m.ops);
        *counter = counter.saturating_add(1);
    });
}

///
/// TESTS
///
