use crate::{
    env::{CanisterEnv, Env},
    error::Error,
    inventory::Inventory,
    ledger::Ledger,
    model::{EventTicket, TicketSold},
    obs,
    store::Memory,
    types::Ulid,
};
use std::cell::RefCell;

///
/// Tickets
///
/// The composed cross-entity protocol over the two stores. Every
/// operation runs to completion within one canister message, so the
/// two-write sequences below need no locking; the host serializes calls.
///

pub struct Tickets<E: Env> {
    env: E,
    inventory: Inventory,
    ledger: Ledger,
}

impl<E: Env> Tickets<E> {
    #[must_use]
    pub fn init(env: E, inventory_memory: Memory, ledger_memory: Memory) -> Self {
        Self {
            env,
            inventory: Inventory::init(inventory_memory),
            ledger: Ledger::init(ledger_memory),
        }
    }

    //
    // Inventory surface
    //

    pub fn list_all_event_tickets(&self) -> Result<Vec<EventTicket>, Error> {
        obs::bump(|ops| &mut ops.list_calls);

        self.inventory.list_all()
    }

    pub fn create_event_ticket(
        &mut self,
        title: String,
        description: String,
        price: u64,
        capacity: u32,
    ) -> Result<EventTicket, Error> {
        obs::bump(|ops| &mut ops.create_calls);

        self.inventory
            .create(&mut self.env, title, description, price, capacity)
    }

    pub fn get_event_ticket_by_id(&self, id: Ulid) -> Result<EventTicket, Error> {
        obs::bump(|ops| &mut ops.get_ticket_calls);

        self.inventory.get(id)
    }

    /// Delete an offering. Sold records referencing it are left in place.
    pub fn delete_event_ticket(&mut self, id: Ulid) -> Result<EventTicket, Error> {
        obs::bump(|ops| &mut ops.delete_calls);

        self.inventory.delete(id)
    }

    //
    // Ledger surface
    //

    pub fn get_ticket_sold_by_id(&self, id: Ulid) -> Result<TicketSold, Error> {
        obs::bump(|ops| &mut ops.get_sold_calls);

        self.ledger.get(id)
    }

    //
    // Cross-entity operations
    //

    /// Sell one unit of an offering to `username`.
    ///
    /// The capacity check and counter increment commit before the ledger
    /// write: a sold-out rejection must never leave an orphaned sold
    /// record.
    pub fn buy_ticket(
        &mut self,
        event_ticket_id: Ulid,
        username: String,
    ) -> Result<TicketSold, Error> {
        obs::bump(|ops| &mut ops.buy_calls);

        let result = self
            .inventory
            .increment_sold(&mut self.env, event_ticket_id)
            .and_then(|_| self.ledger.create(&mut self.env, event_ticket_id, username));

        if matches!(result, Err(Error::SoldOut { .. })) {
            obs::bump(|ops| &mut ops.sold_out_rejections);
        }

        result
    }

    /// Hand a sold record to a new holder (secondary sale).
    pub fn resell_ticket(
        &mut self,
        sold_id: Ulid,
        new_username: String,
    ) -> Result<TicketSold, Error> {
        obs::bump(|ops| &mut ops.resell_calls);

        self.ledger.reassign_owner(sold_id, new_username)
    }

    /// Identical protocol to `resell_ticket`; kept as a separately named
    /// operation for API clarity, not behavioral difference.
    pub fn transfer_ticket(&mut self, sold_id: Ulid, new_owner: String) -> Result<TicketSold, Error> {
        obs::bump(|ops| &mut ops.transfer_calls);

        self.ledger.reassign_owner(sold_id, new_owner)
    }

    /// Remove a sold record and return its id.
    ///
    /// Deliberately does NOT restore the offering's capacity: the sold
    /// counter stays where it was, so counter and record count diverge
    /// after a refund. Carried forward as documented behavior; see
    /// `refund_and_restock` for the corrected protocol.
    pub fn request_ticket_refund(&mut self, sold_id: Ulid) -> Result<Ulid, Error> {
        obs::bump(|ops| &mut ops.refund_calls);

        let sold = self.ledger.remove(sold_id)?;

        Ok(sold.id)
    }

    /// Refund variant that also returns the unit to the offering's
    /// capacity. A deleted offering is tolerated; the record is removed
    /// either way.
    pub fn refund_and_restock(&mut self, sold_id: Ulid) -> Result<Ulid, Error> {
        obs::bump(|ops| &mut ops.restock_refund_calls);

        let sold = self.ledger.remove(sold_id)?;
        self.inventory
            .decrement_sold(&mut self.env, sold.event_ticket_id)?;

        Ok(sold.id)
    }

    /// Place an advisory, non-expiring exclusivity claim on an offering.
    /// Does not consume capacity and creates no sold record.
    pub fn reserve_ticket(&mut self, event_ticket_id: Ulid, username: String) -> Result<Ulid, Error> {
        obs::bump(|ops| &mut ops.reserve_calls);

        let result = self
            .inventory
            .set_reserved_by(&mut self.env, event_ticket_id, &username)
            .map(|ticket| ticket.id);

        if matches!(result, Err(Error::ReservationConflict { .. })) {
            obs::bump(|ops| &mut ops.reservation_conflicts);
        }

        result
    }

    pub fn check_ticket_availability(&self, event_ticket_id: Ulid) -> Result<bool, Error> {
        obs::bump(|ops| &mut ops.availability_calls);

        self.inventory.check_availability(event_ticket_id)
    }

    //
    // Audit surface
    //

    /// Live sold records referencing one offering; includes records whose
    /// offering has since been deleted only when queried under its old id.
    pub fn list_sold_for_event(&self, event_ticket_id: Ulid) -> Result<Vec<TicketSold>, Error> {
        self.ledger.list_for_event(event_ticket_id)
    }
}

//
// Production wiring: one service instance over two fixed stable-memory
// slots, initialized eagerly at canister start.
//

canic_memory::eager_static! {
    static SERVICE: RefCell<Tickets<CanisterEnv>> = RefCell::new(Tickets::init(
        CanisterEnv,
        canic_memory::ic_memory!(Inventory, 1),
        canic_memory::ic_memory!(Ledger, 2),
    ));
}

/// Run `f` against the canister-wide service instance.
pub fn with_tickets<R>(f: impl FnOnce(&mut Tickets<CanisterEnv>) -> R) -> R {
    SERVICE.with_borrow_mut(f)
}
