use crate::{
    env::Env,
    error::Error,
    model::EventTicket,
    store::{EntityStore, Memory},
    types::Ulid,
};

///
/// Inventory
///
/// Catalog of ticket offerings. Owns the capacity/availability invariant
/// (`total_ticket_sold <= capacity`) and the reservation exclusivity rule;
/// every mutation after creation stamps `updated_at`.
///

pub struct Inventory {
    store: EntityStore<EventTicket>,
}

impl Inventory {
    #[must_use]
    pub fn init(memory: Memory) -> Self {
        Self {
            store: EntityStore::init(memory),
        }
    }

    /// All offerings in storage (id) order.
    pub fn list_all(&self) -> Result<Vec<EventTicket>, Error> {
        self.store.iter_all()
    }

    /// Create a new offering with a fresh id and a zeroed sold counter.
    pub fn create(
        &mut self,
        env: &mut dyn Env,
        title: String,
        description: String,
        price: u64,
        capacity: u32,
    ) -> Result<EventTicket, Error> {
        let ticket = EventTicket {
            id: env.next_id()?,
            title,
            description,
            price,
            capacity,
            total_ticket_sold: 0,
            reserved_by: None,
            reserved_at: None,
            created_at: env.now(),
            updated_at: None,
        };
        self.store.insert(&ticket)?;

        Ok(ticket)
    }

    pub fn get(&self, id: Ulid) -> Result<EventTicket, Error> {
        self.store.get(id)
    }

    /// Remove and return an offering. Sold records are not cascaded; their
    /// `event_ticket_id` references simply go stale.
    pub fn delete(&mut self, id: Ulid) -> Result<EventTicket, Error> {
        self.store.remove(id)
    }

    /// Count one sale against the offering's capacity.
    pub fn increment_sold(&mut self, env: &mut dyn Env, id: Ulid) -> Result<EventTicket, Error> {
        let mut ticket = self.store.get(id)?;
        if !ticket.is_available() {
            return Err(Error::SoldOut { id });
        }

        ticket.total_ticket_sold += 1;
        ticket.updated_at = Some(env.now());
        self.store.insert(&ticket)?;

        Ok(ticket)
    }

    /// Return one sold unit to the offering's capacity.
    ///
    /// Tolerates a deleted offering (returns `None`): refunds may arrive
    /// after the catalog entry is gone.
    pub fn decrement_sold(
        &mut self,
        env: &mut dyn Env,
        id: Ulid,
    ) -> Result<Option<EventTicket>, Error> {
        let Some(mut ticket) = self.store.try_get(id)? else {
            return Ok(None);
        };

        ticket.total_ticket_sold = ticket.total_ticket_sold.saturating_sub(1);
        ticket.updated_at = Some(env.now());
        self.store.insert(&ticket)?;

        Ok(Some(ticket))
    }

    /// Place or re-assert an advisory reservation.
    ///
    /// Exclusive per offering: once held, only the same principal may
    /// re-assert it. Idempotent for the holder. No expiry; `reserved_at`
    /// is stamped for a future timeout mechanism.
    pub fn set_reserved_by(
        &mut self,
        env: &mut dyn Env,
        id: Ulid,
        principal: &str,
    ) -> Result<EventTicket, Error> {
        let mut ticket = self.store.get(id)?;

        if let Some(holder) = &ticket.reserved_by
            && holder != principal
        {
            return Err(Error::ReservationConflict {
                id,
                held_by: holder.clone(),
            });
        }

        let now = env.now();
        ticket.reserved_by = Some(principal.to_string());
        ticket.reserved_at = Some(now);
        ticket.updated_at = Some(now);
        self.store.insert(&ticket)?;

        Ok(ticket)
    }

    /// True while the offering has unsold capacity. Reservations do not
    /// consume capacity.
    pub fn check_availability(&self, id: Ulid) -> Result<bool, Error> {
        Ok(self.store.get(id)?.is_available())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{SeqEnv, test_memory};

    fn fresh() -> (Inventory, SeqEnv) {
        (Inventory::init(test_memory(0)), SeqEnv::default())
    }

    fn offering(inv: &mut Inventory, env: &mut SeqEnv, capacity: u32) -> EventTicket {
        inv.create(
            env,
            "Gig".to_string(),
            "front row".to_string(),
            2_500,
            capacity,
        )
        .unwrap()
    }

    #[test]
    fn create_starts_unsold_and_unreserved() {
        let (mut inv, mut env) = fresh();
        let ticket = offering(&mut inv, &mut env, 10);

        assert_eq!(ticket.total_ticket_sold, 0);
        assert_eq!(ticket.reserved_by, None);
        assert_eq!(ticket.updated_at, None);
        assert_eq!(inv.get(ticket.id).unwrap(), ticket);
    }

    #[test]
    fn increment_sold_stops_at_capacity() {
        let (mut inv, mut env) = fresh();
        let ticket = offering(&mut inv, &mut env, 2);

        assert_eq!(
            inv.increment_sold(&mut env, ticket.id)
                .unwrap()
                .total_ticket_sold,
            1
        );
        assert_eq!(
            inv.increment_sold(&mut env, ticket.id)
                .unwrap()
                .total_ticket_sold,
            2
        );
        assert!(matches!(
            inv.increment_sold(&mut env, ticket.id).unwrap_err(),
            Error::SoldOut { .. }
        ));
    }

    #[test]
    fn increment_sold_stamps_updated_at() {
        let (mut inv, mut env) = fresh();
        let ticket = offering(&mut inv, &mut env, 1);

        let updated = inv.increment_sold(&mut env, ticket.id).unwrap();
        assert!(updated.updated_at.is_some());
        assert_eq!(updated.created_at, ticket.created_at);
    }

    #[test]
    fn reservation_is_exclusive_but_idempotent() {
        let (mut inv, mut env) = fresh();
        let ticket = offering(&mut inv, &mut env, 5);

        inv.set_reserved_by(&mut env, ticket.id, "alice").unwrap();
        inv.set_reserved_by(&mut env, ticket.id, "alice").unwrap();

        let err = inv.set_reserved_by(&mut env, ticket.id, "bob").unwrap_err();
        assert_eq!(
            err,
            Error::ReservationConflict {
                id: ticket.id,
                held_by: "alice".to_string(),
            }
        );
    }

    #[test]
    fn reservation_does_not_consume_capacity() {
        let (mut inv, mut env) = fresh();
        let ticket = offering(&mut inv, &mut env, 1);

        inv.set_reserved_by(&mut env, ticket.id, "alice").unwrap();
        assert!(inv.check_availability(ticket.id).unwrap());
    }

    #[test]
    fn delete_removes_and_returns() {
        let (mut inv, mut env) = fresh();
        let ticket = offering(&mut inv, &mut env, 1);

        let removed = inv.delete(ticket.id).unwrap();
        assert_eq!(removed.id, ticket.id);
        assert!(matches!(
            inv.get(ticket.id).unwrap_err(),
            Error::NotFound { .. }
        ));
    }

    #[test]
    fn decrement_sold_tolerates_missing_offering() {
        let (mut inv, mut env) = fresh();

        assert_eq!(
            inv.decrement_sold(&mut env, Ulid::from_u128(404)).unwrap(),
            None
        );
    }

    #[test]
    fn list_all_is_id_ordered() {
        let (mut inv, mut env) = fresh();
        let a = offering(&mut inv, &mut env, 1);
        let b = offering(&mut inv, &mut env, 1);

        let ids: Vec<Ulid> = inv.list_all().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }
}
