use crate::{
    env::Env,
    error::Error,
    model::TicketSold,
    store::{EntityStore, Memory},
    types::Ulid,
};

///
/// Ledger
///
/// Individual sold-ticket records. Ownership changes rewrite `username`
/// only; `event_ticket_id` is never touched after creation, and the
/// foreign key is validated by the caller, not here.
///

pub struct Ledger {
    store: EntityStore<TicketSold>,
}

impl Ledger {
    #[must_use]
    pub fn init(memory: Memory) -> Self {
        Self {
            store: EntityStore::init(memory),
        }
    }

    pub fn get(&self, id: Ulid) -> Result<TicketSold, Error> {
        self.store.get(id)
    }

    /// Record one sold unit under a fresh id.
    pub fn create(
        &mut self,
        env: &mut dyn Env,
        event_ticket_id: Ulid,
        username: String,
    ) -> Result<TicketSold, Error> {
        let sold = TicketSold {
            id: env.next_id()?,
            event_ticket_id,
            username,
        };
        self.store.insert(&sold)?;

        Ok(sold)
    }

    /// Hand the record to a new holder. Used by both resale and transfer.
    pub fn reassign_owner(&mut self, id: Ulid, new_username: String) -> Result<TicketSold, Error> {
        let mut sold = self.store.get(id)?;
        sold.username = new_username;
        self.store.insert(&sold)?;

        Ok(sold)
    }

    /// Remove and return one record. Used by refund.
    pub fn remove(&mut self, id: Ulid) -> Result<TicketSold, Error> {
        self.store.remove(id)
    }

    /// All live records referencing one offering, in id order. Records
    /// whose offering has been deleted still show up under its old id.
    pub fn list_for_event(&self, event_ticket_id: Ulid) -> Result<Vec<TicketSold>, Error> {
        Ok(self
            .store
            .iter_all()?
            .into_iter()
            .filter(|sold| sold.event_ticket_id == event_ticket_id)
            .collect())
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{SeqEnv, test_memory};

    fn fresh() -> (Ledger, SeqEnv) {
        (Ledger::init(test_memory(0)), SeqEnv::default())
    }

    #[test]
    fn create_then_get_roundtrips() {
        let (mut ledger, mut env) = fresh();
        let event = Ulid::from_u128(1);

        let sold = ledger.create(&mut env, event, "alice".to_string()).unwrap();
        assert_eq!(ledger.get(sold.id).unwrap(), sold);
        assert_eq!(sold.event_ticket_id, event);
        assert_eq!(sold.username, "alice");
    }

    #[test]
    fn reassign_owner_changes_username_only() {
        let (mut ledger, mut env) = fresh();
        let sold = ledger
            .create(&mut env, Ulid::from_u128(1), "alice".to_string())
            .unwrap();

        let updated = ledger.reassign_owner(sold.id, "bob".to_string()).unwrap();
        assert_eq!(updated.username, "bob");
        assert_eq!(updated.id, sold.id);
        assert_eq!(updated.event_ticket_id, sold.event_ticket_id);
    }

    #[test]
    fn reassign_owner_missing_is_not_found() {
        let (mut ledger, _env) = fresh();
        let err = ledger
            .reassign_owner(Ulid::from_u128(404), "bob".to_string())
            .unwrap_err();

        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn remove_then_get_is_not_found() {
        let (mut ledger, mut env) = fresh();
        let sold = ledger
            .create(&mut env, Ulid::from_u128(1), "alice".to_string())
            .unwrap();

        ledger.remove(sold.id).unwrap();
        assert!(matches!(
            ledger.get(sold.id).unwrap_err(),
            Error::NotFound { .. }
        ));
    }

    #[test]
    fn list_for_event_filters_by_reference() {
        let (mut ledger, mut env) = fresh();
        let gig = Ulid::from_u128(1);
        let expo = Ulid::from_u128(2);

        let a = ledger.create(&mut env, gig, "alice".to_string()).unwrap();
        ledger.create(&mut env, expo, "bob".to_string()).unwrap();
        let c = ledger.create(&mut env, gig, "carol".to_string()).unwrap();

        let for_gig = ledger.list_for_event(gig).unwrap();
        assert_eq!(for_gig, vec![a, c]);
    }
}
