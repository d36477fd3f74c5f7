//! Deterministic capabilities and fresh backing memories for tests.
//! Not part of the public surface.

use crate::{
    env::Env,
    error::Error,
    store::Memory,
    types::{Timestamp, Ulid},
};
use canic_cdk::structures::{
    DefaultMemoryImpl,
    memory::{MemoryId, MemoryManager},
};

/// Fresh in-memory stable memory; each call is fully isolated.
#[must_use]
pub fn test_memory(id: u8) -> Memory {
    let manager = MemoryManager::init(DefaultMemoryImpl::default());

    manager.get(MemoryId::new(id))
}

///
/// SeqEnv
/// Sequential ids from 1 and a fixed, manually advanced clock.
///

#[derive(Clone, Copy, Debug)]
pub struct SeqEnv {
    next: u128,
    clock: Timestamp,
}

impl SeqEnv {
    #[must_use]
    pub const fn at(clock: Timestamp) -> Self {
        Self { next: 1, clock }
    }

    /// Advance the clock by one second.
    pub const fn tick(&mut self) {
        self.clock = Timestamp::from_seconds(self.clock.seconds() + 1);
    }

    #[must_use]
    pub const fn clock(&self) -> Timestamp {
        self.clock
    }
}

impl Default for SeqEnv {
    fn default() -> Self {
        Self::at(Timestamp::from_seconds(1_700_000_000))
    }
}

impl Env for SeqEnv {
    fn now(&self) -> Timestamp {
        self.clock
    }

    fn next_id(&mut self) -> Result<Ulid, Error> {
        let id = Ulid::from_u128(self.next);
        self.next += 1;

        Ok(id)
    }
}
