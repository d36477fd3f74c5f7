use crate::{
    error::Error,
    types::{Timestamp, Ulid},
};

///
/// Env
///
/// Identifier generation and wall-clock retrieval are the engine's only
/// ambient effects; injecting them keeps every operation deterministic
/// under test.
///

pub trait Env {
    /// Current wall-clock time.
    fn now(&self) -> Timestamp;

    /// Freshly generated globally-unique identifier.
    fn next_id(&mut self) -> Result<Ulid, Error>;
}

///
/// CanisterEnv
/// Production capabilities: canister clock + global monotonic ULIDs.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct CanisterEnv;

impl Env for CanisterEnv {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn next_id(&mut self) -> Result<Ulid, Error> {
        Ulid::try_generate().map_err(Error::from)
    }
}
