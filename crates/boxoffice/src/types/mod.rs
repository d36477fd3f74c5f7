mod timestamp;
mod ulid;

pub use timestamp::Timestamp;
pub use ulid::{Ulid, UlidDecodeError, UlidError};
