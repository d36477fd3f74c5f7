use crate::{
    error::Error,
    model::EntityKind,
    serialize::{deserialize, serialize},
    types::Ulid,
};
use canic_cdk::structures::{
    BTreeMap, DefaultMemoryImpl, Storable, memory::VirtualMemory, storable::Bound,
};
use std::{borrow::Cow, marker::PhantomData};
use thiserror::Error as ThisError;

/// Backing memory for every store in this crate.
pub type Memory = VirtualMemory<DefaultMemoryImpl>;

/// Max serialized bytes for a single row to keep value loads bounded.
/// Both entity types are a few hundred bytes; this leaves generous slack
/// for long titles and descriptions.
pub const MAX_ROW_BYTES: u32 = 64 * 1024;

///
/// RawRowError
///

#[derive(Debug, ThisError)]
pub enum RawRowError {
    #[error("row exceeds max size: {len} bytes (limit {MAX_ROW_BYTES})")]
    TooLarge { len: usize },
}

impl From<RawRowError> for Error {
    fn from(err: RawRowError) -> Self {
        Self::internal(err.to_string())
    }
}

///
/// RawRow
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawRow(Vec<u8>);

impl RawRow {
    pub fn try_new(bytes: Vec<u8>) -> Result<Self, RawRowError> {
        if bytes.len() > MAX_ROW_BYTES as usize {
            return Err(RawRowError::TooLarge { len: bytes.len() });
        }
        Ok(Self(bytes))
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn try_decode<E: EntityKind>(&self) -> Result<E, Error> {
        deserialize::<E>(&self.0).map_err(|err| {
            Error::corruption(format!("{} row failed to decode: {err}", E::ENTITY))
        })
    }
}

impl Storable for RawRow {
    fn to_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.0)
    }

    fn from_bytes(bytes: Cow<'_, [u8]>) -> Self {
        Self(bytes.into_owned())
    }

    fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    const BOUND: Bound = Bound::Bounded {
        max_size: MAX_ROW_BYTES,
        is_fixed_size: false,
    };
}

///
/// RawKey
///
/// Fixed-size storage key holding the entity's ULID bytes. Byte order
/// equals ULID order, so map iteration order is id order.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct RawKey([u8; Ulid::STORED_SIZE as usize]);

impl RawKey {
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; Ulid::STORED_SIZE as usize] {
        &self.0
    }

    #[must_use]
    pub const fn to_ulid(self) -> Ulid {
        Ulid::from_bytes(self.0)
    }
}

impl From<Ulid> for RawKey {
    fn from(id: Ulid) -> Self {
        Self(id.to_bytes())
    }
}

impl Storable for RawKey {
    fn to_bytes(&self) -> Cow<'_, [u8]> {
        Cow::Borrowed(&self.0)
    }

    fn from_bytes(bytes: Cow<'_, [u8]>) -> Self {
        let mut out = [0u8; Ulid::STORED_SIZE as usize];
        if bytes.len() == out.len() {
            out.copy_from_slice(bytes.as_ref());
        }
        Self(out)
    }

    fn into_bytes(self) -> Vec<u8> {
        self.0.to_vec()
    }

    const BOUND: Bound = Bound::Bounded {
        max_size: Ulid::STORED_SIZE,
        is_fixed_size: true,
    };
}

///
/// EntityStore
///
/// Typed wrapper over one stable ordered map. Each entity type owns one
/// store instance; rows are CBOR, bounded at `MAX_ROW_BYTES`.
///

pub struct EntityStore<E: EntityKind> {
    map: BTreeMap<RawKey, RawRow, Memory>,
    _marker: PhantomData<E>,
}

impl<E: EntityKind> EntityStore<E> {
    /// Initialize a store with the provided backing memory.
    #[must_use]
    pub fn init(memory: Memory) -> Self {
        Self {
            map: BTreeMap::init(memory),
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: Ulid) -> bool {
        self.map.contains_key(&RawKey::from(id))
    }

    /// Load a row if present; decode failure is corruption, not absence.
    pub fn try_get(&self, id: Ulid) -> Result<Option<E>, Error> {
        self.map
            .get(&RawKey::from(id))
            .map(|row| row.try_decode::<E>())
            .transpose()
    }

    /// Load a row, failing `NotFound` when absent.
    pub fn get(&self, id: Ulid) -> Result<E, Error> {
        self.try_get(id)?
            .ok_or_else(|| Error::not_found(E::ENTITY, id))
    }

    /// Serialize and write one row, keyed by the entity's own id.
    pub fn insert(&mut self, entity: &E) -> Result<(), Error> {
        let bytes = serialize(entity)?;
        let row = RawRow::try_new(bytes)?;
        self.map.insert(RawKey::from(entity.key()), row);

        Ok(())
    }

    /// Remove and return one row, failing `NotFound` when absent.
    pub fn remove(&mut self, id: Ulid) -> Result<E, Error> {
        self.map
            .remove(&RawKey::from(id))
            .ok_or_else(|| Error::not_found(E::ENTITY, id))?
            .try_decode::<E>()
    }

    /// All rows in key (id) order.
    pub fn iter_all(&self) -> Result<Vec<E>, Error> {
        self.map
            .iter()
            .map(|entry| entry.value().try_decode::<E>())
            .collect()
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::Entity, test_support::test_memory};
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
    struct Dummy {
        id: Ulid,
        label: String,
    }

    impl EntityKind for Dummy {
        const ENTITY: Entity = Entity::EventTicket;

        fn key(&self) -> Ulid {
            self.id
        }
    }

    fn dummy(n: u128) -> Dummy {
        Dummy {
            id: Ulid::from_u128(n),
            label: format!("row-{n}"),
        }
    }

    #[test]
    fn insert_then_get_roundtrips() {
        let mut store = EntityStore::<Dummy>::init(test_memory(0));
        let row = dummy(7);

        store.insert(&row).unwrap();
        assert_eq!(store.get(row.id).unwrap(), row);
        assert_eq!(store.len(), 1);
        assert!(store.contains(row.id));
        assert!(!store.contains(Ulid::from_u128(8)));
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = EntityStore::<Dummy>::init(test_memory(0));
        let err = store.get(Ulid::from_u128(9)).unwrap_err();

        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn remove_returns_the_row_then_not_found() {
        let mut store = EntityStore::<Dummy>::init(test_memory(0));
        let row = dummy(3);
        store.insert(&row).unwrap();

        assert_eq!(store.remove(row.id).unwrap(), row);
        assert!(matches!(
            store.remove(row.id).unwrap_err(),
            Error::NotFound { .. }
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn iteration_is_in_id_order() {
        let mut store = EntityStore::<Dummy>::init(test_memory(0));
        for n in [5u128, 1, 9, 2] {
            store.insert(&dummy(n)).unwrap();
        }

        let ids: Vec<Ulid> = store.iter_all().unwrap().iter().map(|d| d.id).collect();
        let expected: Vec<Ulid> = [1u128, 2, 5, 9].into_iter().map(Ulid::from_u128).collect();

        assert_eq!(ids, expected);
    }

    #[test]
    fn oversized_row_is_rejected() {
        let bytes = vec![0u8; MAX_ROW_BYTES as usize + 1];
        let err = RawRow::try_new(bytes).unwrap_err();

        assert!(matches!(err, RawRowError::TooLarge { .. }));
    }

    #[test]
    fn truncated_row_decodes_as_corruption() {
        let bytes = serialize(&dummy(1)).unwrap();
        let row = RawRow::try_new(bytes[..bytes.len() - 1].to_vec()).unwrap();
        let err = row.try_decode::<Dummy>().unwrap_err();

        assert!(matches!(err, Error::Corruption { .. }));
    }

    #[test]
    fn raw_key_ordering_matches_ulid_ordering() {
        let mut ids: Vec<Ulid> = [9u128, 4, 200, 1].into_iter().map(Ulid::from_u128).collect();
        let mut keys: Vec<RawKey> = ids.iter().copied().map(RawKey::from).collect();

        ids.sort();
        keys.sort();

        let from_keys: Vec<Ulid> = keys.into_iter().map(RawKey::to_ulid).collect();
        assert_eq!(from_keys, ids);
    }
}
