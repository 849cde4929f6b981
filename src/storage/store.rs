//! Entity Store
//!
//! Generic CRUD over named collections. Each collection lives in one
//! storage slot as a JSON array and is read and rewritten wholesale:
//!
//! ```text
//! get_all:  slot → JSON array → Vec<E>
//! mutation: get_all → modify Vec<E> → save_all → slot
//! ```
//!
//! Read-modify-write is not atomic. The store is single-actor: mutating
//! methods take `&mut self`.

use crate::storage::backend::KvStorage;
use crate::storage::error::StorageResult;
use crate::storage::ids::IdGenerator;
use crate::storage::types::{Application, AsEntityId, Call, Entity, EntityId, User};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Collection store over a key-value backend
#[derive(Debug)]
pub struct EntityStore<S> {
    storage: S,
    ids: IdGenerator,
}

impl<S: KvStorage> EntityStore<S> {
    /// Create a store issuing clock-seeded ids
    pub fn new(storage: S) -> Self {
        Self::with_id_generator(storage, IdGenerator::new())
    }

    pub fn with_id_generator(storage: S, ids: IdGenerator) -> Self {
        Self { storage, ids }
    }

    /// Backing storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Full collection for `E`, empty if the slot was never written
    pub fn get_all<E: Entity>(&self) -> StorageResult<Vec<E>> {
        Ok(self
            .read_value::<Option<Vec<E>>>(E::COLLECTION)?
            .flatten()
            .unwrap_or_default())
    }

    /// Overwrite the collection for `E`
    pub fn save_all<E: Entity>(&mut self, records: &[E]) -> StorageResult<()> {
        tracing::debug!(collection = E::COLLECTION, count = records.len(), "Saving collection");
        self.write_value(E::COLLECTION, &records)
    }

    /// First record whose id equals the coerced `id`
    pub fn get_by_id<E: Entity>(&self, id: impl AsEntityId) -> StorageResult<Option<E>> {
        let Some(id) = id.as_entity_id() else {
            return Ok(None);
        };
        Ok(self.get_all::<E>()?.into_iter().find(|r| r.id() == id))
    }

    /// Assign a fresh id to `record`, append it and persist
    pub fn create<E: Entity>(&mut self, mut record: E) -> StorageResult<E> {
        let mut records = self.get_all::<E>()?;
        let floor = records.iter().map(Entity::id).max().unwrap_or_default();
        record.set_id(self.ids.next_id(floor));
        records.push(record.clone());
        self.save_all(&records)?;

        tracing::debug!(collection = E::COLLECTION, id = %record.id(), "Created record");
        Ok(record)
    }

    /// Apply `patch` to the record with `id` and persist.
    ///
    /// Returns `None` without writing anything if no record matches.
    pub fn update<E: Entity>(
        &mut self,
        id: impl AsEntityId,
        patch: E::Patch,
    ) -> StorageResult<Option<E>> {
        let Some(id) = id.as_entity_id() else {
            return Ok(None);
        };
        let mut records = self.get_all::<E>()?;
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };
        record.apply(patch);
        let merged = record.clone();
        self.save_all(&records)?;

        tracing::debug!(collection = E::COLLECTION, id = %id, "Updated record");
        Ok(Some(merged))
    }

    /// Remove the record with `id`. Returns whether one was removed;
    /// a missing id leaves the slot untouched.
    pub fn delete<E: Entity>(&mut self, id: impl AsEntityId) -> StorageResult<bool> {
        let Some(id) = id.as_entity_id() else {
            return Ok(false);
        };
        let mut records = self.get_all::<E>()?;
        let before = records.len();
        records.retain(|r| r.id() != id);
        if records.len() == before {
            return Ok(false);
        }
        self.save_all(&records)?;

        tracing::debug!(collection = E::COLLECTION, id = %id, "Deleted record");
        Ok(true)
    }

    /// Number of records in the collection for `E`
    pub fn count<E: Entity>(&self) -> StorageResult<usize> {
        Ok(self.get_all::<E>()?.len())
    }

    /// Decode an arbitrary JSON slot. Empty slots read as `None`.
    pub fn read_value<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.storage.get(key)? {
            Some(raw) if !raw.trim().is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
            _ => Ok(None),
        }
    }

    /// Encode `value` as JSON into a slot
    pub fn write_value<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value)?;
        self.storage.set(key, &raw)
    }

    /// Clear a slot
    pub fn clear(&mut self, key: &str) -> StorageResult<()> {
        self.storage.remove(key)
    }

    /// Record counts per collection
    pub fn stats(&self) -> StorageResult<StoreStats> {
        Ok(StoreStats {
            users: self.count::<User>()?,
            calls: self.count::<Call>()?,
            applications: self.count::<Application>()?,
        })
    }

    /// Highest id issued by this store so far
    pub fn last_issued_id(&self) -> EntityId {
        EntityId(self.ids.last_issued())
    }
}

/// Record counts across the portal's collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    pub users: usize,
    pub calls: usize,
    pub applications: usize,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Users: {}, Calls: {}, Applications: {}",
            self.users, self.calls, self.applications
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::backend::MemoryStorage;
    use crate::storage::error::StorageError;
    use crate::storage::types::{ApplicationPatch, ApplicationStatus, CallPatch, CallStatus, Role};

    fn create_test_store() -> EntityStore<MemoryStorage> {
        EntityStore::with_id_generator(MemoryStorage::new(), IdGenerator::sequential())
    }

    fn sample_call(title: &str) -> Call {
        Call::new(title, "Grado", "Cobertura total", "2026-12-31")
    }

    #[test]
    fn test_get_all_unset_is_empty() {
        let store = create_test_store();
        assert!(store.get_all::<Call>().unwrap().is_empty());
        assert_eq!(store.stats().unwrap(), StoreStats::default());
    }

    #[test]
    fn test_get_all_tolerates_null_and_blank_slots() {
        let mut store = create_test_store();
        store.storage_mut().set("calls", "null").unwrap();
        store.storage_mut().set("users", "  ").unwrap();
        assert!(store.get_all::<Call>().unwrap().is_empty());
        assert!(store.get_all::<User>().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_slot_is_a_fault() {
        let mut store = create_test_store();
        store.storage_mut().set("calls", "{not json").unwrap();
        assert!(matches!(
            store.get_all::<Call>(),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn test_create_then_get_by_id() {
        let mut store = create_test_store();
        let call = sample_call("Beca Excelencia");

        let stored = store.create(call.clone()).unwrap();
        let found = store.get_by_id::<Call>(stored.id).unwrap().unwrap();

        let mut expected = call;
        expected.id = stored.id;
        assert_eq!(found, expected);
    }

    #[test]
    fn test_get_by_id_coerces_strings() {
        let mut store = create_test_store();
        let stored = store.create(sample_call("Beca Rural")).unwrap();

        let as_text = stored.id.to_string();
        assert_eq!(
            store.get_by_id::<Call>(as_text.as_str()).unwrap(),
            Some(stored.clone())
        );
        assert_eq!(store.get_by_id::<Call>("not-an-id").unwrap(), None);
    }

    #[test]
    fn test_string_ids_on_disk_match_numeric_lookup() {
        let mut store = create_test_store();
        store
            .storage_mut()
            .set(
                "calls",
                r#"[{"id":"5","titulo":"Beca Legado","tipo":"Posgrado","descripcion":"","fechaCierre":"2026-06-01","estado":"Abierta"}]"#,
            )
            .unwrap();

        let call = store.get_by_id::<Call>(5u64).unwrap().unwrap();
        assert_eq!(call.title, "Beca Legado");
    }

    #[test]
    fn test_create_ids_increase_within_one_tick() {
        let mut store = create_test_store();
        let a = store.create(sample_call("A")).unwrap();
        let b = store.create(sample_call("B")).unwrap();
        let c = store.create(sample_call("C")).unwrap();
        assert!(a.id < b.id && b.id < c.id);
        assert_eq!(store.last_issued_id(), c.id);
    }

    #[test]
    fn test_create_skips_past_existing_ids() {
        let mut store = create_test_store();
        let mut seeded = sample_call("Seeded");
        seeded.id = EntityId(100);
        store.save_all(&[seeded]).unwrap();

        let created = store.create(sample_call("New")).unwrap();
        assert_eq!(created.id, EntityId(101));
    }

    #[test]
    fn test_update_merges_patch() {
        let mut store = create_test_store();
        let stored = store.create(sample_call("Beca Norte")).unwrap();

        let merged = store
            .update::<Call>(
                stored.id,
                CallPatch {
                    status: Some(CallStatus::Closed),
                    closing_date: Some("2026-01-31".to_string()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(merged.title, stored.title);
        assert_eq!(merged.kind, stored.kind);
        assert_eq!(merged.description, stored.description);
        assert_eq!(merged.status, CallStatus::Closed);
        assert_eq!(merged.closing_date, "2026-01-31");
        assert_eq!(store.get_by_id::<Call>(stored.id).unwrap(), Some(merged));
    }

    #[test]
    fn test_update_missing_id_writes_nothing() {
        let mut store = create_test_store();
        store.create(sample_call("Only")).unwrap();
        let before = store.storage().get("calls").unwrap();

        let result = store
            .update::<Call>(9_999u64, CallPatch::default())
            .unwrap();

        assert_eq!(result, None);
        assert_eq!(store.storage().get("calls").unwrap(), before);
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let mut store = create_test_store();
        let a = store.create(sample_call("A")).unwrap();
        let b = store.create(sample_call("B")).unwrap();

        assert!(store.delete::<Call>(a.id).unwrap());
        let remaining = store.get_all::<Call>().unwrap();
        assert_eq!(remaining, vec![b]);

        assert!(!store.delete::<Call>(a.id).unwrap());
        assert!(!store.delete::<Call>("garbage").unwrap());
        assert_eq!(store.count::<Call>().unwrap(), 1);
    }

    #[test]
    fn test_collections_are_independent() {
        let mut store = create_test_store();
        let user = store
            .create(User::new("Lucía", "lucia@becas.org", "1234", Role::Applicant))
            .unwrap();
        let call = store.create(sample_call("Beca Sur")).unwrap();
        let app = store
            .create(Application::new(user.id, call.id, "2026-03-01"))
            .unwrap();

        store
            .update::<Application>(app.id, ApplicationPatch::status(ApplicationStatus::Approved))
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.to_string(), "Users: 1, Calls: 1, Applications: 1");
        assert_eq!(
            store.get_by_id::<Application>(app.id).unwrap().unwrap().status,
            ApplicationStatus::Approved
        );
    }

    #[test]
    fn test_quota_fault_propagates() {
        let mut store = EntityStore::with_id_generator(
            MemoryStorage::with_quota(64),
            IdGenerator::sequential(),
        );
        let err = store
            .create(Call::new("x".repeat(80), "Grado", "", "2026-12-31"))
            .unwrap_err();
        assert!(matches!(err, StorageError::Quota { .. }));
        assert!(store.get_all::<Call>().unwrap().is_empty());
    }
}
