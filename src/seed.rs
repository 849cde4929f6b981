//! Demo data loader
//!
//! Fills each empty collection with a small, fixed data set so a fresh
//! install has one account per role and something on every dashboard.
//! Collections that already hold records are never touched, so seeding on
//! every start is safe.

use crate::storage::{
    Application, ApplicationStatus, Call, CallStatus, Entity, EntityId, EntityStore, KvStorage,
    Role, StorageResult, User,
};

/// What a seeding pass inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedReport {
    pub users: usize,
    pub calls: usize,
    pub applications: usize,
}

impl SeedReport {
    /// True when every collection already had data
    pub fn is_empty(&self) -> bool {
        self.users == 0 && self.calls == 0 && self.applications == 0
    }
}

impl std::fmt::Display for SeedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "seeded {} users, {} calls, {} applications",
            self.users, self.calls, self.applications
        )
    }
}

/// Ensure `users`, `calls` and `applications` are non-empty
pub fn seed_system<S: KvStorage>(store: &mut EntityStore<S>) -> StorageResult<SeedReport> {
    let report = SeedReport {
        users: seed_if_empty(store, demo_users)?,
        calls: seed_if_empty(store, demo_calls)?,
        applications: seed_if_empty(store, demo_applications)?,
    };

    if report.is_empty() {
        tracing::debug!("Seed skipped, collections already populated");
    } else {
        tracing::info!("Demo data loaded: {}", report);
    }
    Ok(report)
}

fn seed_if_empty<S: KvStorage, E: Entity>(
    store: &mut EntityStore<S>,
    records: fn() -> Vec<E>,
) -> StorageResult<usize> {
    if store.count::<E>()? > 0 {
        return Ok(0);
    }
    let records = records();
    store.save_all(&records)?;
    Ok(records.len())
}

fn with_id<E: Entity>(id: u64, mut record: E) -> E {
    record.set_id(EntityId(id));
    record
}

/// One account per role, plus a second applicant with history
pub fn demo_users() -> Vec<User> {
    vec![
        with_id(
            1,
            User::new("Administración Central", "admin@becas.org", "admin123", Role::Admin),
        ),
        with_id(
            2,
            User::new("Eva Técnica", "evaluador@becas.org", "eval123", Role::Evaluator),
        ),
        with_id(
            3,
            User::new("Juan Pérez", "postulante@becas.org", "post123", Role::Applicant),
        ),
        with_id(
            4,
            User::new("María López", "maria@becas.org", "maria123", Role::Applicant),
        ),
    ]
}

/// Two open calls and one closed
pub fn demo_calls() -> Vec<Call> {
    vec![
        with_id(
            1,
            Call::new(
                "Beca Excelencia Académica",
                "Grado",
                "Cobertura total de matrícula para promedios superiores a 9.",
                "2026-12-15",
            ),
        ),
        with_id(
            2,
            Call::new(
                "Subsidio de Investigación",
                "Posgrado",
                "Financiamiento para proyectos de tesis doctoral.",
                "2026-11-30",
            ),
        ),
        with_id(
            3,
            Call::new(
                "Beca Deportiva 2025",
                "Deportiva",
                "Apoyo a deportistas de alto rendimiento.",
                "2025-12-31",
            )
            .status(CallStatus::Closed),
        ),
    ]
}

/// History for the second applicant only
pub fn demo_applications() -> Vec<Application> {
    vec![
        with_id(
            1,
            Application::new(EntityId(4), EntityId(1), "2026-09-01"),
        ),
        with_id(
            2,
            Application::new(EntityId(4), EntityId(3), "2025-11-20")
                .status(ApplicationStatus::Approved),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{IdGenerator, MemoryStorage};

    fn empty_store() -> EntityStore<MemoryStorage> {
        EntityStore::with_id_generator(MemoryStorage::new(), IdGenerator::sequential())
    }

    #[test]
    fn test_seed_fills_empty_store() {
        let mut store = empty_store();
        let report = seed_system(&mut store).unwrap();

        assert_eq!(
            report,
            SeedReport {
                users: 4,
                calls: 3,
                applications: 2
            }
        );
        let stats = store.stats().unwrap();
        assert_eq!((stats.users, stats.calls, stats.applications), (4, 3, 2));
    }

    #[test]
    fn test_seed_is_idempotent() {
        let mut store = empty_store();
        seed_system(&mut store).unwrap();
        let before = store.storage().clone();

        let report = seed_system(&mut store).unwrap();
        assert!(report.is_empty());
        assert_eq!(
            store.storage().get("calls").unwrap(),
            before.get("calls").unwrap()
        );
    }

    #[test]
    fn test_seed_only_fills_missing_collections() {
        let mut store = empty_store();
        store
            .create(Call::new("Propia", "Grado", "", "2027-01-01"))
            .unwrap();

        let report = seed_system(&mut store).unwrap();
        assert_eq!(report.calls, 0);
        assert_eq!(report.users, 4);
        assert_eq!(store.count::<Call>().unwrap(), 1);
    }

    #[test]
    fn test_demo_references_resolve() {
        let users = demo_users();
        let calls = demo_calls();
        for app in demo_applications() {
            assert!(users.iter().any(|u| u.id == app.user_id));
            assert!(calls.iter().any(|c| c.id == app.call_id));
        }
    }

    #[test]
    fn test_created_ids_follow_seeded_ids() {
        let mut store = empty_store();
        seed_system(&mut store).unwrap();
        let call = store
            .create(Call::new("Nueva", "Grado", "", "2027-01-01"))
            .unwrap();
        assert_eq!(call.id, EntityId(4));
    }
}
