//! End-to-end flows through the public API

use becas::portal::render::{NO_APPLICATIONS, NO_OPEN_CALLS};
use becas::portal::{approval_rate, DashboardView, FormFields, Notice, Portal};
use becas::storage::{
    Application, ApplicationStatus, Call, CallPatch, CallStatus, EntityId, EntityStore,
    FileStorage, MemoryStorage, User,
};
use tempfile::TempDir;

fn fields(pairs: &[(&str, &str)]) -> FormFields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn booted() -> Portal<MemoryStorage> {
    let (portal, _) = Portal::boot(EntityStore::new(MemoryStorage::new())).unwrap();
    portal.with_today(|| "2026-10-16".to_string())
}

fn login<S: becas::storage::KvStorage>(portal: &mut Portal<S>, email: &str, password: &str) {
    portal
        .dispatch_form("login", &fields(&[("email", email), ("password", password)]))
        .unwrap();
    assert_eq!(portal.notice(), None, "login as {} failed", email);
}

#[test]
fn admin_total_matches_application_count() {
    let mut portal = booted();
    login(&mut portal, "admin@becas.org", "admin123");

    let expected = portal.store().get_all::<Application>().unwrap().len();
    let DashboardView::Admin(dashboard) = portal.view().unwrap() else {
        panic!("expected admin dashboard");
    };
    assert_eq!(dashboard.report.total, expected);
    assert_eq!(dashboard.report.approved, 1);

    let html = portal.render().unwrap();
    assert!(html.contains(&format!(
        "data-metric=\"total-applications\">{}</p>",
        expected
    )));
}

#[test]
fn fresh_applicant_sees_open_calls_and_placeholder() {
    let mut portal = booted();
    // Juan has no applications in the demo data
    login(&mut portal, "postulante@becas.org", "post123");

    let DashboardView::Applicant(dashboard) = portal.view().unwrap() else {
        panic!("expected applicant dashboard");
    };
    assert!(dashboard.applications.is_empty());
    let titles: Vec<_> = dashboard.open_calls.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["Beca Excelencia Académica", "Subsidio de Investigación"]);

    let html = portal.render().unwrap();
    assert!(html.contains(NO_APPLICATIONS));
    assert!(!html.contains(NO_OPEN_CALLS));
    assert_eq!(html.matches("data-action=\"apply\"").count(), 2);
}

#[test]
fn approval_rate_examples() {
    assert_eq!(approval_rate(0, 0), 0.0);
    assert_eq!(approval_rate(1, 4), 25.0);
}

#[test]
fn second_application_to_same_call_is_rejected() {
    let mut portal = booted();
    login(&mut portal, "postulante@becas.org", "post123");
    let before = portal.store().count::<Application>().unwrap();

    portal.dispatch_click("apply", Some("1")).unwrap();
    assert!(portal.modal().is_some());
    portal
        .dispatch_form("application", &fields(&[("convocatoriaId", "1")]))
        .unwrap();
    assert_eq!(portal.notice(), None);
    assert_eq!(portal.store().count::<Application>().unwrap(), before + 1);

    portal.dispatch_click("apply", Some("1")).unwrap();
    assert_eq!(portal.notice(), Some(&Notice::DuplicateApplication));
    assert!(portal.modal().is_none());

    portal
        .dispatch_form("application", &fields(&[("convocatoriaId", "1")]))
        .unwrap();
    assert_eq!(portal.notice(), Some(&Notice::DuplicateApplication));
    assert_eq!(portal.store().count::<Application>().unwrap(), before + 1);
}

#[test]
fn evaluator_clears_the_queue() {
    let mut portal = booted();
    login(&mut portal, "evaluador@becas.org", "eval123");

    let DashboardView::Evaluator(dashboard) = portal.view().unwrap() else {
        panic!("expected evaluator dashboard");
    };
    assert_eq!(dashboard.queue.len(), 1);
    let row = &dashboard.queue[0];
    assert_eq!(row.applicant_name, "María López");
    let id = row.application_id.to_string();

    portal
        .dispatch_form("evaluation", &fields(&[("id", id.as_str()), ("estado", "Rechazada")]))
        .unwrap();

    let DashboardView::Evaluator(dashboard) = portal.view().unwrap() else {
        panic!("expected evaluator dashboard");
    };
    assert!(dashboard.queue.is_empty());
}

#[test]
fn store_update_and_delete_contracts() {
    let mut store = EntityStore::new(MemoryStorage::new());
    let created = store
        .create(Call::new("Beca Norte", "Grado", "Cupos limitados", "2027-02-01"))
        .unwrap();
    assert_eq!(store.get_by_id::<Call>(created.id).unwrap(), Some(created.clone()));

    let patch = CallPatch {
        status: Some(CallStatus::Closed),
        ..CallPatch::default()
    };
    let updated = store.update::<Call>(created.id, patch.clone()).unwrap().unwrap();
    assert_eq!(updated.status, CallStatus::Closed);
    assert_eq!(updated.title, created.title);
    assert_eq!(updated.closing_date, created.closing_date);

    let snapshot = store.get_all::<Call>().unwrap();
    assert_eq!(store.update::<Call>(EntityId(1), patch).unwrap(), None);
    assert_eq!(store.get_all::<Call>().unwrap(), snapshot);

    assert!(!store.delete::<Call>(EntityId(1)).unwrap());
    assert!(store.delete::<Call>(created.id).unwrap());
    assert!(store.get_all::<Call>().unwrap().is_empty());
}

#[test]
fn file_storage_survives_restart() {
    let dir = TempDir::new().unwrap();

    {
        let store = EntityStore::new(FileStorage::open(dir.path()).unwrap());
        let (mut portal, report) = Portal::boot(store).unwrap();
        assert_eq!(report.users, 4);
        login(&mut portal, "maria@becas.org", "maria123");
        portal.dispatch_click("apply", Some("2")).unwrap();
        portal
            .dispatch_form("application", &fields(&[("convocatoriaId", "2")]))
            .unwrap();
    }

    let store = EntityStore::new(FileStorage::open(dir.path()).unwrap());
    let (portal, report) = Portal::boot(store).unwrap();
    assert!(report.is_empty());

    let session: Option<User> = portal.session().unwrap();
    assert_eq!(session.map(|u| u.email), Some("maria@becas.org".to_string()));

    let mine: Vec<_> = portal
        .store()
        .get_all::<Application>()
        .unwrap()
        .into_iter()
        .filter(|a| a.user_id == EntityId(4))
        .collect();
    assert_eq!(mine.len(), 3);
    assert!(mine
        .iter()
        .any(|a| a.call_id == EntityId(2) && a.status == ApplicationStatus::Pending));
    assert!(dir.path().join("applications.json").exists());
}

#[test]
fn logout_returns_to_anonymous() {
    let mut portal = booted();
    login(&mut portal, "admin@becas.org", "admin123");
    portal.dispatch_click("logout", None).unwrap();
    assert_eq!(portal.view().unwrap(), DashboardView::Anonymous);
}
