//! Dashboard composition
//!
//! The screen is a pure function of the session and the store contents:
//!
//! ```text
//! session = None                → Anonymous
//! session.rol = Admin           → AdminDashboard
//! session.rol = Evaluador       → EvaluatorDashboard
//! session.rol = anything else   → ApplicantDashboard
//! ```
//!
//! Views are recomputed in full after every mutation, never patched.

use crate::storage::{
    Application, ApplicationStatus, Call, EntityId, EntityStore, KvStorage, Role, StorageResult,
    User,
};

/// Shown in place of a join target that no longer exists
pub const PLACEHOLDER: &str = "N/A";

/// Which dashboard a role lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardKind {
    Admin,
    Evaluator,
    Applicant,
}

impl DashboardKind {
    /// Unknown roles share the applicant dashboard
    pub fn for_role(role: &Role) -> Self {
        match role {
            Role::Admin => DashboardKind::Admin,
            Role::Evaluator => DashboardKind::Evaluator,
            Role::Applicant | Role::Other(_) => DashboardKind::Applicant,
        }
    }
}

/// The four mutually exclusive screens
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    /// No session: login and registration forms
    Anonymous,
    Admin(AdminDashboard),
    Evaluator(EvaluatorDashboard),
    Applicant(ApplicantDashboard),
}

impl DashboardView {
    pub fn kind(&self) -> Option<DashboardKind> {
        match self {
            DashboardView::Anonymous => None,
            DashboardView::Admin(_) => Some(DashboardKind::Admin),
            DashboardView::Evaluator(_) => Some(DashboardKind::Evaluator),
            DashboardView::Applicant(_) => Some(DashboardKind::Applicant),
        }
    }

    /// Calls listed on this screen: every call for admins, open calls for
    /// applicants, `None` for screens without a call list
    pub fn visible_calls(&self) -> Option<&[Call]> {
        match self {
            DashboardView::Admin(dash) => Some(&dash.calls),
            DashboardView::Applicant(dash) => Some(&dash.open_calls),
            DashboardView::Anonymous | DashboardView::Evaluator(_) => None,
        }
    }
}

/// Application totals shown on the admin report cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApprovalReport {
    pub total: usize,
    pub approved: usize,
}

impl ApprovalReport {
    pub fn from_applications(applications: &[Application]) -> Self {
        Self {
            total: applications.len(),
            approved: applications
                .iter()
                .filter(|a| a.status == ApplicationStatus::Approved)
                .count(),
        }
    }

    /// Percentage of applications approved; 0 when there are none
    pub fn approval_rate(&self) -> f64 {
        approval_rate(self.approved, self.total)
    }
}

/// `approved / total * 100`, defined as 0 for `total == 0`
pub fn approval_rate(approved: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    approved as f64 / total as f64 * 100.0
}

/// Reports plus the editable call table
#[derive(Debug, Clone, PartialEq)]
pub struct AdminDashboard {
    pub user_name: String,
    pub report: ApprovalReport,
    pub calls: Vec<Call>,
}

/// One row of the evaluator's work queue
#[derive(Debug, Clone, PartialEq)]
pub struct QueueRow {
    pub application_id: EntityId,
    pub applicant_name: String,
    pub call_title: String,
    pub status: ApplicationStatus,
}

/// Applications awaiting evaluation
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorDashboard {
    pub user_name: String,
    pub queue: Vec<QueueRow>,
}

/// One of the applicant's own applications
#[derive(Debug, Clone, PartialEq)]
pub struct OwnApplicationRow {
    pub application_id: EntityId,
    pub call_title: String,
    pub submitted_on: String,
    pub status: ApplicationStatus,
}

/// The applicant's history plus the calls still accepting applications
#[derive(Debug, Clone, PartialEq)]
pub struct ApplicantDashboard {
    pub user_name: String,
    pub applications: Vec<OwnApplicationRow>,
    pub open_calls: Vec<Call>,
}

/// Build the screen for `session` from the current store contents
pub fn compose<S: KvStorage>(
    store: &EntityStore<S>,
    session: Option<&User>,
) -> StorageResult<DashboardView> {
    let Some(user) = session else {
        return Ok(DashboardView::Anonymous);
    };

    let view = match DashboardKind::for_role(&user.role) {
        DashboardKind::Admin => DashboardView::Admin(admin_dashboard(store, user)?),
        DashboardKind::Evaluator => DashboardView::Evaluator(evaluator_dashboard(store, user)?),
        DashboardKind::Applicant => DashboardView::Applicant(applicant_dashboard(store, user)?),
    };
    Ok(view)
}

fn admin_dashboard<S: KvStorage>(store: &EntityStore<S>, user: &User) -> StorageResult<AdminDashboard> {
    let applications = store.get_all::<Application>()?;
    Ok(AdminDashboard {
        user_name: user.name.clone(),
        report: ApprovalReport::from_applications(&applications),
        calls: store.get_all::<Call>()?,
    })
}

fn evaluator_dashboard<S: KvStorage>(
    store: &EntityStore<S>,
    user: &User,
) -> StorageResult<EvaluatorDashboard> {
    let users = store.get_all::<User>()?;
    let calls = store.get_all::<Call>()?;

    let queue = store
        .get_all::<Application>()?
        .into_iter()
        .filter(|a| a.status.awaits_evaluation())
        .map(|a| QueueRow {
            application_id: a.id,
            applicant_name: user_name(&users, a.user_id),
            call_title: call_title(&calls, a.call_id),
            status: a.status,
        })
        .collect();

    Ok(EvaluatorDashboard {
        user_name: user.name.clone(),
        queue,
    })
}

fn applicant_dashboard<S: KvStorage>(
    store: &EntityStore<S>,
    user: &User,
) -> StorageResult<ApplicantDashboard> {
    let calls = store.get_all::<Call>()?;

    let applications = store
        .get_all::<Application>()?
        .into_iter()
        .filter(|a| a.user_id == user.id)
        .map(|a| OwnApplicationRow {
            application_id: a.id,
            call_title: call_title(&calls, a.call_id),
            submitted_on: a.submitted_on,
            status: a.status,
        })
        .collect();

    let open_calls = calls.into_iter().filter(Call::is_open).collect();

    Ok(ApplicantDashboard {
        user_name: user.name.clone(),
        applications,
        open_calls,
    })
}

/// Display name for `id`, or the placeholder
pub fn user_name(users: &[User], id: EntityId) -> String {
    users
        .iter()
        .find(|u| u.id == id)
        .map(|u| u.name.clone())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Title for `id`, or the placeholder
pub fn call_title(calls: &[Call], id: EntityId) -> String {
    calls
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.title.clone())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}
