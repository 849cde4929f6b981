//! App Root Component
//!
//! Boots the portal over `localStorage` and switches pages on the
//! composed screen.

use becas::portal::{DashboardView, Portal};
use becas::storage::EntityStore;
use leptos::*;

use crate::components::ModalDialog;
use crate::pages::{AdminDashboard, ApplicantPortal, EvaluatorQueue, LoginPage};
use crate::state::{log_error, provide_portal_state, BrowserPortal, PortalState};
use crate::storage::LocalStorage;

fn boot() -> Result<BrowserPortal, String> {
    let storage = LocalStorage::open().map_err(|e| e.to_string())?;
    let (portal, _) = Portal::boot(EntityStore::new(storage)).map_err(|e| e.to_string())?;
    Ok(portal)
}

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    let portal = match boot() {
        Ok(portal) => portal,
        Err(err) => {
            log_error("Portal failed to start", &err);
            return view! {
                <div id="app"><p class="error">{format!("No se pudo iniciar el portal: {}", err)}</p></div>
            }
            .into_view();
        }
    };

    provide_portal_state(portal);
    let state = use_context::<PortalState>().expect("PortalState not found");

    view! {
        <div id="app">
            <section id="dashboard-section">
                {move || match state.view.get() {
                    DashboardView::Anonymous => view! { <LoginPage /> }.into_view(),
                    DashboardView::Admin(dash) => view! { <AdminDashboard dash=dash /> }.into_view(),
                    DashboardView::Evaluator(dash) => view! { <EvaluatorQueue dash=dash /> }.into_view(),
                    DashboardView::Applicant(dash) => view! { <ApplicantPortal dash=dash /> }.into_view(),
                }}
            </section>

            {move || state.modal.get().map(|modal| view! { <ModalDialog modal=modal /> })}
        </div>
    }
    .into_view()
}
