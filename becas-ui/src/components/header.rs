//! Dashboard header with the user badge and logout button

use becas::portal::Action;
use leptos::*;

use crate::state::PortalState;

#[component]
pub fn PanelHeader(
    title: &'static str,
    /// Role-specific badge class
    badge_class: &'static str,
    #[prop(into)]
    badge: String,
) -> impl IntoView {
    let state = use_context::<PortalState>().expect("PortalState not found");

    view! {
        <header class="admin-actions">
            <div>
                <h1>{title}</h1>
                <span class=format!("user-badge {}", badge_class)>{badge}</span>
            </div>
            <button class="btn-cancel" on:click=move |_| state.dispatch(Action::Logout)>
                "Cerrar Sesión"
            </button>
        </header>
    }
}
