//! Applicant Page
//!
//! The applicant's own applications and the calls still open.

use becas::portal::render::{NO_APPLICATIONS, NO_OPEN_CALLS};
use becas::portal::{Action, ApplicantDashboard, OwnApplicationRow};
use becas::storage::Call;
use leptos::*;

use crate::components::{PanelHeader, StatusBadge};
use crate::state::PortalState;

#[component]
pub fn ApplicantPortal(dash: ApplicantDashboard) -> impl IntoView {
    let history = if dash.applications.is_empty() {
        view! { <p class="empty">{NO_APPLICATIONS}</p> }.into_view()
    } else {
        view! {
            <table>
                <thead>
                    <tr>
                        <th>"Beca"</th>
                        <th>"Fecha"</th>
                        <th>"Estado"</th>
                    </tr>
                </thead>
                <tbody>
                    {dash
                        .applications
                        .into_iter()
                        .map(|row| view! { <HistoryLine row=row /> })
                        .collect_view()}
                </tbody>
            </table>
        }
        .into_view()
    };

    let no_calls = dash.open_calls.is_empty();

    view! {
        <PanelHeader
            title="Portal del Beneficiario"
            badge_class="badge-Postulante"
            badge=dash.user_name
        />

        <section id="my-applications">
            <h3>"Mis Gestiones"</h3>
            {history}
        </section>

        <section id="available-scholarships">
            <h3>"Servicios Disponibles"</h3>
            <div class="cards-grid">
                {no_calls.then(|| view! { <p class="empty">{NO_OPEN_CALLS}</p> })}
                {dash.open_calls.into_iter().map(|call| view! { <CallCard call=call /> }).collect_view()}
            </div>
        </section>
    }
}

#[component]
fn HistoryLine(row: OwnApplicationRow) -> impl IntoView {
    view! {
        <tr>
            <td>{row.call_title}</td>
            <td>{row.submitted_on}</td>
            <td><StatusBadge status=row.status /></td>
        </tr>
    }
}

#[component]
fn CallCard(call: Call) -> impl IntoView {
    let state = use_context::<PortalState>().expect("PortalState not found");
    let id = call.id;

    view! {
        <div class="scholarship-card" data-call-id=id.to_string()>
            <div>
                <span class="type-tag">{call.kind}</span>
                <h3>{call.title}</h3>
                <p class="description">{call.description}</p>
            </div>
            <div class="footer">
                <span>"Cierre: "{call.closing_date}</span>
                <button class="btn-gold" on:click=move |_| state.dispatch(Action::ApplyToCall(id))>
                    "Solicitar"
                </button>
            </div>
        </div>
    }
}
