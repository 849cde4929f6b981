//! Evaluator work queue

use becas::portal::render::EMPTY_QUEUE;
use becas::portal::{Action, EvaluatorDashboard, QueueRow};
use leptos::*;

use crate::components::{PanelHeader, StatusBadge};
use crate::state::PortalState;

#[component]
pub fn EvaluatorQueue(dash: EvaluatorDashboard) -> impl IntoView {
    let rows = if dash.queue.is_empty() {
        view! { <p class="empty">{EMPTY_QUEUE}</p> }.into_view()
    } else {
        view! {
            <table>
                <thead>
                    <tr>
                        <th>"Solicitante"</th>
                        <th>"Beca"</th>
                        <th>"Estado"</th>
                        <th>"Acciones"</th>
                    </tr>
                </thead>
                <tbody>
                    {dash.queue.into_iter().map(|row| view! { <QueueLine row=row /> }).collect_view()}
                </tbody>
            </table>
        }
        .into_view()
    };

    view! {
        <PanelHeader
            title="Panel Técnico de Evaluación"
            badge_class="badge-Evaluador"
            badge=dash.user_name
        />
        <section id="evaluation-queue">
            <h3>"Casos por Resolver"</h3>
            {rows}
        </section>
    }
}

#[component]
fn QueueLine(row: QueueRow) -> impl IntoView {
    let state = use_context::<PortalState>().expect("PortalState not found");
    let id = row.application_id;

    view! {
        <tr>
            <td>{row.applicant_name}</td>
            <td>{row.call_title}</td>
            <td><StatusBadge status=row.status /></td>
            <td>
                <button
                    class="btn-small btn-edit"
                    on:click=move |_| state.dispatch(Action::OpenEvaluation(id))
                >
                    "Calificar"
                </button>
            </td>
        </tr>
    }
}
