//! Modal Dialogs
//!
//! Call editor, application confirmation and evaluation form.

use becas::portal::action::form;
use becas::portal::{Action, CallForm, Modal};
use becas::storage::{ApplicationStatus, CallStatus, EntityId};
use leptos::*;

use crate::events::submit_form;
use crate::state::PortalState;

/// Frame with a close button around the open modal's form
#[component]
pub fn ModalDialog(modal: Modal) -> impl IntoView {
    let state = use_context::<PortalState>().expect("PortalState not found");

    let (id, body) = match modal {
        Modal::Call(call) => ("convocatoria-modal", view! { <CallModal call=call /> }.into_view()),
        Modal::Application {
            call_id,
            call_title,
        } => (
            "postulacion-modal",
            view! { <ApplicationModal call_id=call_id call_title=call_title /> }.into_view(),
        ),
        Modal::Evaluation {
            application_id,
            applicant_name,
            status,
        } => (
            "evaluacion-modal",
            view! {
                <EvaluationModal
                    application_id=application_id
                    applicant_name=applicant_name
                    status=status
                />
            }
            .into_view(),
        ),
    };

    view! {
        <div id=id class="modal">
            <div class="modal-content">
                <button class="btn-close" on:click=move |_| state.dispatch(Action::CloseModal)>
                    "×"
                </button>
                {body}
            </div>
        </div>
    }
}

#[component]
fn CallModal(call: CallForm) -> impl IntoView {
    let state = use_context::<PortalState>().expect("PortalState not found");
    let heading = if call.is_edit() {
        "Editar Convocatoria"
    } else {
        "Nueva Convocatoria"
    };

    // A stored state outside the two known ones stays selectable
    let mut statuses = vec![CallStatus::Open, CallStatus::Closed];
    if let CallStatus::Other(_) = &call.status {
        statuses.push(call.status.clone());
    }
    let options = statuses
        .into_iter()
        .map(|status| {
            let selected = status == call.status;
            let label = status.to_string();
            view! { <option value=label.clone() selected=selected>{label}</option> }
        })
        .collect_view();

    view! {
        <h2>{heading}</h2>
        <form on:submit=move |ev| submit_form(state, form::CALL, &ev)>
            {call.id.map(|id| view! { <input type="hidden" name="id" value=id.to_string() /> })}
            <input type="text" name="titulo" value=call.title placeholder="Título" required />
            <input type="text" name="tipo" value=call.kind placeholder="Tipo" required />
            <input type="date" name="fechaCierre" value=call.closing_date required />
            <textarea name="descripcion" placeholder="Requisitos" prop:value=call.description></textarea>
            <select name="estado">{options}</select>
            <button type="submit" class="btn-gold">"Guardar"</button>
        </form>
    }
}

#[component]
fn ApplicationModal(call_id: EntityId, call_title: String) -> impl IntoView {
    let state = use_context::<PortalState>().expect("PortalState not found");

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        state.dispatch(Action::SubmitApplication { call_id });
    };

    view! {
        <h2>"Solicitar Beca"</h2>
        <p>{call_title}</p>
        <form on:submit=on_submit>
            <button type="submit" class="btn-gold">"Enviar Solicitud"</button>
        </form>
    }
}

#[component]
fn EvaluationModal(
    application_id: EntityId,
    applicant_name: String,
    status: ApplicationStatus,
) -> impl IntoView {
    let state = use_context::<PortalState>().expect("PortalState not found");

    let options = ApplicationStatus::evaluation_choices()
        .iter()
        .map(|choice| {
            let selected = *choice == status;
            let label = choice.to_string();
            view! { <option value=label.clone() selected=selected>{label}</option> }
        })
        .collect_view();

    view! {
        <h2>"Calificar Postulación"</h2>
        <p>"Solicitante: "<strong id="eval-applicant-name">{applicant_name}</strong></p>
        <form on:submit=move |ev| submit_form(state, form::EVALUATION, &ev)>
            <input type="hidden" name="id" value=application_id.to_string() />
            <select name="estado">{options}</select>
            <button type="submit" class="btn-gold">"Guardar Dictamen"</button>
        </form>
    }
}
