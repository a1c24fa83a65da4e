/// Update function for the contact form
///
/// Every state change of the form happens here. The function is pure:
/// network calls and logging are returned as commands.

use crate::client::error::{ErrorKind, SubmitError};
use crate::client::graphql::ContactFormResponse;
use crate::form::{validate_form, FormData, FormErrors, FormField, SubmitStatus};
use crate::tea::command::Command;
use crate::tea::message::{Message, SubmissionOutcome};
use crate::tea::model::{Model, MutationState};
use crate::tea::UpdateResult;

pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent successfully.";
pub const APPLICATION_FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";
pub const VALIDATION_FAILURE_MESSAGE: &str = "Please check your form data and try again.";
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Failed to send message. Please try again later.";

/// Main update function that processes messages and returns updated model with commands
pub fn update(model: Model, message: Message) -> UpdateResult<Model> {
    match message {
        Message::FieldChanged(field, value) => update_field(model, field, value),
        Message::Validate => {
            let mut model = model;
            validate(&mut model);
            UpdateResult::just_model(model)
        }
        Message::Submit => update_submit(model),
        Message::Reset => update_reset(model),
        Message::SubmissionCompleted(outcome) => update_completed(model, outcome),
    }
}

/// Recompute the error set from scratch. Returns whether the form is valid.
pub fn validate(model: &mut Model) -> bool {
    model.errors = validate_form(&model.form);
    model.errors.is_empty()
}

fn update_field(mut model: Model, field: FormField, value: String) -> UpdateResult<Model> {
    model.form.set(field, value);

    // Only the edited field's error goes away; no re-validation
    model.errors.clear_field(field);

    if model.submit_status != SubmitStatus::Idle {
        model.clear_status();
    }

    UpdateResult::just_model(model)
}

fn update_submit(mut model: Model) -> UpdateResult<Model> {
    if model.mutation.is_pending() {
        tracing::debug!("Submission already in flight, ignoring submit");
        return UpdateResult::just_model(model);
    }

    if !validate(&mut model) {
        tracing::debug!("Contact form has {} validation error(s)", model.errors.len());
        return UpdateResult::just_model(model);
    }

    model.clear_status();

    let command = Command::submit(model.form.to_payload());
    if let Command::SubmitContactForm { request_id, .. } = &command {
        model.active_request = Some(*request_id);
    }
    model.mutation = MutationState::Pending;

    UpdateResult::with_command(model, command)
}

fn update_reset(mut model: Model) -> UpdateResult<Model> {
    model.form = FormData::default();
    model.errors = FormErrors::new();
    model.clear_status();
    UpdateResult::just_model(model)
}

fn update_completed(mut model: Model, outcome: SubmissionOutcome) -> UpdateResult<Model> {
    if model.active_request != Some(outcome.request_id) {
        tracing::debug!(request_id = %outcome.request_id, "Dropping result of stale submission");
        return UpdateResult::just_model(model);
    }

    model.active_request = None;
    model.last_attempts = Some(outcome.attempts);

    match outcome.result {
        Ok(response) => UpdateResult::just_model(apply_response(model, response)),
        Err(error) => {
            let kind = error.kind();
            model.mutation = MutationState::Failed(kind);
            model.submit_status = SubmitStatus::Error;
            model.submit_message = failure_message(&error).to_string();
            UpdateResult::with_command(model, Command::ReportError(error))
        }
    }
}

fn apply_response(mut model: Model, response: ContactFormResponse) -> Model {
    if response.success {
        tracing::info!("Contact form submitted");
        model.mutation = MutationState::Succeeded;
        model.submit_status = SubmitStatus::Success;
        model.submit_message = SUCCESS_MESSAGE.to_string();
        model.form = FormData::default();
        model.errors = FormErrors::new();
    } else {
        tracing::warn!("Backend rejected contact form: {:?}", response.message);
        model.mutation = MutationState::Failed(ErrorKind::Application);
        model.submit_status = SubmitStatus::Error;
        model.submit_message = response
            .message
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| APPLICATION_FALLBACK_MESSAGE.to_string());
    }
    model
}

/// User-facing text for a thrown submission error
pub fn failure_message(error: &SubmitError) -> &'static str {
    match error.kind() {
        ErrorKind::Validation => VALIDATION_FAILURE_MESSAGE,
        _ => TRANSPORT_FAILURE_MESSAGE,
    }
}
