pub mod cli;
pub mod client;
pub mod config;
pub mod controller;
pub mod form;
pub mod tea;
pub mod testing;

pub use client::{is_transport_error, ContactService, ErrorKind, SubmitError};
pub use config::ClientConfig;
pub use controller::{ContactFormController, FormSubmitEvent, FormView, SubmitEvent};
pub use form::{FormData, FormErrors, FormField, SubmitStatus};
