//! Contact form data model and validation

pub mod model;
pub mod validation;

pub use model::{FormData, FormErrors, FormField, SubmitStatus};
pub use validation::{is_valid_email, validate_form};
