//! HTTP client adapter and contact form submission

pub mod error;
pub mod graphql;
pub mod http;
pub mod retry;

pub use error::{is_transport_error, ErrorKind, SubmitError, SubmitResult};
pub use graphql::{
    ContactFormData, ContactFormResponse, ContactService, GraphQLContactService,
    SUBMIT_CONTACT_FORM_MUTATION,
};
pub use http::HttpClient;
pub use retry::{RetryConfig, RetryManager, RetryStats};
