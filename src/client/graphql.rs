//! GraphQL transport for the contact form mutation

use crate::client::error::{SubmitError, SubmitResult};
use crate::client::http::HttpClient;
use crate::config::ClientConfig;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Mutation document sent when no override is configured
pub const SUBMIT_CONTACT_FORM_MUTATION: &str = r#"mutation SubmitContactForm($input: SubmitContactFormInput!) {
  submitContactForm(input: $input) {
    success
    message
  }
}"#;

/// GraphQL error codes that mean the input itself was rejected
const VALIDATION_CODES: &[&str] = &["BAD_USER_INPUT", "GRAPHQL_VALIDATION_FAILED"];

/// GraphQL error categories that mean the input itself was rejected
const VALIDATION_CATEGORIES: &[&str] = &["user", "validation"];

/// Payload carried by the contact mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFormData {
    pub full_name: String,
    pub email: String,
    pub message: String,
}

impl ContactFormData {
    /// Check the payload is structurally complete before it goes on the wire
    pub fn check_payload(&self) -> SubmitResult<()> {
        let missing: Vec<&str> = [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("message", &self.message),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SubmitError::validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )))
        }
    }
}

/// Backend answer to a contact submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactFormResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GraphQL request envelope
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: V,
}

/// GraphQL response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLResponse<T> {
    pub data: Option<T>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<GraphQLError>,
}

/// A single entry of the GraphQL `errors` array
#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extensions: HashMap<String, Value>,
}

/// Servers may send an explicit `null` where a list or map is optional
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl GraphQLError {
    /// Whether the server flagged this error as caused by bad input
    pub fn is_validation(&self) -> bool {
        let matches_any = |key: &str, accepted: &[&str]| {
            self.extensions
                .get(key)
                .and_then(Value::as_str)
                .map(|value| accepted.iter().any(|a| a.eq_ignore_ascii_case(value)))
                .unwrap_or(false)
        };

        matches_any("code", VALIDATION_CODES) || matches_any("category", VALIDATION_CATEGORIES)
    }
}

#[derive(Debug, Serialize)]
struct SubmitVariables<'a> {
    input: &'a ContactFormData,
}

/// Something that can deliver a contact form to the backend
#[async_trait]
pub trait ContactService: Send + Sync {
    /// Perform a single submission attempt
    async fn submit(&self, data: &ContactFormData) -> SubmitResult<ContactFormResponse>;
}

/// `ContactService` that posts the mutation to a GraphQL endpoint
#[derive(Debug, Clone)]
pub struct GraphQLContactService {
    http: HttpClient,
    path: String,
    query: String,
    mutation_field: String,
}

impl GraphQLContactService {
    /// Create a service posting to `path` on the client's base address
    pub fn new(http: HttpClient, path: impl Into<String>) -> Self {
        Self {
            http,
            path: path.into(),
            query: SUBMIT_CONTACT_FORM_MUTATION.to_string(),
            mutation_field: "submitContactForm".to_string(),
        }
    }

    /// Create the service from configuration
    pub fn from_config(config: &ClientConfig) -> SubmitResult<Self> {
        let http = HttpClient::new(&config.base_url, config.request_timeout)?;
        let mut service = Self::new(http, config.graphql_path.clone());
        service.mutation_field = config.mutation_field.clone();
        if let Some(query) = &config.mutation_query {
            service.query = query.clone();
        }
        Ok(service)
    }

    /// Replace the mutation document and the response field it populates
    pub fn with_mutation(mut self, query: impl Into<String>, field: impl Into<String>) -> Self {
        self.query = query.into();
        self.mutation_field = field.into();
        self
    }
}

#[async_trait]
impl ContactService for GraphQLContactService {
    async fn submit(&self, data: &ContactFormData) -> SubmitResult<ContactFormResponse> {
        data.check_payload()?;

        let request = GraphQLRequest {
            query: &self.query,
            variables: SubmitVariables { input: data },
        };

        let response: GraphQLResponse<HashMap<String, Value>> =
            self.http.post_json(&self.path, &request).await?;

        extract_response(response, &self.mutation_field)
    }
}

/// Pull the mutation result out of a GraphQL envelope
pub fn extract_response(
    response: GraphQLResponse<HashMap<String, Value>>,
    field: &str,
) -> SubmitResult<ContactFormResponse> {
    if let Some(first) = response.errors.first() {
        let message = response
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        return Err(if response.errors.iter().any(GraphQLError::is_validation) {
            SubmitError::validation(message)
        } else {
            tracing::debug!("GraphQL error extensions: {:?}", first.extensions);
            SubmitError::graphql(message)
        });
    }

    let mut data = response
        .data
        .ok_or_else(|| SubmitError::invalid_response("GraphQL response has no data"))?;

    let payload = data
        .remove(field)
        .filter(|value| !value.is_null())
        .ok_or_else(|| {
            SubmitError::invalid_response(format!("GraphQL response has no `{}` field", field))
        })?;

    Ok(serde_json::from_value(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> GraphQLResponse<HashMap<String, Value>> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_payload_serializes_camel_case() {
        let data = ContactFormData {
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            message: "Hello there, friend".to_string(),
        };

        let value = serde_json::to_value(SubmitVariables { input: &data }).unwrap();
        assert_eq!(
            value,
            json!({
                "input": {
                    "fullName": "Jane Doe",
                    "email": "jane@example.com",
                    "message": "Hello there, friend"
                }
            })
        );
    }

    #[test]
    fn test_check_payload_lists_missing_fields() {
        let data = ContactFormData {
            full_name: " ".to_string(),
            email: "jane@example.com".to_string(),
            message: String::new(),
        };

        let error = data.check_payload().unwrap_err();
        assert!(error.is_validation());
        assert_eq!(
            error.to_string(),
            "Invalid form data: missing required fields: fullName, message"
        );
    }

    #[test]
    fn test_extract_success() {
        let response = envelope(json!({
            "data": { "submitContactForm": { "success": true, "message": "Sent" } }
        }));

        let result = extract_response(response, "submitContactForm").unwrap();
        assert!(result.success);
        assert_eq!(result.message.as_deref(), Some("Sent"));
    }

    #[test]
    fn test_extract_failure_without_message() {
        let response = envelope(json!({
            "data": { "submitContactForm": { "success": false } }
        }));

        let result = extract_response(response, "submitContactForm").unwrap();
        assert!(!result.success);
        assert_eq!(result.message, None);
    }

    #[test]
    fn test_extract_validation_error() {
        let response = envelope(json!({
            "data": null,
            "errors": [
                { "message": "Invalid email", "extensions": { "category": "user" } }
            ]
        }));

        let error = extract_response(response, "submitContactForm").unwrap_err();
        assert_eq!(error, SubmitError::validation("Invalid email"));
    }

    #[test]
    fn test_explicit_nulls_are_tolerated() {
        let response = envelope(json!({
            "data": { "submitContactForm": { "success": true, "message": null } },
            "errors": null
        }));
        let result = extract_response(response, "submitContactForm").unwrap();
        assert!(result.success);

        let response = envelope(json!({
            "data": null,
            "errors": [
                { "message": "Invalid email", "extensions": null },
                { "message": "Try again", "extensions": { "code": "BAD_USER_INPUT" } }
            ]
        }));
        let error = extract_response(response, "submitContactForm").unwrap_err();
        assert_eq!(error, SubmitError::validation("Invalid email; Try again"));

        let response = envelope(json!({
            "errors": [{ "message": "Resolver crashed", "extensions": null }]
        }));
        let error = extract_response(response, "submitContactForm").unwrap_err();
        assert_eq!(error, SubmitError::graphql("Resolver crashed"));
    }

    #[test]
    fn test_extract_internal_graphql_error() {
        let response = envelope(json!({
            "errors": [
                { "message": "Resolver crashed", "extensions": { "code": "INTERNAL_SERVER_ERROR" } },
                { "message": "Try later" }
            ]
        }));

        let error = extract_response(response, "submitContactForm").unwrap_err();
        assert_eq!(error, SubmitError::graphql("Resolver crashed; Try later"));
        assert!(error.is_retryable());
    }

    #[test]
    fn test_extract_missing_field() {
        let response = envelope(json!({ "data": { "somethingElse": {} } }));
        let error = extract_response(response, "submitContactForm").unwrap_err();
        assert!(matches!(error, SubmitError::InvalidResponse { .. }));
    }
}
