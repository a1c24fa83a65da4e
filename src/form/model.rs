//! Contact form field state

use crate::client::graphql::ContactFormData;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Fields of the contact form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    FullName,
    Email,
    Message,
}

impl FormField {
    /// All fields in display order
    pub const ALL: [FormField; 3] = [FormField::FullName, FormField::Email, FormField::Message];

    /// Wire/input name of the field
    pub fn name(&self) -> &'static str {
        match self {
            FormField::FullName => "fullName",
            FormField::Email => "email",
            FormField::Message => "message",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            FormField::FullName => "Full name",
            FormField::Email => "Email",
            FormField::Message => "Message",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fullName" | "full_name" => Ok(FormField::FullName),
            "email" => Ok(FormField::Email),
            "message" => Ok(FormField::Message),
            other => Err(format!("Unknown form field: {}", other)),
        }
    }
}

/// Current values of the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub full_name: String,
    pub email: String,
    pub message: String,
}

impl FormData {
    /// Value of a single field
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::FullName => &self.full_name,
            FormField::Email => &self.email,
            FormField::Message => &self.message,
        }
    }

    /// Replace the value of a single field
    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::FullName => self.full_name = value,
            FormField::Email => self.email = value,
            FormField::Message => self.message = value,
        }
    }

    /// Whether every field is empty
    pub fn is_empty(&self) -> bool {
        FormField::ALL.iter().all(|field| self.get(*field).is_empty())
    }

    /// Build the mutation payload
    pub fn to_payload(&self) -> ContactFormData {
        ContactFormData {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
        }
    }
}

/// Per-field validation messages.
///
/// Fields without a problem have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    entries: BTreeMap<FormField, String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.entries.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.entries.insert(field, message.into());
    }

    /// Remove one entry, returning whether it existed
    pub fn clear_field(&mut self, field: FormField) -> bool {
        self.entries.remove(&field).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.entries.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.entries.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

/// Outcome shown to the user for the latest submission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Success,
    Error,
}

impl fmt::Display for SubmitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitStatus::Idle => write!(f, "idle"),
            SubmitStatus::Success => write!(f, "success"),
            SubmitStatus::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_round_trip() {
        for field in FormField::ALL {
            assert_eq!(field.name().parse::<FormField>().unwrap(), field);
        }
        assert!("phone".parse::<FormField>().is_err());
    }

    #[test]
    fn test_set_and_get() {
        let mut data = FormData::default();
        assert!(data.is_empty());

        data.set(FormField::Email, "jane@example.com".to_string());
        assert_eq!(data.get(FormField::Email), "jane@example.com");
        assert_eq!(data.get(FormField::FullName), "");
        assert!(!data.is_empty());
    }

    #[test]
    fn test_clear_single_error() {
        let mut errors = FormErrors::new();
        errors.insert(FormField::Email, "Email is required");
        errors.insert(FormField::Message, "Message is required");

        assert!(errors.clear_field(FormField::Email));
        assert!(!errors.clear_field(FormField::Email));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(FormField::Message), Some("Message is required"));
    }
}
