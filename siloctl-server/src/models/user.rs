//! User input validation

use serde_json::Value;

use super::ValidationError;

/// Validated user email (non-empty string)
///
/// Uniqueness is left to the `users.email` constraint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate the `email` field of a create-user body.
    ///
    /// # Example
    /// ```
    /// use serde_json::json;
    /// use siloctl_server::models::Email;
    ///
    /// assert!(Email::from_json(Some(&json!("ana@example.com"))).is_ok());
    /// assert!(Email::from_json(Some(&json!(""))).is_err());
    /// assert!(Email::from_json(None).is_err());
    /// ```
    pub fn from_json(value: Option<&Value>) -> Result<Self, ValidationError> {
        match value {
            Some(Value::String(s)) if !s.is_empty() => Ok(Self(s.clone())),
            _ => Err(ValidationError::EmailRequired),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// User id taken from a path segment or a mutation payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Parse a path segment such as `/users/42/silobags`.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ValidationError::InvalidUserId)
    }

    /// Read the `user_id` field of a batch insert.
    pub fn from_json(value: Option<&Value>) -> Result<Self, ValidationError> {
        value
            .and_then(super::as_integer)
            .map(Self)
            .ok_or(ValidationError::InvalidUserId)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}
