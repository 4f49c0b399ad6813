//! Client model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::ClientId;
use super::resource::{Document, ResourceKind};

/// A customer that projects are delivered for
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    #[serde(rename = "_id")]
    pub id: ClientId,

    pub name: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub company: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Client {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ClientId::new(),
            name: name.into(),
            email: None,
            phone: None,
            company: None,
            address: None,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ClientValidationError> {
        if self.name.trim().is_empty() {
            return Err(ClientValidationError::EmptyName);
        }

        if let Some(email) = &self.email {
            let valid = email
                .split_once('@')
                .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
                .unwrap_or(false);
            if !valid {
                return Err(ClientValidationError::InvalidEmail(email.clone()));
            }
        }

        Ok(())
    }
}

impl Document for Client {
    type Id = ClientId;

    const KIND: ResourceKind = ResourceKind::Client;

    fn id(&self) -> ClientId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.company {
            Some(company) => write!(f, "{} ({})", self.name, company),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientValidationError {
    EmptyName,
    InvalidEmail(String),
}

impl fmt::Display for ClientValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Client name cannot be empty"),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: '{}'", email),
        }
    }
}

impl std::error::Error for ClientValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        let mut client = Client::new("Arena Events");
        assert!(client.validate().is_ok());

        client.email = Some("bookings@arena.example".into());
        assert!(client.validate().is_ok());

        client.email = Some("not-an-email".into());
        assert!(matches!(
            client.validate(),
            Err(ClientValidationError::InvalidEmail(_))
        ));
    }

    #[test]
    fn test_display() {
        let mut client = Client::new("Dana");
        assert_eq!(client.to_string(), "Dana");
        client.company = Some("Arena Events".into());
        assert_eq!(client.to_string(), "Dana (Arena Events)");
    }
}
