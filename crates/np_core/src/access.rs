use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@gmail.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Viewer,
}

/// An already-authenticated user, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub email: String,
}

impl Principal {
    pub fn new(email: impl Into<String>) -> Self {
        Self { email: email.into() }
    }
}

/// Decides who may change payout rates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    pub admin_emails: Vec<String>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            admin_emails: vec![DEFAULT_ADMIN_EMAIL.to_string()],
        }
    }
}

impl AccessPolicy {
    pub fn new(admin_emails: Vec<String>) -> Self {
        Self { admin_emails }
    }

    pub fn role_of(&self, principal: &Principal) -> Role {
        let email = principal.email.trim();
        if !email.is_empty()
            && self
                .admin_emails
                .iter()
                .any(|admin| admin.trim().eq_ignore_ascii_case(email))
        {
            Role::Admin
        } else {
            Role::Viewer
        }
    }

    pub fn require_admin(&self, principal: &Principal) -> Result<()> {
        match self.role_of(principal) {
            Role::Admin => Ok(()),
            Role::Viewer => Err(Error::Forbidden(format!(
                "{} may not change payout rates",
                principal.email
            ))),
        }
    }
}
