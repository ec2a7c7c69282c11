// src/core/caller.rs

//! The authenticated identity attached to every request by the authentication layer.

use crate::core::LarderError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl FromStr for Role {
    type Err = LarderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(LarderError::InvalidInput(format!("Unknown role '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub role: Role,
}

impl Caller {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Unwraps the optional caller of a request, failing when the request is unauthenticated.
pub fn require_caller(caller: Option<&Caller>) -> Result<&Caller, LarderError> {
    caller.ok_or(LarderError::Unauthenticated)
}
