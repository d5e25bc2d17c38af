/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `profile`: Current-user profile
/// - `tasks`: Task CRUD and the filtered list endpoint

pub mod auth;
pub mod health;
pub mod profile;
pub mod tasks;

use serde::{Deserialize, Serialize};

/// Simple message response body
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome message
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
