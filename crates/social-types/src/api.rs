use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::Notification;

// -- Generic --

/// The `{ "message": ... }` body every mutation answers with.
#[derive(Debug, Serialize, Deserialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusBanner {
    pub status: &'static str,
    pub message: &'static str,
}

// -- Auth --

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: SessionUser,
    /// Echoed verbatim; the client redirects to it after login.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

// -- Users --

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub bio: Option<String>,
}

// -- Friends --

#[derive(Debug, Default, Deserialize)]
pub struct AddFriendRequest {
    /// Left untyped: clients send numbers or strings and both reach the store.
    #[serde(rename = "friendId")]
    pub friend_id: Option<Value>,
    pub nickname: Option<String>,
}

// -- Messages --

#[derive(Debug, Default, Deserialize)]
pub struct ThreadQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SendMessageRequest {
    #[serde(rename = "recipientId")]
    pub recipient_id: Option<Value>,
    pub body: Option<String>,
}

// -- Search --

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

// -- Photos and admin files --

#[derive(Debug, Default, Deserialize)]
pub struct UploadRequest {
    pub filename: Option<String>,
    pub description: Option<String>,
    /// Base64 file content.
    pub data: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoredFile {
    pub message: String,
    pub filename: String,
}

// -- Posts --

#[derive(Debug, Default, Deserialize)]
pub struct ContentRequest {
    pub content: Option<String>,
}

// -- Settings --

#[derive(Debug, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub message: String,
    pub applied: Map<String, Value>,
}

// -- Notifications --

#[derive(Debug, Serialize, Deserialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

// -- Admin --

#[derive(Debug, Default, Deserialize)]
pub struct BlockRequest {
    pub blocked: Option<Value>,
}
