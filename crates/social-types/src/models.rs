//! Row views served to clients as-is. Field names follow the column aliases
//! the frontend reads, hence the occasional camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendEdge {
    pub id: i64,
    pub friend_id: i64,
    pub nickname: Option<String>,
    #[serde(rename = "friendEmail")]
    pub friend_email: String,
    #[serde(rename = "friendName")]
    pub friend_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub body: Option<String>,
    pub created_at: String,
    #[serde(rename = "senderEmail")]
    pub sender_email: String,
    #[serde(rename = "recipientEmail")]
    pub recipient_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPost {
    pub id: i64,
    pub user_id: i64,
    pub content: String,
    pub created_at: String,
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoEntry {
    pub id: i64,
    pub filename: String,
    pub description: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    pub message: String,
    pub link: Option<String>,
    pub created_at: String,
}

/// Directory entry of the admin upload area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminFile {
    pub name: String,
    pub size: u64,
    pub modified: DateTime<Utc>,
}
