//! Database row types that never leave the server as-is.
//! Rows that are served verbatim live in `social_types::models`.

pub struct UserRow {
    pub id: i64,
    pub email: String,
    /// Stored and compared in plaintext.
    pub password: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    pub blocked: bool,
}
