use crate::Database;
use crate::models::UserRow;
use crate::value::{json_to_sql, row_to_object, sql_truthy};
use anyhow::Result;
use rusqlite::types::Value as SqlValue;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use serde_json::{Map, Value};
use social_types::models::{FeedPost, FriendEdge, Notification, PhotoEntry, Profile, ThreadMessage};

// Path and query identifiers are bound as text exactly as received. The
// INTEGER affinity of the id columns coerces numeric text; anything else
// simply matches no rows.

impl Database {
    // -- Users --

    pub fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
        role: &str,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (email, password, name, role) VALUES (?1, ?2, ?3, ?4)",
                params![email, password, name, role],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    pub fn get_profile(&self, id: &str) -> Result<Option<Profile>> {
        self.with_conn(|conn| {
            let profile = conn
                .query_row(
                    "SELECT id, email, name, bio, role FROM users WHERE id = ?1",
                    [id],
                    |row| {
                        Ok(Profile {
                            id: row.get(0)?,
                            email: row.get(1)?,
                            name: row.get(2)?,
                            bio: row.get(3)?,
                            role: row.get(4)?,
                        })
                    },
                )
                .optional()?;
            Ok(profile)
        })
    }

    pub fn update_profile(&self, id: &str, name: Option<&str>, bio: Option<&str>) -> Result<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE users SET name = ?1, bio = ?2 WHERE id = ?3",
                params![name, bio, id],
            )?)
        })
    }

    pub fn get_user_role(&self, id: &SqlValue) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let role = conn
                .query_row("SELECT role FROM users WHERE id = ?1", [id], |row| row.get(0))
                .optional()?;
            Ok(role)
        })
    }

    pub fn set_blocked(&self, id: &str, blocked: bool) -> Result<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE users SET blocked = ?1 WHERE id = ?2",
                params![i64::from(blocked), id],
            )?)
        })
    }

    /// Apply every key of `updates` as a column assignment on the user's row.
    ///
    /// Keys are spliced into the statement as column names; only the values
    /// are bound. An empty map yields an invalid statement and an error.
    pub fn apply_settings(&self, user_id: i64, updates: &Map<String, Value>) -> Result<usize> {
        let set_clause = updates
            .keys()
            .map(|field| format!("{} = ?", field))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("UPDATE users SET {} WHERE id = ?", set_clause);

        let mut values: Vec<SqlValue> = updates.values().map(json_to_sql).collect();
        values.push(SqlValue::Integer(user_id));

        self.with_conn(|conn| Ok(conn.execute(&sql, params_from_iter(values))?))
    }

    /// Substring search over non-admin users. `term` is interpolated into
    /// the statement text, and rows come back untyped so any column set the
    /// statement ends up producing is returned intact.
    pub fn search_users(&self, term: &str) -> Result<Vec<Map<String, Value>>> {
        let sql = format!(
            "SELECT id, email, name, bio, role, blocked FROM users WHERE role <> 'admin' AND (email LIKE '%{term}%' OR name LIKE '%{term}%')"
        );

        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], row_to_object)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Friends --

    pub fn list_friends(&self, user_id: i64) -> Result<Vec<FriendEdge>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT f.id, f.friend_id, f.nickname, u.email, u.name
                 FROM friends f
                 JOIN users u ON u.id = f.friend_id
                 WHERE f.user_id = ?1
                 ORDER BY f.id",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(FriendEdge {
                        id: row.get(0)?,
                        friend_id: row.get(1)?,
                        nickname: row.get(2)?,
                        friend_email: row.get(3)?,
                        friend_name: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn add_friend(&self, user_id: i64, friend_id: &SqlValue, nickname: Option<&str>) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO friends (user_id, friend_id, nickname) VALUES (?1, ?2, ?3)",
                params![user_id, friend_id, nickname],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn remove_friend(&self, id: &str, user_id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute(
                "DELETE FROM friends WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )?)
        })
    }

    // -- Messages --

    /// Both directions of the conversation between `user_id` and `other`, oldest first.
    pub fn get_thread(&self, user_id: i64, other: Option<&str>) -> Result<Vec<ThreadMessage>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.sender_id, m.recipient_id, m.body, m.created_at,
                        sender.email, recipient.email
                 FROM messages m
                 JOIN users sender ON sender.id = m.sender_id
                 JOIN users recipient ON recipient.id = m.recipient_id
                 WHERE (m.sender_id = ?1 AND m.recipient_id = ?2)
                    OR (m.sender_id = ?2 AND m.recipient_id = ?1)
                 ORDER BY m.created_at ASC, m.id ASC",
            )?;
            let rows = stmt
                .query_map(params![user_id, other], |row| {
                    Ok(ThreadMessage {
                        id: row.get(0)?,
                        sender_id: row.get(1)?,
                        recipient_id: row.get(2)?,
                        body: row.get(3)?,
                        created_at: row.get(4)?,
                        sender_email: row.get(5)?,
                        recipient_email: row.get(6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn send_message(&self, sender_id: i64, recipient_id: &SqlValue, body: Option<&str>) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (sender_id, recipient_id, body) VALUES (?1, ?2, ?3)",
                params![sender_id, recipient_id, body],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    // -- Posts --

    /// The caller's posts plus those of every user they have a friend edge to.
    pub fn get_feed(&self, user_id: i64) -> Result<Vec<FeedPost>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT p.id, p.user_id, p.content, p.created_at, u.name, u.email
                 FROM posts p
                 JOIN users u ON u.id = p.user_id
                 WHERE p.user_id = ?1 OR p.user_id IN (
                     SELECT friend_id FROM friends WHERE user_id = ?1
                 )
                 ORDER BY p.created_at DESC, p.id DESC",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(FeedPost {
                        id: row.get(0)?,
                        user_id: row.get(1)?,
                        content: row.get(2)?,
                        created_at: row.get(3)?,
                        name: row.get(4)?,
                        email: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn create_post(&self, user_id: i64, content: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO posts (user_id, content) VALUES (?1, ?2)",
                params![user_id, content],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn update_post(&self, id: &str, user_id: i64, content: &str) -> Result<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE posts SET content = ?1 WHERE id = ?2 AND user_id = ?3",
                params![content, id, user_id],
            )?)
        })
    }

    pub fn delete_post(&self, id: &str, user_id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute(
                "DELETE FROM posts WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )?)
        })
    }

    // -- Photos --

    pub fn photos_by_user(&self, user_id: &str) -> Result<Vec<PhotoEntry>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, filename, description, created_at
                 FROM photos
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )?;
            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(PhotoEntry {
                        id: row.get(0)?,
                        filename: row.get(1)?,
                        description: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn insert_photo(&self, user_id: i64, filename: &str, description: Option<&str>) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO photos (user_id, filename, description) VALUES (?1, ?2, ?3)",
                params![user_id, filename, description],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn find_owned_photo(&self, id: &str, user_id: i64) -> Result<Option<String>> {
        self.with_conn(|conn| {
            let filename = conn
                .query_row(
                    "SELECT filename FROM photos WHERE id = ?1 AND user_id = ?2",
                    params![id, user_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(filename)
        })
    }

    pub fn delete_photo(&self, id: &str, user_id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute(
                "DELETE FROM photos WHERE id = ?1 AND user_id = ?2",
                params![id, user_id],
            )?)
        })
    }

    // -- Notifications --

    pub fn create_notification(&self, user_id: i64, message: &str, link: Option<&str>) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notifications (user_id, message, link) VALUES (?1, ?2, ?3)",
                params![user_id, message, link],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn recent_notifications(&self, user_id: i64, limit: u32) -> Result<Vec<Notification>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, message, link, created_at
                 FROM notifications
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?2",
            )?;
            let rows = stmt
                .query_map(params![user_id, limit], |row| {
                    Ok(Notification {
                        id: row.get(0)?,
                        message: row.get(1)?,
                        link: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, email, password, name, bio, role, blocked FROM users WHERE email = ?1",
    )?;

    let row = stmt
        .query_row([email], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                email: row.get(1)?,
                password: row.get(2)?,
                name: row.get(3)?,
                bio: row.get(4)?,
                role: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                blocked: sql_truthy(&row.get::<_, SqlValue>(6)?),
            })
        })
        .optional()?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn open() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("queries.db"), 2).unwrap();
        (dir, db)
    }

    #[test]
    fn settings_keys_become_columns() {
        let (_dir, db) = open();
        let id = db.create_user("a@x.com", "secret", "Ann", "user").unwrap();

        let updates = json!({"bio": "<b>hi</b>", "blocked": true});
        let changed = db.apply_settings(id, updates.as_object().unwrap()).unwrap();
        assert_eq!(changed, 1);

        let user = db.find_user_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(user.bio.as_deref(), Some("<b>hi</b>"));
        assert!(user.blocked);
    }

    #[test]
    fn empty_settings_produce_a_statement_error() {
        let (_dir, db) = open();
        let id = db.create_user("a@x.com", "secret", "Ann", "user").unwrap();
        assert!(db.apply_settings(id, &Map::new()).is_err());
    }

    #[test]
    fn search_term_is_part_of_the_statement() {
        let (_dir, db) = open();
        db.create_user("a@x.com", "secret", "Ann", "user").unwrap();
        db.create_user("b@x.com", "hunter2", "Ben", "user").unwrap();
        db.create_user("root@x.com", "toor", "Root", "admin").unwrap();

        assert_eq!(db.search_users("Ann").unwrap().len(), 1);

        // The admin filter sits in the same statement the term closes over.
        let leaked = db.search_users("zzz%') OR 1=1 --").unwrap();
        assert_eq!(leaked.len(), 3);

        let passwords = db
            .search_users("zzz%') UNION SELECT id, email, password, NULL, role, blocked FROM users --")
            .unwrap();
        assert!(passwords.iter().any(|row| row["name"] == json!("toor")));
    }

    #[test]
    fn text_ids_reach_integer_columns() {
        let (_dir, db) = open();
        let id = db.create_user("a@x.com", "secret", "Ann", "user").unwrap();

        assert!(db.get_profile(&id.to_string()).unwrap().is_some());
        assert!(db.get_profile("abc").unwrap().is_none());
    }

    #[test]
    fn owner_scoped_deletes_leave_foreign_rows() {
        let (_dir, db) = open();
        let ann = db.create_user("a@x.com", "secret", "Ann", "user").unwrap();
        let ben = db.create_user("b@x.com", "hunter2", "Ben", "user").unwrap();
        let post = db.create_post(ann, "mine").unwrap();

        assert_eq!(db.delete_post(&post.to_string(), ben).unwrap(), 0);
        assert_eq!(db.get_feed(ann).unwrap().len(), 1);
    }
}
