use anyhow::Result;
use tracing::info;

use crate::Database;

/// Demo population for a fresh database. Safe to run on every start: it does
/// nothing once the first demo account exists.
pub fn demo(db: &Database) -> Result<()> {
    if db.find_user_by_email("alice@example.com")?.is_some() {
        return Ok(());
    }

    let alice = db.create_user("alice@example.com", "password123", "Alice Example", "user")?;
    let bob = db.create_user("bob@example.com", "hunter2", "Bob Example", "user")?;
    db.create_user("admin@example.com", "admin123", "Site Admin", "admin")?;

    db.add_friend(alice, &bob.into(), Some("Bobby"))?;
    db.create_post(bob, "Hello from Bob!")?;
    db.create_post(alice, "First post on the new network.")?;
    db.create_notification(alice, "Bob accepted your friend request", Some("/?view=friends"))?;

    info!("Seeded demo accounts");
    Ok(())
}
