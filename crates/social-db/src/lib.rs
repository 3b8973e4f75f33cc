pub mod migrations;
pub mod models;
pub mod queries;
pub mod seed;
pub mod value;

use anyhow::{Result, anyhow, bail};
use crossbeam_channel::{Receiver, Sender, bounded};
use rusqlite::Connection;
use std::ops::Deref;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

pub const DEFAULT_POOL_SIZE: usize = 10;

/// Fixed-size SQLite connection pool.
///
/// Idle connections sit in a bounded channel. A checkout blocks until one is
/// handed back, so an exhausted pool queues callers instead of failing them.
/// There is no checkout timeout: a stuck query keeps its connection.
pub struct Database {
    idle_tx: Sender<Connection>,
    idle_rx: Receiver<Connection>,
    size: usize,
    checkouts: AtomicU64,
    closed: AtomicBool,
}

impl Database {
    pub fn open(path: &Path, pool_size: usize) -> Result<Self> {
        if pool_size == 0 {
            bail!("connection limit must be at least 1");
        }

        let first = open_connection(path)?;
        migrations::run(&first)?;

        let (idle_tx, idle_rx) = bounded(pool_size);
        idle_tx
            .send(first)
            .map_err(|_| anyhow!("connection pool channel closed"))?;
        for _ in 1..pool_size {
            idle_tx
                .send(open_connection(path)?)
                .map_err(|_| anyhow!("connection pool channel closed"))?;
        }

        info!(
            "Database opened at {} ({} pooled connections)",
            path.display(),
            pool_size
        );
        Ok(Self {
            idle_tx,
            idle_rx,
            size: pool_size,
            checkouts: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        })
    }

    /// Run `f` on a pooled connection, waiting for one to free up if needed.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.checkout()?;
        f(&conn)
    }

    fn checkout(&self) -> Result<PooledConnection<'_>> {
        if self.closed.load(Ordering::Acquire) {
            bail!("connection pool is closed");
        }
        let conn = self
            .idle_rx
            .recv()
            .map_err(|_| anyhow!("connection pool is closed"))?;
        self.checkouts.fetch_add(1, Ordering::Relaxed);
        Ok(PooledConnection {
            conn: Some(conn),
            home: &self.idle_tx,
        })
    }

    /// Total number of checkouts since the pool was opened.
    pub fn checkouts(&self) -> u64 {
        self.checkouts.load(Ordering::Relaxed)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn idle(&self) -> usize {
        self.idle_rx.len()
    }

    /// Stop handing out connections and close every connection that comes
    /// back within `grace`. Returns how many were closed.
    pub fn close(&self, grace: Duration) -> usize {
        self.closed.store(true, Ordering::Release);
        let deadline = Instant::now() + grace;
        let mut closed = 0;

        while closed < self.size {
            match self.idle_rx.recv_deadline(deadline) {
                Ok(conn) => {
                    if let Err((_, e)) = conn.close() {
                        warn!("Failed to close pooled connection: {}", e);
                    }
                    closed += 1;
                }
                Err(_) => {
                    warn!(
                        "{} connection(s) still checked out at shutdown",
                        self.size - closed
                    );
                    break;
                }
            }
        }

        info!("Database pool closed ({}/{} connections)", closed, self.size);
        closed
    }
}

/// Connection on loan from the pool; goes back on drop.
struct PooledConnection<'a> {
    conn: Option<Connection>,
    home: &'a Sender<Connection>,
}

impl Deref for PooledConnection<'_> {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        self.conn.as_ref().expect("pooled connection already returned")
    }
}

impl Drop for PooledConnection<'_> {
    fn drop(&mut self) {
        if let Some(conn) = self.conn.take() {
            // Capacity equals pool size, so this only fails if the pool is gone.
            let _ = self.home.try_send(conn);
        }
    }
}

fn open_connection(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(conn)
}
