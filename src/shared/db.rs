//! Connection handling for the ticket store.
//!
//! The pool is built without touching the database, so the server can come up
//! while Postgres is still starting. Every logical acquisition retries on a
//! flat schedule instead of failing the request outright.

use std::time::Duration;

use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::{PgConnection, RunQueryDsl};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use log::{error, info, warn};

use crate::config::DatabaseConfig;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a single pool checkout may wait before it counts as a failed
/// attempt. Connection-refused errors surface much faster than this.
const CHECKOUT_TIMEOUT: Duration = Duration::from_secs(1);

/// Flat retry schedule for acquiring a store connection.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            delay: Duration::from_secs(3),
        }
    }
}

impl RetryPolicy {
    /// Upper bound on the time spent waiting between attempts.
    pub fn worst_case(&self) -> Duration {
        self.delay * self.max_attempts
    }
}

/// Raised once the whole retry schedule is exhausted.
#[derive(Debug, thiserror::Error)]
#[error("database unavailable after {attempts} attempts: {detail}")]
pub struct ConnectionFailure {
    pub attempts: u32,
    pub detail: String,
}

/// Session directive applied to every new physical connection. Ticket bodies
/// arrive in Russian, so the session encoding must handle multi-byte text.
#[derive(Debug, Clone, Copy)]
struct ClientEncoding;

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for ClientEncoding {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        diesel::sql_query("SET client_encoding TO 'UTF8'")
            .execute(conn)
            .map(|_| ())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    retry: RetryPolicy,
}

impl Database {
    pub fn connect(config: &DatabaseConfig) -> Self {
        Self::with_retry(config, RetryPolicy::default())
    }

    pub fn with_retry(config: &DatabaseConfig, retry: RetryPolicy) -> Self {
        let manager = ConnectionManager::<PgConnection>::new(config.database_url());
        let pool = Pool::builder()
            .connection_timeout(CHECKOUT_TIMEOUT)
            .connection_customizer(Box::new(ClientEncoding))
            .build_unchecked(manager);
        info!(
            "store retry policy: {} attempts, {:?} apart (bounded by {:?})",
            retry.max_attempts,
            retry.delay,
            retry.worst_case()
        );
        Self { pool, retry }
    }

    /// Checks a connection out of the pool, retrying on the configured
    /// schedule. The wait between attempts is an async sleep, so a dropped
    /// request stops retrying at the next suspension point.
    pub async fn acquire(&self) -> Result<DbConnection, ConnectionFailure> {
        let mut attempt: u32 = 1;
        loop {
            let pool = self.pool.clone();
            let detail = match tokio::task::spawn_blocking(move || pool.get()).await {
                Ok(Ok(conn)) => return Ok(conn),
                Ok(Err(err)) => err.to_string(),
                Err(err) => err.to_string(),
            };
            if attempt >= self.retry.max_attempts {
                error!("giving up on database after {} attempts: {}", attempt, detail);
                return Err(ConnectionFailure {
                    attempts: attempt,
                    detail,
                });
            }
            warn!(
                "database unavailable (attempt {}/{}): {}",
                attempt, self.retry.max_attempts, detail
            );
            tokio::time::sleep(self.retry.delay).await;
            attempt += 1;
        }
    }
}

/// Applies pending migrations once the store can be reached. Runs as a
/// background task so startup never blocks on the database.
pub async fn run_migrations(db: Database) {
    loop {
        match db.acquire().await {
            Ok(mut conn) => {
                match conn.run_pending_migrations(MIGRATIONS) {
                    Ok(applied) => {
                        info!("database schema ready ({} migrations applied)", applied.len())
                    }
                    Err(err) => error!("migration run failed: {}", err),
                }
                return;
            }
            Err(err) => warn!("migrations still waiting for the database: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_ingestion_schedule() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 20);
        assert_eq!(policy.delay, Duration::from_secs(3));
        assert_eq!(policy.worst_case(), Duration::from_secs(60));
    }

    #[test]
    fn connection_failure_reports_attempt_count() {
        let err = ConnectionFailure {
            attempts: 20,
            detail: "connection refused".to_string(),
        };
        assert!(err.to_string().contains("after 20 attempts"));
        assert!(err.to_string().contains("connection refused"));
    }
}
