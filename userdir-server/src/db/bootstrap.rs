use sqlx::SqlitePool;
use tracing::{debug, info};

/// Schema for the single `users` table.
///
/// `AUTOINCREMENT` keeps assigned ids strictly monotonic: SQLite never hands
/// out an id below the largest ever assigned, even after rows are deleted.
/// The `UNIQUE` constraint on `email` is the authoritative uniqueness guard;
/// the service-level pre-check only exists to produce a friendlier error.
const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS users (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name  TEXT NOT NULL,
    email      TEXT NOT NULL UNIQUE,
    phone      TEXT
)";

/// Demo users matching the sample data of the classic user-management demo.
const DEMO_USERS: &[(&str, &str, &str, &str)] = &[
    ("John", "Doe", "john.doe@example.com", "555-0101"),
    ("Jane", "Smith", "jane.smith@example.com", "555-0102"),
    ("Mike", "Johnson", "mike.johnson@example.com", "555-0103"),
];

/// Create the schema if it does not exist yet.
pub async fn run(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    info!("running database bootstrap");
    sqlx::query(SCHEMA).execute(pool).await?;
    Ok(())
}

/// Simple liveness check used during startup and by the readiness probe.
pub async fn ensure_liveness(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await.map(|_| ())
}

/// Insert the demo users. Idempotent: rows whose email is already present
/// are skipped, so repeated startups with seeding enabled stay clean.
pub async fn seed_demo_users(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for &(first_name, last_name, email, phone) in DEMO_USERS {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO users (first_name, last_name, email, phone)
             VALUES (?, ?, ?, ?)",
        )
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(phone)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            debug!(email, "demo user already present, skipping");
        } else {
            info!(email, "seeded demo user");
        }
    }
    Ok(())
}
