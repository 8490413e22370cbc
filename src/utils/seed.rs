use anyhow::Result;
use sqlx::MySqlPool;
use tracing::info;

/// Default administrator credential: admin@rh.com / "password".
/// Hash pinned so a fresh database matches the documented fixture.
const DEFAULT_ADMIN_EMAIL: &str = "admin@rh.com";
const DEFAULT_ADMIN_NAME: &str = "Administrateur RH";
const DEFAULT_ADMIN_HASH: &str = "$2a$10$92IXUNpkjO0rOQ5byMi.Ye4oKoEa3Ro9llC/.og/at2.uheWG/igi";

/// Inserts the default administrator when the admins table is empty.
/// Runs as a fire-and-forget startup task.
pub async fn ensure_default_admin(pool: &MySqlPool) -> Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Ok(());
    }

    sqlx::query("INSERT INTO admins (email, password, name) VALUES (?, ?, ?)")
        .bind(DEFAULT_ADMIN_EMAIL)
        .bind(DEFAULT_ADMIN_HASH)
        .bind(DEFAULT_ADMIN_NAME)
        .execute(pool)
        .await?;

    info!(email = DEFAULT_ADMIN_EMAIL, "Seeded default administrator");

    Ok(())
}
