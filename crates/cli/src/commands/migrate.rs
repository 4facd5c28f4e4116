//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! deskshop migrate
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! Migrations live in `crates/catalog/migrations/` and are embedded at
//! compile time.

use deskshop_catalog::store::{MIGRATOR, create_pool};
use tracing::info;

use super::database_url;

/// Run the document store migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = create_pool(&database_url).await?;

    info!("Running migrations...");
    MIGRATOR.run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
