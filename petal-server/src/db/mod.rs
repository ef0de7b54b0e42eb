//! Database Module
//!
//! Embedded SurrealDB storage. Opens the datastore, selects the
//! namespace/database and defines the indexes the domain invariants
//! rest on.

pub mod models;
pub mod repository;

use crate::utils::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "petal";
const DATABASE: &str = "shop";

/// Open the embedded database under `work_dir` and apply the schema
pub async fn connect(work_dir: &str) -> Result<Surreal<Db>, AppError> {
    let path = format!("{}/data", work_dir);
    let db = Surreal::new::<RocksDb>(path.as_str())
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;

    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

    define_schema(&db).await?;

    tracing::info!("Database opened at {} (SurrealDB embedded)", path);
    Ok(db)
}

/// Define the unique indexes:
/// - one account per email
/// - one cart per user
/// - one cart line per (cart, flower) pair — duplicate adds must merge
///
/// Idempotent, runs on every startup. Also shared by the test setup,
/// which runs it against an in-memory engine.
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        "DEFINE INDEX IF NOT EXISTS uniq_user_email ON TABLE user FIELDS email UNIQUE;
         DEFINE INDEX IF NOT EXISTS uniq_cart_user ON TABLE cart FIELDS user UNIQUE;
         DEFINE INDEX IF NOT EXISTS uniq_cart_line ON TABLE cart_item FIELDS cart, flower UNIQUE;",
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?
    .check()
    .map_err(|e| AppError::database(format!("Failed to define schema: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_opens_rocksdb_and_schema_is_idempotent() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db = connect(dir.path().to_str().unwrap())
            .await
            .expect("Failed to open database");

        // connect already applied the schema; a second run must not fail
        define_schema(&db).await.expect("Schema re-apply failed");
    }
}
