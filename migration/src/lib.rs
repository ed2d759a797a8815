pub use sea_orm_migration::prelude::*;

use sea_orm_migration::sea_orm::DatabaseConnection;

mod m20241012_000001_create_crypto_prices;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20241012_000001_create_crypto_prices::Migration)]
    }
}

/// Applies every migration's `up` step directly, skipping the `seaql_migrations`
/// bookkeeping table. Each step is `IF NOT EXISTS`, so this is safe on every start.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let manager = SchemaManager::new(db);
    for migration in Migrator::migrations() {
        migration.up(&manager).await?;
    }
    Ok(())
}
