//! Gatehouse bootstrap: applies migrations and seeds the access-control
//! baseline, then exits.

#![forbid(unsafe_code)]

mod bootstrap_config;
mod database;

use std::sync::Arc;

use gatehouse_application::{PasswordPolicy, SeedBootstrapper, SeedPlan};
use gatehouse_core::AppError;
use gatehouse_infrastructure::{BcryptPasswordHasher, PostgresSeedStore};
use tracing::{error, info};

use crate::bootstrap_config::{BootstrapConfig, init_tracing};
use crate::database::connect_and_migrate;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = BootstrapConfig::load()?;
    let pool = connect_and_migrate(&config.database_url, config.database_max_connections).await?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let password_policy = PasswordPolicy::with_cost(
        Arc::new(BcryptPasswordHasher::new()),
        config.password_hash_cost,
    );
    let bootstrapper = SeedBootstrapper::new(
        password_policy,
        SeedPlan::default().with_admin(config.admin),
    );
    let store = PostgresSeedStore::new(pool.clone());

    let result = bootstrapper.seed(&store).await;
    pool.close().await;

    match result {
        Ok(report) => {
            info!(
                admin_email = %report.admin_email,
                permissions = report.permission_count,
                "rbac baseline is in place"
            );
            Ok(())
        }
        Err(seed_error) => {
            error!(error = %seed_error, "rbac bootstrap failed");
            Err(AppError::from(seed_error))
        }
    }
}
