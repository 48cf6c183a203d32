//! Migration CLI tool.

use sea_orm_migration::prelude::*;

mod telemetry;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    telemetry::init_telemetry(&telemetry::TelemetryConfig::from_env());

    cli::run_cli(migration::Migrator).await;
}
