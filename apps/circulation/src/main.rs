//! Circulation host binary.

use circulation::{config::Config, create_state, init_tracing, persist, report::log_report};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        library = %config.library_name,
        loan_limit_days = config.loan_limit_days,
        "Starting circulation catalog"
    );

    let state = create_state(config)?;

    let report = log_report(&state.store).await?;
    tracing::info!(
        overdue = report.overdue,
        outstanding_fines = %report.outstanding_fines,
        "Circulation report complete"
    );

    persist(&state).await?;

    Ok(())
}
