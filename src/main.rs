use userbase::{config::AppConfig, Verifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "userbase=info,verify_migration=info,sqlx=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    // stdout carries the report; diagnostics go to stderr
    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = AppConfig::from_env();
    tracing::info!(
        schema = %config.schema,
        version_table = config.version_table.table_name(),
        rollback_sample = config.rollback_sample,
        "starting migration verification"
    );

    let mut stdout = std::io::stdout();
    let report = Verifier::new(config).run(&mut stdout).await?;
    if !report.is_success() {
        tracing::warn!(
            failures = report.failures().len(),
            "migration verification reported problems"
        );
    }

    Ok(())
}
