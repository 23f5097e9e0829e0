use crate::config::load_operator_config;
use crate::core::start_operator_with_config;
use dbops_config::Environment;
use dbops_config::shared::OperatorConfig;
use dbops_operator::database::Account;
use dbops_telemetry::init_tracing_with_account;
use std::sync::Arc;
use tracing::{error, info};

mod config;
mod core;

fn main() -> anyhow::Result<()> {
    let operator_config = load_operator_config()?;

    // The account id is also the namespace of everything provisioned in this run.
    let account = Account::new(&operator_config.account);

    let _log_flusher =
        init_tracing_with_account(env!("CARGO_BIN_NAME"), Some(account.id.clone()))?;

    // Initialize Sentry before the async runtime starts
    let _sentry_guard = init_sentry(&operator_config)?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(async_main(operator_config, account))?;

    Ok(())
}

async fn async_main(operator_config: OperatorConfig, account: Account) -> anyhow::Result<()> {
    if let Err(err) = start_operator_with_config(operator_config, account).await {
        sentry::integrations::anyhow::capture_anyhow(&err);
        error!("an error occurred in the operator: {err:#}");

        return Err(err);
    }

    Ok(())
}

/// Initializes Sentry when the configuration carries a DSN.
///
/// Tags all events with the "operator" service identifier and captures panics.
fn init_sentry(config: &OperatorConfig) -> anyhow::Result<Option<sentry::ClientInitGuard>> {
    let Some(sentry_config) = &config.sentry else {
        info!("sentry not configured for operator, skipping initialization");
        return Ok(None);
    };

    info!("initializing sentry with supplied dsn");

    let environment = Environment::load()?;
    let guard = sentry::init(sentry::ClientOptions {
        dsn: Some(sentry_config.dsn.parse()?),
        environment: Some(environment.to_string().into()),
        integrations: vec![Arc::new(
            sentry::integrations::panic::PanicIntegration::new(),
        )],
        ..Default::default()
    });

    sentry::configure_scope(|scope| {
        scope.set_tag("service", "operator");
    });

    Ok(Some(guard))
}
