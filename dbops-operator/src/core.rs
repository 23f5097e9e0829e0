use dbops_config::shared::{KubernetesConfig, OperatorConfig, StoreConfig};
use dbops_operator::database::{Account, Database};
use dbops_operator::k8s::http::HttpK8sClient;
use dbops_operator::strategy::{StrategyContext, build_strategy};
use std::sync::Arc;
use tracing::info;

/// Provisions a store for `account` with the provided configuration.
///
/// Builds the Kubernetes client, picks the configured strategy and runs it
/// once per database. The first failure aborts the run.
pub async fn start_operator_with_config(
    operator_config: OperatorConfig,
    account: Account,
) -> anyhow::Result<()> {
    info!(
        account_id = %account.id,
        account_name = %account.name,
        account_email = %account.email,
        "starting operator"
    );

    log_config(&operator_config);

    let client = HttpK8sClient::new(&operator_config.kubernetes).await?;
    let strategy = build_strategy(
        operator_config.provisioning.mode,
        Arc::new(client),
        operator_config.store.clone(),
    );

    let databases = vec![Database::new(
        account.id.clone(),
        operator_config.store.replicas,
    )];

    for database in databases {
        info!(%database, "provisioning database");
        strategy.execute(&StrategyContext::new(database)).await?;
    }

    info!("operator completed");

    Ok(())
}

fn log_config(config: &OperatorConfig) {
    log_kubernetes_config(&config.kubernetes);
    log_store_config(&config.store);
    info!(mode = %config.provisioning.mode, "provisioning config");
}

fn log_kubernetes_config(config: &KubernetesConfig) {
    info!(
        endpoint = config.endpoint.as_deref().unwrap_or("<inferred>"),
        client_certificate_path = config.client_certificate_path.as_deref(),
        certificate_authority_path = config.certificate_authority_path.as_deref(),
        connect_timeout_secs = config.connect_timeout_secs,
        read_timeout_secs = config.read_timeout_secs,
        "kubernetes config"
    );
}

fn log_store_config(config: &StoreConfig) {
    info!(
        image = config.image,
        port = config.port,
        app_label = config.app_label,
        volume_root = config.volume_root,
        replicas = config.replicas,
        "store config"
    );
}
