//! Reload, primary switching and persistence

#[cfg(test)]
mod tests {
    use crate::common::{database, fixtures, vendors};
    use provider_failover::core::types::ProviderCategory;
    use provider_failover::storage::{ProviderConfigStore, seed_if_empty};
    use provider_failover::{AdapterFactory, DispatchOptions, FailoverOrchestrator};
    use std::time::Duration;
    use wiremock::MockServer;

    const TAX: ProviderCategory = ProviderCategory::Tax;

    #[tokio::test]
    async fn test_reload_readmits_recovered_vendor() {
        let avalara = MockServer::start().await;
        let taxjar = MockServer::start().await;
        vendors::avalara_ping(&avalara, false).await;
        vendors::taxjar_categories(&taxjar).await;

        let store = database::sqlite_store().await;
        seed_if_empty(
            store.as_ref(),
            &[fixtures::avalara(&avalara.uri()), fixtures::taxjar(&taxjar.uri())],
        )
        .await
        .unwrap();
        let orchestrator = FailoverOrchestrator::new(
            store,
            AdapterFactory::with_builtin(),
            fixtures::orchestrator_config(),
        );
        orchestrator.init().await.unwrap();
        assert_eq!(orchestrator.registry().get_ordered_candidates(TAX, None).len(), 1);

        avalara.reset().await;
        vendors::avalara_ping(&avalara, true).await;
        vendors::avalara_transactions(&avalara, 200, Duration::ZERO).await;

        // Recovery alone changes nothing until the next reload
        assert_eq!(orchestrator.registry().get_ordered_candidates(TAX, None).len(), 1);

        orchestrator.reload(Some(TAX)).await.unwrap();
        let result = orchestrator
            .dispatch(&fixtures::calculate_tax(), &DispatchOptions::default())
            .await;
        assert_eq!(result.provider_used.as_deref(), Some("avalara"));
    }

    #[tokio::test]
    async fn test_primary_switch_survives_restart() {
        let avalara = MockServer::start().await;
        let taxjar = MockServer::start().await;
        vendors::avalara_ping(&avalara, true).await;
        vendors::taxjar_categories(&taxjar).await;

        let store = database::sqlite_store().await;
        seed_if_empty(
            store.as_ref(),
            &[fixtures::avalara(&avalara.uri()), fixtures::taxjar(&taxjar.uri())],
        )
        .await
        .unwrap();

        let first = FailoverOrchestrator::new(
            store.clone(),
            AdapterFactory::with_builtin(),
            fixtures::orchestrator_config(),
        );
        first.init().await.unwrap();
        first.registry().set_primary(TAX, "taxjar").await.unwrap();
        assert_eq!(
            first.registry().snapshot().category(TAX).unwrap().live_names(),
            ["taxjar", "avalara"]
        );

        let second = FailoverOrchestrator::new(
            store.clone(),
            AdapterFactory::with_builtin(),
            fixtures::orchestrator_config(),
        );
        second.init().await.unwrap();
        assert_eq!(
            second.registry().snapshot().category(TAX).unwrap().live_names(),
            ["taxjar", "avalara"]
        );

        let stored = store.get(TAX, "avalara").await.unwrap().unwrap();
        assert!(!stored.is_primary);
    }

    #[tokio::test]
    async fn test_seed_only_fills_empty_store() {
        let store = database::sqlite_store().await;
        let seed = [fixtures::avalara("http://127.0.0.1:9"), fixtures::taxjar("http://127.0.0.1:9")];

        assert_eq!(seed_if_empty(store.as_ref(), &seed).await.unwrap(), 2);
        assert_eq!(seed_if_empty(store.as_ref(), &seed).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_load_persists_health_status() {
        let avalara = MockServer::start().await;
        vendors::avalara_ping(&avalara, false).await;

        let store = database::sqlite_store().await;
        store.save(&fixtures::avalara(&avalara.uri())).await.unwrap();
        let orchestrator = FailoverOrchestrator::new(
            store.clone(),
            AdapterFactory::with_builtin(),
            fixtures::orchestrator_config(),
        );
        orchestrator.init().await.unwrap();

        let stored = store.get(TAX, "avalara").await.unwrap().unwrap();
        assert_eq!(
            stored.health_status.last_error.as_deref(),
            Some("not authenticated")
        );
        assert!(stored.health_status.last_checked.is_some());
    }
}
