//! Failover across real vendor adapters

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{self, CALL_TIMEOUT_MS};
    use crate::common::{database, vendors};
    use provider_failover::core::health::OverallHealth;
    use provider_failover::core::registry::ExclusionReason;
    use provider_failover::core::types::ProviderCategory;
    use provider_failover::storage::{InMemoryConfigStore, ProviderConfigStore};
    use provider_failover::{AdapterFactory, AttemptOutcome, DispatchOptions, FailoverOrchestrator};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::MockServer;

    async fn tax_orchestrator(avalara: &MockServer, taxjar: &MockServer) -> FailoverOrchestrator {
        let store = Arc::new(InMemoryConfigStore::with_configs([
            fixtures::avalara(&avalara.uri()),
            fixtures::taxjar(&taxjar.uri()),
        ]));
        let orchestrator = FailoverOrchestrator::new(
            store,
            AdapterFactory::with_builtin(),
            fixtures::orchestrator_config(),
        );
        orchestrator.init().await.unwrap();
        orchestrator
    }

    #[tokio::test]
    async fn test_server_error_fails_over_to_next_vendor() {
        let avalara = MockServer::start().await;
        let taxjar = MockServer::start().await;
        vendors::avalara_ping(&avalara, true).await;
        vendors::avalara_transactions(&avalara, 500, Duration::ZERO).await;
        vendors::taxjar_categories(&taxjar).await;
        vendors::taxjar_taxes(&taxjar, 1).await;

        let orchestrator = tax_orchestrator(&avalara, &taxjar).await;
        let result = orchestrator
            .dispatch(&fixtures::calculate_tax(), &DispatchOptions::default())
            .await;

        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.provider_used.as_deref(), Some("taxjar"));
        assert_eq!(result.attempts.len(), 2);
        assert_eq!(result.attempts[0].outcome, AttemptOutcome::Rejected);
        assert_eq!(result.attempts[0].status, Some(500));
        assert_eq!(result.data.unwrap()["total_tax"], 10.1);
    }

    #[tokio::test]
    async fn test_gateway_timeout_on_write_is_not_retried() {
        let avalara = MockServer::start().await;
        let taxjar = MockServer::start().await;
        vendors::avalara_ping(&avalara, true).await;
        vendors::avalara_transactions(&avalara, 504, Duration::ZERO).await;
        vendors::taxjar_categories(&taxjar).await;
        // TaxJar would calculate before writing; it must not be reached at all
        vendors::taxjar_taxes(&taxjar, 0).await;

        let orchestrator = tax_orchestrator(&avalara, &taxjar).await;
        let result = orchestrator
            .dispatch(
                &fixtures::create_transaction("INV-1001"),
                &DispatchOptions::default(),
            )
            .await;

        assert_eq!(result.error_code(), Some("ambiguous_failure"));
        assert!(result.error.unwrap().requires_reconciliation());
        assert_eq!(result.attempts.len(), 1);
        assert_eq!(result.attempts[0].outcome, AttemptOutcome::Ambiguous);
    }

    #[tokio::test]
    async fn test_slow_vendor_on_read_fails_over() {
        let avalara = MockServer::start().await;
        let taxjar = MockServer::start().await;
        vendors::avalara_ping(&avalara, true).await;
        vendors::avalara_transactions(
            &avalara,
            200,
            Duration::from_millis(CALL_TIMEOUT_MS * 5),
        )
        .await;
        vendors::taxjar_categories(&taxjar).await;
        vendors::taxjar_taxes(&taxjar, 1).await;

        let orchestrator = tax_orchestrator(&avalara, &taxjar).await;
        let result = orchestrator
            .dispatch(&fixtures::calculate_tax(), &DispatchOptions::default())
            .await;

        assert!(result.success);
        assert_eq!(result.provider_used.as_deref(), Some("taxjar"));
        assert_eq!(result.attempts[0].outcome, AttemptOutcome::Ambiguous);
    }

    #[tokio::test]
    async fn test_unauthenticated_vendor_is_excluded_at_load() {
        let avalara = MockServer::start().await;
        let taxjar = MockServer::start().await;
        vendors::avalara_ping(&avalara, false).await;
        vendors::taxjar_categories(&taxjar).await;
        vendors::taxjar_taxes(&taxjar, 1).await;

        let orchestrator = tax_orchestrator(&avalara, &taxjar).await;

        let snapshot = orchestrator.registry().snapshot();
        let tax = snapshot.category(ProviderCategory::Tax).unwrap();
        assert_eq!(tax.live_names(), ["taxjar"]);
        assert_eq!(tax.excluded[0].provider_name, "avalara");
        assert!(matches!(
            tax.excluded[0].reason,
            ExclusionReason::Unhealthy { .. }
        ));

        let result = orchestrator
            .dispatch(&fixtures::calculate_tax(), &DispatchOptions::default())
            .await;
        assert_eq!(result.provider_used.as_deref(), Some("taxjar"));
        assert_eq!(result.attempts.len(), 1);

        let report = orchestrator.health_check_all().await;
        assert_eq!(report.overall, OverallHealth::Healthy);
        assert_eq!(report.categories[&ProviderCategory::Tax].excluded.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_credentials_exclude_vendor() {
        let sendgrid = MockServer::start().await;
        vendors::sendgrid_scopes(&sendgrid).await;

        let mut config = fixtures::sendgrid(&sendgrid.uri());
        config.credentials.clear();
        let store = Arc::new(InMemoryConfigStore::with_configs([config]));
        let orchestrator = FailoverOrchestrator::new(
            store,
            AdapterFactory::with_builtin(),
            fixtures::orchestrator_config(),
        );
        orchestrator.init().await.unwrap();

        let snapshot = orchestrator.registry().snapshot();
        let email = snapshot.category(ProviderCategory::Email).unwrap();
        match &email.excluded[0].reason {
            ExclusionReason::Configuration { message } => assert!(message.contains("api_key")),
            other => panic!("unexpected exclusion: {:?}", other),
        }

        let result = orchestrator
            .dispatch(&fixtures::send_email("a@example.com"), &DispatchOptions::default())
            .await;
        assert_eq!(result.error_code(), Some("no_provider_configured"));
    }

    #[tokio::test]
    async fn test_usage_is_flushed_to_database() {
        let sendgrid = MockServer::start().await;
        vendors::sendgrid_scopes(&sendgrid).await;
        vendors::sendgrid_send(&sendgrid).await;

        let store = database::sqlite_store().await;
        store.save(&fixtures::sendgrid(&sendgrid.uri())).await.unwrap();
        let orchestrator = FailoverOrchestrator::new(
            store.clone(),
            AdapterFactory::with_builtin(),
            fixtures::orchestrator_config(),
        );
        orchestrator.init().await.unwrap();

        for to in ["a@example.com", "b@example.com", "c@example.com"] {
            let result = orchestrator
                .dispatch(&fixtures::send_email(to), &DispatchOptions::default())
                .await;
            assert!(result.success);
        }
        orchestrator.shutdown().await;

        let stored = store
            .get(ProviderCategory::Email, "sendgrid")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.usage.total_requests, 3);
        assert_eq!(stored.usage.successful_requests, 3);
        assert_eq!(stored.usage.monthly_usage.len(), 1);
        assert!(stored.usage.last_used_at.is_some());
    }
}
