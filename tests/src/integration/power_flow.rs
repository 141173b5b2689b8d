//! # Power Flow
//!
//! Capacity reservation flows: multiple accounts draw from one feeder,
//! allocations overwrite per account, costs track the live rate, and the
//! feeder exhausts cleanly.

#[cfg(test)]
mod tests {
    use cg_asset_engine::prelude::*;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn admin() -> AccountId {
        AccountId::new([0xAD; 32])
    }

    fn household(n: u8) -> AccountId {
        AccountId::new([n; 32])
    }

    fn at(height: u64, caller: AccountId) -> TxContext {
        TxContext::new(caller, BlockHeight::new(height))
    }

    async fn service_with_feeder(
        allocation: u64,
    ) -> (
        CivicAssetService<InMemoryCityState, InMemoryBank, RecordingEventSink>,
        AssetId,
    ) {
        let service = create_test_service(admin());
        let feeder = service
            .register_resource(at(1, admin()), AssetKind::Power, "grid-1", allocation, 10)
            .await
            .unwrap();
        (service, feeder)
    }

    // =============================================================================
    // INTEGRATION TESTS: CAPACITY RESERVATION
    // =============================================================================

    #[tokio::test]
    async fn test_multiple_accounts_share_one_feeder() {
        let (service, feeder) = service_with_feeder(100).await;
        let a = household(1);
        let b = household(2);
        service.bank().set_balance(a, 10_000);
        service.bank().set_balance(b, 10_000);

        service.allocate_power(at(10, a), feeder, 30).await.unwrap();
        service.allocate_power(at(11, b), feeder, 50).await.unwrap();

        // Per-account records are independent.
        let alloc_a = service.power_allocation(feeder, a).await.unwrap().unwrap();
        let alloc_b = service.power_allocation(feeder, b).await.unwrap().unwrap();
        assert_eq!(alloc_a.reserved, 30);
        assert_eq!(alloc_b.reserved, 50);

        // Feeder availability drops by the sum.
        let asset = service.asset_info(feeder).await.unwrap().unwrap();
        assert_eq!(asset.available, 20);

        // Costs at the default rate of 10 per unit.
        assert_eq!(service.bank().balance(admin()), 300 + 500);
    }

    #[tokio::test]
    async fn test_reallocation_overwrites_previous_record() {
        let (service, feeder) = service_with_feeder(100).await;
        let a = household(1);
        service.bank().set_balance(a, 10_000);

        service.allocate_power(at(10, a), feeder, 40).await.unwrap();
        service.allocate_power(at(20, a), feeder, 15).await.unwrap();

        let alloc = service.power_allocation(feeder, a).await.unwrap().unwrap();
        assert_eq!(alloc.reserved, 15);
        assert_eq!(alloc.consumed, 0);
        assert_eq!(alloc.last_modified, BlockHeight::new(20));

        // Both draws decrement availability; the overwrite does not return
        // the first reservation to the pool.
        let asset = service.asset_info(feeder).await.unwrap().unwrap();
        assert_eq!(asset.available, 45);
    }

    #[tokio::test]
    async fn test_rate_change_applies_only_to_later_draws() {
        let (service, feeder) = service_with_feeder(500).await;
        let a = household(1);
        service.bank().set_balance(a, 100_000);

        service.allocate_power(at(10, a), feeder, 10).await.unwrap();
        service.set_power_rate(at(11, admin()), 40).await.unwrap();
        service.allocate_power(at(12, a), feeder, 10).await.unwrap();

        // 10 * 10 at the old rate, then 10 * 40 at the new one.
        assert_eq!(service.bank().balance(admin()), 100 + 400);
        assert_eq!(service.power_rate().await, 40);
    }

    #[tokio::test]
    async fn test_feeder_exhaustion() {
        let (service, feeder) = service_with_feeder(60).await;
        let a = household(1);
        let b = household(2);
        service.bank().set_balance(a, 10_000);
        service.bank().set_balance(b, 10_000);

        service.allocate_power(at(10, a), feeder, 60).await.unwrap();

        let before = service.state().snapshot();
        let err = service.allocate_power(at(11, b), feeder, 1).await.unwrap_err();
        assert!(matches!(err, EngineError::AssetUnavailable(id) if id == feeder));
        assert_eq!(before, service.state().snapshot());
        assert!(service.power_allocation(feeder, b).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unfunded_draw_leaves_no_trace() {
        let (service, feeder) = service_with_feeder(100).await;
        let a = household(1);

        let before = service.state().snapshot();
        let err = service.allocate_power(at(10, a), feeder, 30).await.unwrap_err();
        assert!(matches!(err, EngineError::Transfer(TransferError::InsufficientFunds { .. })));
        assert!(err.is_retryable());
        assert_eq!(before, service.state().snapshot());
    }

    #[tokio::test]
    async fn test_allocation_events() {
        let (service, feeder) = service_with_feeder(100).await;
        let a = household(1);
        service.bank().set_balance(a, 10_000);

        service.allocate_power(at(10, a), feeder, 25).await.unwrap();

        let events = service.events().recorded();
        let draw = events.last().unwrap();
        assert_eq!(draw.event.topic(), "civic_assets.power.allocated");
        match &draw.event {
            CivicEvent::PowerAllocated(payload) => {
                assert_eq!(payload.amount, 25);
                assert_eq!(payload.cost, 250);
                assert_eq!(payload.account, a);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
