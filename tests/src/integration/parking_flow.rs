//! # Parking Flow
//!
//! End-to-end booking flows: admin provisions a lot, drivers pay to reserve
//! slots, fees land in the admin account, and failed bookings leave every
//! record untouched.

#[cfg(test)]
mod tests {
    use cg_asset_engine::prelude::*;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn admin() -> AccountId {
        AccountId::new([0xAD; 32])
    }

    fn driver() -> AccountId {
        AccountId::new([0x01; 32])
    }

    fn at(height: u64, caller: AccountId) -> TxContext {
        TxContext::new(caller, BlockHeight::new(height))
    }

    async fn service_with_lot(
        allocation: u64,
        unit_cost: u64,
    ) -> (
        CivicAssetService<InMemoryCityState, InMemoryBank, RecordingEventSink>,
        AssetId,
    ) {
        let service = create_test_service(admin());
        let lot = service
            .register_resource(at(1, admin()), AssetKind::Parking, "lot-a", allocation, unit_cost)
            .await
            .unwrap();
        (service, lot)
    }

    // =============================================================================
    // INTEGRATION TESTS: BOOKING LIFECYCLE
    // =============================================================================

    #[tokio::test]
    async fn test_full_booking_lifecycle() {
        let (service, lot) = service_with_lot(50, 200).await;
        service.bank().set_balance(driver(), 10_000);

        service
            .reserve_parking(at(100, driver()), lot, "CG-123", 5)
            .await
            .unwrap();

        // Asset capacity decremented by exactly one slot.
        let asset = service.asset_info(lot).await.unwrap().unwrap();
        assert_eq!(asset.allocation, 50);
        assert_eq!(asset.available, 49);

        // Slot carries the vehicle and the absolute expiry.
        let slot = service.parking_status(lot).await.unwrap().unwrap();
        assert!(slot.occupied);
        assert_eq!(slot.vehicle.as_deref(), Some("CG-123"));
        assert_eq!(slot.expires_at, BlockHeight::new(105));

        // Fee 200 * 5 moved from driver to admin.
        assert_eq!(service.bank().balance(driver()), 9_000);
        assert_eq!(service.bank().balance(admin()), 1_000);

        // Exactly one envelope, on the booking topic, at the booking height.
        let events = service.events().recorded();
        assert_eq!(events.len(), 2, "registration + reservation");
        let booking = &events[1];
        assert_eq!(booking.height, BlockHeight::new(100));
        assert_eq!(booking.event.topic(), "civic_assets.parking.reserved");
    }

    #[tokio::test]
    async fn test_expiry_is_advisory() {
        let (service, lot) = service_with_lot(10, 500).await;
        service.bank().set_balance(driver(), 10_000);

        service
            .reserve_parking(at(100, driver()), lot, "CG-1", 3)
            .await
            .unwrap();

        let slot = service.parking_status(lot).await.unwrap().unwrap();
        assert!(!slot.is_expired(BlockHeight::new(103)), "expiry height itself still valid");
        assert!(slot.is_expired(BlockHeight::new(104)));

        // Expiry never restores availability on its own; only the records say
        // the booking lapsed.
        let asset = service.asset_info(lot).await.unwrap().unwrap();
        assert_eq!(asset.available, 9);
    }

    #[tokio::test]
    async fn test_fees_accumulate_across_bookings() {
        let (service, lot) = service_with_lot(50, 300).await;
        let other = AccountId::new([0x02; 32]);
        service.bank().set_balance(driver(), 10_000);
        service.bank().set_balance(other, 10_000);

        service
            .reserve_parking(at(10, driver()), lot, "CG-1", 4)
            .await
            .unwrap();
        service
            .reserve_parking(at(11, other), lot, "CG-2", 5)
            .await
            .unwrap();

        assert_eq!(service.bank().balance(admin()), 1_200 + 1_500);
        assert_eq!(service.stats().await.fees_collected, 2_700);

        let asset = service.asset_info(lot).await.unwrap().unwrap();
        assert_eq!(asset.available, 48);
    }

    #[tokio::test]
    async fn test_failed_booking_has_no_effect() {
        let (service, lot) = service_with_lot(2, 500).await;
        let before = service.state().snapshot();
        let events_before = service.events().len();

        // Driver holds nothing; transfer fails after all validation passed.
        let err = service
            .reserve_parking(at(10, driver()), lot, "CG-1", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Transfer(_)));

        assert_eq!(before, service.state().snapshot());
        assert_eq!(service.events().len(), events_before);
        assert_eq!(service.bank().balance(admin()), 0);
    }

    #[tokio::test]
    async fn test_booking_through_api_trait() {
        let (service, lot) = service_with_lot(50, 400).await;
        service.bank().set_balance(driver(), 10_000);

        let api: &dyn CivicAssetApi = &service;
        api.reserve_parking(at(10, driver()), lot, "CG-9", 3)
            .await
            .unwrap();

        let slot = api.parking_status(lot).await.unwrap().unwrap();
        assert_eq!(slot.vehicle.as_deref(), Some("CG-9"));
        assert_eq!(api.asset_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_non_parking_asset_rejects_booking() {
        let service = create_test_service(admin());
        let feeder = service
            .register_resource(at(1, admin()), AssetKind::Power, "grid-1", 500, 10)
            .await
            .unwrap();
        service.bank().set_balance(driver(), 10_000);

        let err = service
            .reserve_parking(at(2, driver()), feeder, "CG-1", 5)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAsset(id) if id == feeder));
    }
}
