//! # Waste Flow
//!
//! Telemetry flows: an admin provisions a container and a reporting sensor,
//! the sensor streams fill levels, and the maintenance flag follows the
//! threshold on every report.

#[cfg(test)]
mod tests {
    use cg_asset_engine::prelude::*;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn admin() -> AccountId {
        AccountId::new([0xAD; 32])
    }

    fn sensor() -> AccountId {
        AccountId::new([0x51; 32])
    }

    fn at(height: u64, caller: AccountId) -> TxContext {
        TxContext::new(caller, BlockHeight::new(height))
    }

    async fn service_with_container() -> (
        CivicAssetService<InMemoryCityState, InMemoryBank, RecordingEventSink>,
        AssetId,
    ) {
        let service = create_test_service(admin());
        let container = service
            .register_resource(at(1, admin()), AssetKind::Waste, "depot-7", 1, 50)
            .await
            .unwrap();
        service
            .register_device(
                at(1, admin()),
                sensor(),
                "bin-sensor-4",
                AssetKind::Waste,
                container,
            )
            .await
            .unwrap();
        (service, container)
    }

    // =============================================================================
    // INTEGRATION TESTS: REPORTING LIFECYCLE
    // =============================================================================

    #[tokio::test]
    async fn test_sensor_report_stream() {
        let (service, container) = service_with_container().await;

        for (height, level, maintenance) in [(10, 30, false), (11, 80, false), (12, 81, true), (13, 100, true), (14, 5, false)] {
            service
                .update_waste_level(at(height, sensor()), container, level)
                .await
                .unwrap();

            let record = service.waste_status(container).await.unwrap().unwrap();
            assert_eq!(record.fill_level, level);
            assert_eq!(record.requires_maintenance, maintenance, "level {level}");
            assert_eq!(record.last_serviced, BlockHeight::new(height));
        }
    }

    #[tokio::test]
    async fn test_report_events_carry_maintenance_flag() {
        let (service, container) = service_with_container().await;

        service
            .update_waste_level(at(10, sensor()), container, 90)
            .await
            .unwrap();

        let events = service.events().recorded();
        let report = events.last().unwrap();
        assert_eq!(report.event.topic(), "civic_assets.waste.reported");
        match &report.event {
            CivicEvent::WasteLevelReported(payload) => {
                assert_eq!(payload.fill_level, 90);
                assert!(payload.requires_maintenance);
                assert_eq!(payload.reporter, sensor());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_deactivated_sensor_cannot_report() {
        let (service, container) = service_with_container().await;
        service
            .update_waste_level(at(10, sensor()), container, 40)
            .await
            .unwrap();

        service
            .deactivate_device(at(11, admin()), sensor())
            .await
            .unwrap();

        let before = service.state().snapshot();
        let err = service
            .update_waste_level(at(12, sensor()), container, 95)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized));
        assert_eq!(before, service.state().snapshot());

        // Re-registration restores reporting rights.
        service
            .register_device(
                at(13, admin()),
                sensor(),
                "bin-sensor-4",
                AssetKind::Waste,
                container,
            )
            .await
            .unwrap();
        service
            .update_waste_level(at(14, sensor()), container, 95)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_admin_reports_without_device_record() {
        let service = create_test_service(admin());
        let container = service
            .register_resource(at(1, admin()), AssetKind::Waste, "depot-7", 1, 50)
            .await
            .unwrap();

        service
            .update_waste_level(at(2, admin()), container, 55)
            .await
            .unwrap();

        let record = service.waste_status(container).await.unwrap().unwrap();
        assert_eq!(record.fill_level, 55);
    }

    #[tokio::test]
    async fn test_report_against_missing_container_rejected() {
        let (service, _container) = service_with_container().await;

        let err = service
            .update_waste_level(at(10, sensor()), AssetId::new(42), 10)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidAsset(_)));
        assert_eq!(service.stats().await.failed_operations, 1);
    }
}
