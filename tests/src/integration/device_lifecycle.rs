//! # Device Lifecycle
//!
//! Register, heartbeat, deactivate, and re-register flows for telemetry
//! devices, including what each stage does and does not change.

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

    async fn service_with_asset() -> (
        CivicAssetService<InMemoryCityState, InMemoryBank, RecordingEventSink>,
        AssetId,
    ) {
        let service = create_test_service(admin());
        let asset = service
            .register_resource(at(1, admin()), AssetKind::Waste, "depot-7", 1, 50)
            .await
            .unwrap();
        (service, asset)
    }

    // =============================================================================
    // INTEGRATION TESTS: DEVICE LIFECYCLE
    // =============================================================================

    #[tokio::test]
    async fn test_registration_initializes_record() {
        let (service, asset) = service_with_asset().await;

        service
            .register_device(at(5, admin()), sensor(), "bin-sensor-4", AssetKind::Waste, asset)
            .await
            .unwrap();

        let device = service.device_info(sensor()).await.unwrap().unwrap();
        assert_eq!(device.label, "bin-sensor-4");
        assert_eq!(device.kind, AssetKind::Waste);
        assert_eq!(device.asset_id, asset);
        assert!(device.active);
        assert!(device.authorized);
        assert_eq!(device.last_heartbeat, BlockHeight::new(5));
    }

    #[tokio::test]
    async fn test_heartbeat_moves_only_the_timestamp() {
        let (service, asset) = service_with_asset().await;
        service
            .register_device(at(5, admin()), sensor(), "bin-sensor-4", AssetKind::Waste, asset)
            .await
            .unwrap();

        service.device_heartbeat(at(9, sensor())).await.unwrap();

        let device = service.device_info(sensor()).await.unwrap().unwrap();
        assert_eq!(device.last_heartbeat, BlockHeight::new(9));
        assert!(device.active);
        assert!(device.authorized);
    }

    #[tokio::test]
    async fn test_deactivation_keeps_record_but_revokes_rights() {
        let (service, asset) = service_with_asset().await;
        service
            .register_device(at(5, admin()), sensor(), "bin-sensor-4", AssetKind::Waste, asset)
            .await
            .unwrap();

        service.deactivate_device(at(6, admin()), sensor()).await.unwrap();

        let device = service.device_info(sensor()).await.unwrap().unwrap();
        assert!(!device.active);
        assert!(!device.authorized);
        assert_eq!(device.label, "bin-sensor-4", "record survives deactivation");

        // Heartbeat still lands, but never restores authorization.
        service.device_heartbeat(at(9, sensor())).await.unwrap();
        let device = service.device_info(sensor()).await.unwrap().unwrap();
        assert_eq!(device.last_heartbeat, BlockHeight::new(9));
        assert!(!device.authorized);
    }

    #[tokio::test]
    async fn test_reregistration_restores_authorization() {
        let (service, asset) = service_with_asset().await;
        service
            .register_device(at(5, admin()), sensor(), "bin-sensor-4", AssetKind::Waste, asset)
            .await
            .unwrap();
        service.deactivate_device(at(6, admin()), sensor()).await.unwrap();

        service
            .register_device(at(7, admin()), sensor(), "bin-sensor-4b", AssetKind::Waste, asset)
            .await
            .unwrap();

        let device = service.device_info(sensor()).await.unwrap().unwrap();
        assert!(device.active);
        assert!(device.authorized);
        assert_eq!(device.label, "bin-sensor-4b");
        assert_eq!(device.last_heartbeat, BlockHeight::new(7));
    }

    #[tokio::test]
    async fn test_lifecycle_event_sequence() {
        let (service, asset) = service_with_asset().await;

        service
            .register_device(at(5, admin()), sensor(), "bin-sensor-4", AssetKind::Waste, asset)
            .await
            .unwrap();
        service.device_heartbeat(at(6, sensor())).await.unwrap();
        service.deactivate_device(at(7, admin()), sensor()).await.unwrap();

        let topics: Vec<&str> = service
            .events()
            .recorded()
            .iter()
            .map(|e| e.event.topic())
            .collect();
        assert_eq!(
            topics,
            vec![
                "civic_assets.asset.registered",
                "civic_assets.device.registered",
                "civic_assets.device.heartbeat",
                "civic_assets.device.deactivated",
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_device_operations_fail() {
        let (service, _asset) = service_with_asset().await;

        let err = service.device_heartbeat(at(5, sensor())).await.unwrap_err();
        assert!(matches!(err, EngineError::SensorNotFound(who) if who == sensor()));

        let err = service
            .deactivate_device(at(5, admin()), sensor())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::SensorNotFound(_)));
    }

    #[tokio::test]
    async fn test_non_admin_cannot_manage_devices() {
        let (service, asset) = service_with_asset().await;
        let intruder = AccountId::new([0x66; 32]);

        let err = service
            .register_device(at(5, intruder), sensor(), "rogue", AssetKind::Waste, asset)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized));

        service
            .register_device(at(5, admin()), sensor(), "bin-sensor-4", AssetKind::Waste, asset)
            .await
            .unwrap();
        let err = service
            .deactivate_device(at(6, intruder), sensor())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized));
        assert_eq!(service.stats().await.rejected_unauthorized, 2);
    }
}
