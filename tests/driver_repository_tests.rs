// Integration tests for driver bookkeeping over an in-memory backing store

use rideflow::api::DriverRepository;
use rideflow::config::Config;
use rideflow::db::{KvHandle, MemoryStore};
use rideflow::engine::Engine;
use rideflow::entities::{DriverDraft, DriverPatch, DriverStatus};

fn setup_engine() -> Engine<MemoryStore> {
    Engine::from_config(MemoryStore::new(), &Config::default())
}

fn sam() -> DriverDraft {
    DriverDraft {
        name: "Sam".into(),
        phone: "555".into(),
        vehicle: "Car".into(),
        plate: "ABC".into(),
        rating: 4.5,
        status: DriverStatus::Available,
    }
}

#[test]
fn test_create_driver_keeps_rating() {
    let mut engine = setup_engine();

    let driver = engine.create_driver(sam()).unwrap();

    assert_eq!(driver.rating, 4.5);
    assert_eq!(driver.status, DriverStatus::Available);
    let millis: i64 = driver.id.strip_prefix("DRV-").unwrap().parse().unwrap();
    assert!(millis >= driver.created_at.timestamp_millis());
    assert_eq!(engine.list_drivers(), vec![driver]);
}

#[test]
fn test_out_of_range_rating_is_rejected() {
    let mut engine = setup_engine();
    engine.create_driver(sam()).unwrap();
    let before = engine.store().kv().get("rideflow_drivers");

    let err = engine
        .create_driver(DriverDraft {
            rating: 6.0,
            ..sam()
        })
        .unwrap_err();

    assert!(err.is_validation_error());
    assert_eq!(engine.store().kv().get("rideflow_drivers"), before);
    assert_eq!(engine.list_drivers().len(), 1);
}

#[test]
fn test_missing_required_field_is_rejected() {
    let mut engine = setup_engine();

    let err = engine
        .create_driver(DriverDraft {
            phone: String::new(),
            ..sam()
        })
        .unwrap_err();

    assert_eq!(err.message, "phone is required");
    assert!(engine.list_drivers().is_empty());
}

#[test]
fn test_rapid_creates_get_distinct_ids() {
    let mut engine = setup_engine();

    let ids: Vec<String> = (0..25)
        .map(|_| engine.create_driver(sam()).unwrap().id)
        .collect();

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn test_update_merges_without_timestamp() {
    let mut engine = setup_engine();
    let driver = engine.create_driver(sam()).unwrap();

    let updated = engine
        .update_driver(
            &driver.id,
            DriverPatch {
                rating: Some(4.9),
                status: Some(DriverStatus::Busy),
                ..DriverPatch::default()
            },
        )
        .unwrap()
        .unwrap();

    assert_eq!(updated.rating, 4.9);
    assert_eq!(updated.status, DriverStatus::Busy);
    assert_eq!(updated.id, driver.id);
    assert_eq!(updated.created_at, driver.created_at);
    assert_eq!(updated.plate, "ABC");

    let raw = engine.store().kv().get("rideflow_drivers").unwrap();
    assert!(!raw.contains("updatedAt"));
    assert_eq!(engine.find_driver(&driver.id), Some(updated));
}

#[test]
fn test_update_rejects_invalid_patch() {
    let mut engine = setup_engine();
    let driver = engine.create_driver(sam()).unwrap();

    let err = engine
        .update_driver(
            &driver.id,
            DriverPatch {
                rating: Some(0.5),
                ..DriverPatch::default()
            },
        )
        .unwrap_err();

    assert!(err.is_validation_error());
    assert_eq!(engine.find_driver(&driver.id), Some(driver));
}

#[test]
fn test_update_of_missing_driver_returns_none() {
    let mut engine = setup_engine();

    let result = engine
        .update_driver("DRV-0", DriverPatch::status(DriverStatus::Offline))
        .unwrap();

    assert_eq!(result, None);
    assert!(engine.store().kv().is_empty());
}

#[test]
fn test_delete_driver_is_idempotent() {
    let mut engine = setup_engine();
    let keep = engine.create_driver(sam()).unwrap();
    let gone = engine
        .create_driver(DriverDraft {
            name: "Jo".into(),
            ..sam()
        })
        .unwrap();

    assert!(engine.delete_driver(&gone.id));
    assert!(engine.delete_driver(&gone.id));
    assert_eq!(engine.find_driver(&gone.id), None);
    assert_eq!(engine.list_drivers(), vec![keep]);
}

#[test]
fn test_stored_wire_format() {
    let mut engine = setup_engine();
    engine.create_driver(sam()).unwrap();

    let raw = engine.store().kv().get("rideflow_drivers").unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value[0]["status"], "available");
    assert_eq!(value[0]["rating"], 4.5);
    assert!(value[0]["createdAt"].is_string());
}
