//! Zone registry invariants over the embedded database.
//! Run: cargo test -p guard-server --test zone_registry

use guard_server::GuardState;
use guard_server::db::models::{ZoneCreate, ZoneUpdate};
use guard_server::db::repository::RepoError;

fn zone_input(name: &str, lat: f64, lon: f64, radius: i64) -> ZoneCreate {
    ZoneCreate {
        name: name.to_string(),
        address: "Industrial Area".to_string(),
        latitude: lat,
        longitude: lon,
        radius_meters: radius,
        active: None,
    }
}

#[tokio::test]
async fn zone_numbers_are_max_plus_one() {
    let state = GuardState::for_tests().await.unwrap();
    let zones = state.zones();

    let a = zones.create(zone_input("Main", 27.7172, 85.3240, 500)).await.unwrap();
    let b = zones.create(zone_input("Annex", 27.70, 85.30, 300)).await.unwrap();
    assert_eq!(a.number(), Some(1));
    assert_eq!(b.number(), Some(2));
    assert!(a.active && b.active);

    // Numbers are max+1, so deleting the newest zone frees its number
    zones.delete(2).await.unwrap();
    let c = zones.create(zone_input("Annex 2", 27.70, 85.30, 300)).await.unwrap();
    assert_eq!(c.number(), Some(2));
}

#[tokio::test]
async fn toggling_never_leaves_zero_active_zones() {
    let state = GuardState::for_tests().await.unwrap();
    let zones = state.zones();

    zones.create(zone_input("Main", 27.7172, 85.3240, 500)).await.unwrap();
    zones.create(zone_input("Annex", 27.70, 85.30, 300)).await.unwrap();

    // Deactivate zone 2: fine, zone 1 still active
    let z2 = zones.toggle(2).await.unwrap();
    assert!(!z2.active);

    // Zone 1 is now the last active one; the toggle self-heals
    let z1 = zones.toggle(1).await.unwrap();
    assert!(z1.active, "last active zone must not deactivate");
    assert_eq!(zones.find_active().await.unwrap().len(), 1);

    // Reactivate 2, then 1 may deactivate
    let z2 = zones.toggle(2).await.unwrap();
    assert!(z2.active);
    let z1 = zones.toggle(1).await.unwrap();
    assert!(!z1.active);
    assert!(!zones.find_active().await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_the_last_zone_is_rejected() {
    let state = GuardState::for_tests().await.unwrap();
    let zones = state.zones();

    zones.create(zone_input("Main", 27.7172, 85.3240, 500)).await.unwrap();
    let err = zones.delete(1).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)), "got {err:?}");
    assert_eq!(zones.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_the_only_active_zone_reactivates_a_survivor() {
    let state = GuardState::for_tests().await.unwrap();
    let zones = state.zones();

    zones.create(zone_input("Main", 27.7172, 85.3240, 500)).await.unwrap();
    zones.create(zone_input("Annex", 27.70, 85.30, 300)).await.unwrap();
    zones.toggle(2).await.unwrap(); // only zone 1 active now

    zones.delete(1).await.unwrap();
    let active = zones.find_active().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].number(), Some(2));
}

#[tokio::test]
async fn update_patches_only_provided_fields() {
    let state = GuardState::for_tests().await.unwrap();
    let zones = state.zones();

    zones.create(zone_input("Main", 27.7172, 85.3240, 500)).await.unwrap();
    let updated = zones
        .update(
            1,
            ZoneUpdate {
                name: None,
                address: None,
                latitude: None,
                longitude: None,
                radius_meters: Some(750),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.radius_meters, 750);
    assert_eq!(updated.name, "Main");
    assert!(updated.active);
}

#[tokio::test]
async fn missing_zone_reports_not_found() {
    let state = GuardState::for_tests().await.unwrap();
    let err = state.zones().toggle(99).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}
