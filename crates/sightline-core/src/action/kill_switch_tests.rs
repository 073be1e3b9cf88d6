use async_trait::async_trait;
use sightline_protocols::ActuatorError;

use super::*;

struct FakePointer(Mutex<(i32, i32)>);

impl FakePointer {
    fn at(x: i32, y: i32) -> Arc<Self> {
        Arc::new(Self(Mutex::new((x, y))))
    }

    fn move_to(&self, x: i32, y: i32) {
        *self.0.lock() = (x, y);
    }
}

#[async_trait]
impl PointerSource for FakePointer {
    async fn position(&self) -> Result<(i32, i32), ActuatorError> {
        Ok(*self.0.lock())
    }
}

fn switch(pointer: Arc<FakePointer>) -> KillSwitch {
    KillSwitch::new(pointer, 50.0, Duration::ZERO)
}

#[tokio::test]
async fn test_first_check_sets_anchor() {
    let pointer = FakePointer::at(10, 10);
    let ks = switch(pointer.clone());
    assert!(ks.check().await.is_ok());
    pointer.move_to(40, 10);
    assert!(ks.check().await.is_ok());
}

#[tokio::test]
async fn test_exact_threshold_does_not_trigger() {
    let pointer = FakePointer::at(100, 100);
    let ks = switch(pointer.clone());
    ks.record_action(100, 100).await;

    pointer.move_to(150, 100);
    assert!(ks.check().await.is_ok());
    assert!(!ks.is_tripped());
}

#[tokio::test]
async fn test_threshold_plus_one_triggers() {
    let pointer = FakePointer::at(100, 100);
    let ks = switch(pointer.clone());
    ks.record_action(100, 100).await;

    pointer.move_to(151, 100);
    match ks.check().await {
        Err(SafetyError::UserInterrupt { distance, threshold }) => {
            assert_eq!(distance, 51.0);
            assert_eq!(threshold, 50.0);
        }
        other => panic!("expected UserInterrupt, got {other:?}"),
    }
}

#[tokio::test]
async fn test_latches_until_reset() {
    let pointer = FakePointer::at(0, 0);
    let ks = switch(pointer.clone());
    ks.record_action(0, 0).await;
    pointer.move_to(300, 400);
    assert!(ks.check().await.is_err());

    pointer.move_to(0, 0);
    assert!(ks.check().await.is_err());

    ks.reset();
    assert!(!ks.is_tripped());
    assert!(ks.check().await.is_ok());
}

#[tokio::test]
async fn test_cooldown_skips_check() {
    let pointer = FakePointer::at(0, 0);
    let ks = KillSwitch::new(pointer.clone(), 50.0, Duration::from_secs(60));
    ks.record_action(0, 0).await;
    pointer.move_to(500, 500);
    assert!(ks.check().await.is_ok());
}

#[tokio::test]
async fn test_disabled_never_trips() {
    let pointer = FakePointer::at(0, 0);
    let config = KillSwitchConfig {
        enabled: false,
        ..Default::default()
    };
    let ks = KillSwitch::from_config(pointer.clone(), &config);
    ks.record_action(0, 0).await;
    pointer.move_to(1000, 1000);
    assert!(ks.check().await.is_ok());
}

#[test]
fn test_displacement_is_euclidean() {
    assert_eq!(displacement((0, 0), (3, 4)), 5.0);
}
