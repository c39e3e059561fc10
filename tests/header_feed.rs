//! Header feed wired to a live bus and the notification center.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use nexfloor::models::notification::Severity;
use nexfloor::notification::bus::{BusConfig, NotificationBus};
use nexfloor::notification::center::{Filter, NotificationCenter};
use nexfloor::notification::feed::{HeaderFeed, ToastKind};

#[tokio::test(start_paused = true)]
async fn test_feed_tracks_timer_emissions() {
    let bus = NotificationBus::new(BusConfig {
        tick_interval: Duration::from_secs(10),
        emit_probability: 1.0,
        seed: Some(5),
        ..BusConfig::default()
    })
    .unwrap();

    let center = NotificationCenter::with_mock_data();
    let feed = HeaderFeed::new(center.unread_count());
    let toasts = Arc::new(Mutex::new(Vec::new()));
    let severities = Arc::new(Mutex::new(Vec::new()));

    let t = Arc::clone(&toasts);
    let feed_sub = feed.attach(&bus, move |toast| t.lock().unwrap().push(toast));
    let s = Arc::clone(&severities);
    let sev_sub = bus.subscribe(move |n| s.lock().unwrap().push(n.severity));

    bus.connect();
    tokio::time::sleep(Duration::from_secs(125)).await;
    bus.disconnect();

    let severities = severities.lock().unwrap().clone();
    assert_eq!(severities.len(), 12);
    assert_eq!(feed.unread(), 3 + 12);
    assert_eq!(feed.badge().as_deref(), Some("9+"));

    let toasts = toasts.lock().unwrap();
    let expected = severities.iter().filter(|s| **s != Severity::Info).count();
    assert_eq!(toasts.len(), expected);
    assert!(toasts
        .iter()
        .all(|t| matches!(t.kind, ToastKind::Error | ToastKind::Warning)));

    feed_sub.unsubscribe();
    sev_sub.unsubscribe();
    assert_eq!(bus.listener_count(), 0);
}

#[test]
fn test_center_receives_bus_notifications() {
    let bus = NotificationBus::new(BusConfig {
        emit_probability: 1.0,
        seed: Some(11),
        ..BusConfig::default()
    })
    .unwrap();
    let center = Arc::new(Mutex::new(NotificationCenter::with_mock_data()));

    let c = Arc::clone(&center);
    let sub = bus.subscribe(move |n| c.lock().unwrap().push(n.clone()));
    let emitted = bus.tick().unwrap();
    sub.unsubscribe();

    let mut center = center.lock().unwrap();
    assert_eq!(center.all()[0].id, emitted.id);
    assert_eq!(center.unread_count(), 4);

    center.mark_as_read(&emitted.id).unwrap();
    assert_eq!(center.filtered(Filter::Unread).len(), 3);
}
