use std::sync::Arc;
use std::time::Duration;

use custom_service::Event;
use custom_service::LocalSubscriber;

use crate::common::app_context;
use crate::common::started_service;
use crate::common::wait_for;
use crate::common::BrokenSubscriber;
use crate::common::WAIT;

fn data_updated(
    event: &Event,
    expected_key: &str,
    expected_value: &str,
) -> bool {
    matches!(event, Event::DataUpdated { key, value, .. } if key == expected_key && value == expected_value)
}

#[test]
fn test_unregistered_subscriber_stops_receiving() {
    let service = started_service();
    let ctx = app_context();
    let (alpha, alpha_rx) = LocalSubscriber::channel();
    let (beta, beta_rx) = LocalSubscriber::channel();
    service.register_callback(&ctx, alpha.clone()).unwrap();
    service.register_callback(&ctx, beta.clone()).unwrap();

    service.set_data(&ctx, "k", "v").unwrap();
    assert!(wait_for(&alpha_rx, WAIT, |e| data_updated(e, "k", "v")).is_some());
    assert!(wait_for(&beta_rx, WAIT, |e| data_updated(e, "k", "v")).is_some());

    assert!(service.unregister_callback(alpha.as_ref()));
    service.set_data(&ctx, "k", "w").unwrap();

    assert!(wait_for(&beta_rx, WAIT, |e| data_updated(e, "k", "w")).is_some());
    assert!(alpha_rx.try_iter().next().is_none());
}

#[test]
fn test_failing_subscriber_is_pruned() {
    let service = started_service();
    let ctx = app_context();
    let broken = Arc::new(BrokenSubscriber::new(u64::MAX - 1));
    let (healthy, healthy_rx) = LocalSubscriber::channel();
    service.register_callback(&ctx, broken.clone()).unwrap();
    service.register_callback(&ctx, healthy).unwrap();
    assert_eq!(service.get_statistics(&ctx).unwrap().callback_count, 2);

    service.set_data(&ctx, "k", "v").unwrap();

    assert!(wait_for(&healthy_rx, WAIT, |e| data_updated(e, "k", "v")).is_some());
    assert_eq!(service.get_statistics(&ctx).unwrap().callback_count, 1);

    service.set_data(&ctx, "k", "again").unwrap();
    assert_eq!(broken.attempts(), 1);
}

#[test]
fn test_dead_peer_is_purged() {
    let service = started_service();
    let ctx = app_context();
    let (subscriber, _rx) = LocalSubscriber::channel();
    service.register_callback(&ctx, subscriber.clone()).unwrap();

    subscriber.disconnect();

    assert_eq!(service.get_statistics(&ctx).unwrap().callback_count, 0);
    assert!(!service.unregister_callback(subscriber.as_ref()));
}

#[test]
fn test_same_key_updates_arrive_in_write_order() {
    let service = started_service();
    let ctx = app_context();
    let (subscriber, rx) = LocalSubscriber::channel();
    service.register_callback(&ctx, subscriber).unwrap();

    for i in 0..100 {
        service.set_data(&ctx, "counter", &i.to_string()).unwrap();
    }

    let values: Vec<String> = rx
        .try_iter()
        .filter_map(|e| match e {
            Event::DataUpdated { value, .. } => Some(value),
            _ => None,
        })
        .collect();
    let expected: Vec<String> = (0..100).map(|i| i.to_string()).collect();
    assert_eq!(values, expected);
}

#[test]
fn test_shutdown_drops_every_subscriber() {
    let service = started_service();
    let ctx = app_context();
    let (subscriber, rx) = LocalSubscriber::channel();
    service.register_callback(&ctx, subscriber.clone()).unwrap();

    service.shutdown();
    let _ = rx.try_iter().count();

    assert_eq!(service.set_data(&ctx, "k", "v").unwrap_err().code(), 1002);
    assert!(!service.unregister_callback(subscriber.as_ref()));
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
}
