use std::collections::HashMap;

use custom_service::ActionParams;
use custom_service::ConfigValue;
use custom_service::Event;
use custom_service::LocalSubscriber;
use custom_service::ServiceStatus;
use indexmap::IndexMap;

use crate::common::app_context;
use crate::common::started_service;

#[test]
fn test_configuration_merge_emits_per_key() {
    let service = started_service();
    let ctx = app_context();
    let (subscriber, rx) = LocalSubscriber::channel();
    service.register_callback(&ctx, subscriber).unwrap();

    let mut config = IndexMap::new();
    config.insert("cacheSize".to_string(), ConfigValue::from(500));
    config.insert("logLevel".to_string(), ConfigValue::from("DEBUG"));
    service.set_configuration(&ctx, &config).unwrap();

    let changes: Vec<(String, String)> = rx
        .try_iter()
        .filter_map(|e| match e {
            Event::ConfigurationChanged { name, value } => Some((name, value)),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            ("cacheSize".to_string(), "500".to_string()),
            ("logLevel".to_string(), "DEBUG".to_string()),
        ]
    );

    let options = service.get_configuration(&ctx).unwrap();
    assert_eq!(options["cacheSize"], ConfigValue::Int(500));
    assert_eq!(options["logLevel"], ConfigValue::Str("DEBUG".to_string()));
    assert_eq!(options["enableAI"], ConfigValue::Bool(false));
    assert_eq!(options["workerThreads"], ConfigValue::Int(4));
}

#[test]
fn test_reset_action_and_unknown_action() {
    let service = started_service();
    let ctx = app_context();
    service.set_data(&ctx, "k", "v").unwrap();
    let (subscriber, rx) = LocalSubscriber::channel();
    service.register_callback(&ctx, subscriber).unwrap();

    assert!(service.perform_action(&ctx, "reset", &ActionParams::new()).unwrap());

    let resets = rx
        .try_iter()
        .filter(|e| matches!(e, Event::ServiceReset))
        .count();
    assert_eq!(resets, 1);
    let stats = service.get_statistics(&ctx).unwrap();
    assert_eq!(
        (stats.total_operations, stats.successful_operations, stats.failed_operations),
        (0, 0, 0)
    );
    assert_eq!(stats.data_store_size, 0);

    assert!(!service
        .perform_action(&ctx, "frobnicate", &ActionParams::new())
        .unwrap());
    let stats = service.get_statistics(&ctx).unwrap();
    assert_eq!(stats.failed_operations, 1);
    assert_eq!(stats.total_operations, 1);
}

#[test]
fn test_statistics_snapshot() {
    let service = started_service();
    let ctx = app_context();
    service.set_data(&ctx, "a", "1").unwrap();
    service.set_data(&ctx, "b", "2").unwrap();
    let (subscriber, _rx) = LocalSubscriber::channel();
    service.register_callback(&ctx, subscriber).unwrap();

    let stats = service.get_statistics(&ctx).unwrap();

    assert_eq!(stats.data_store_size, 2);
    assert_eq!(stats.callback_count, 1);
    assert_eq!(stats.version, service.get_version());
    assert!(stats.uptime >= 0);
    assert_eq!(stats.failure_rate(), 0.0);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["dataStoreSize"], 2);
    assert_eq!(json["successfulOperations"], 2);
}

#[test]
fn test_backup_survives_reset() {
    let service = started_service();
    let ctx = app_context();
    let params = ActionParams::new();
    service.set_data(&ctx, "keep", "me").unwrap();
    assert!(service.perform_action(&ctx, "backup", &params).unwrap());

    service.reset_service(&ctx).unwrap();
    assert_eq!(service.get_data(&ctx, "keep").unwrap(), None);

    assert!(service.perform_action(&ctx, "restore", &params).unwrap());
    assert_eq!(service.get_data(&ctx, "keep").unwrap().as_deref(), Some("me"));
}

#[test]
fn test_status_and_version_are_always_available() {
    let service = started_service();
    assert_eq!(service.get_service_status(), ServiceStatus::Running);
    assert_eq!(service.get_service_status().code(), 1);
    assert!(!service.get_version().is_empty());

    service.shutdown();
    assert_eq!(service.get_service_status().code(), 0);
    assert!(!service.get_version().is_empty());
}

#[test]
fn test_optimization_suggestions_reflect_statistics() {
    let service = started_service();
    let ctx = app_context();
    for i in 0..20 {
        let _ = service.get_data(&ctx, &format!("missing-{i}"));
    }

    let suggestions = service
        .get_optimization_suggestions(&ctx, &HashMap::new())
        .unwrap();

    assert!(!suggestions.is_empty());
    assert!(suggestions.iter().any(|s| s.to_lowercase().contains("fail")));
}
