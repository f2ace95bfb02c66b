use std::thread;

use custom_service::Error;
use custom_service::ServiceError;
use indexmap::IndexMap;

use crate::common::app_context;
use crate::common::constructed_service;
use crate::common::started_service;

#[test]
fn test_key_value_round_trip_across_startup() {
    let service = constructed_service();
    let ctx = app_context();

    let err = service.get_data(&ctx, "k").unwrap_err();
    assert!(matches!(err, Error::Service(ServiceError::NotReady)));
    assert_eq!(err.code(), 1002);

    service.system_ready().unwrap();

    service.set_data(&ctx, "k", "v1").unwrap();
    assert_eq!(service.get_data(&ctx, "k").unwrap().as_deref(), Some("v1"));
    assert!(service.remove_data(&ctx, "k").unwrap());
    assert_eq!(service.get_data(&ctx, "k").unwrap(), None);
}

#[test]
fn test_batch_read_keeps_input_order() {
    let service = started_service();
    let ctx = app_context();

    let mut batch = IndexMap::new();
    batch.insert("a".to_string(), "1".to_string());
    batch.insert("b".to_string(), "2".to_string());
    batch.insert("c".to_string(), "3".to_string());
    service.set_batch_data(&ctx, &batch).unwrap();

    let keys = vec!["c".to_string(), "a".to_string(), "x".to_string()];
    let values = service.get_batch_data(&ctx, &keys).unwrap();
    assert_eq!(
        values,
        vec![Some("3".to_string()), Some("1".to_string()), None]
    );
    for (key, value) in keys.iter().zip(values) {
        assert_eq!(service.get_data(&ctx, key).unwrap(), value);
    }
}

#[test]
fn test_batch_with_empty_key_writes_nothing() {
    let service = started_service();
    let ctx = app_context();

    let mut batch = IndexMap::new();
    batch.insert("a".to_string(), "1".to_string());
    batch.insert(String::new(), "2".to_string());

    assert_eq!(service.set_batch_data(&ctx, &batch).unwrap_err().code(), 1001);
    assert_eq!(service.get_data(&ctx, "a").unwrap(), None);
}

#[test]
fn test_concurrent_writers_keep_counters_consistent() {
    let service = started_service();
    let writers = 8;
    let writes = 50;

    let handles: Vec<_> = (0..writers)
        .map(|w| {
            let service = service.clone();
            thread::spawn(move || {
                let ctx = app_context();
                for i in 0..writes {
                    let key = format!("w{w}-{i}");
                    service.set_data(&ctx, &key, &i.to_string()).unwrap();
                    assert_eq!(
                        service.get_data(&ctx, &key).unwrap(),
                        Some(i.to_string())
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let stats = service.get_statistics(&app_context()).unwrap();
    assert_eq!(stats.data_store_size, writers * writes);
    assert_eq!(stats.total_operations, (writers * writes * 2) as u64);
    assert_eq!(
        stats.total_operations,
        stats.successful_operations + stats.failed_operations
    );
}

#[test]
fn test_handles_share_one_service() {
    let service = started_service();
    let other = service.clone();

    service.set_data(&app_context(), "shared", "yes").unwrap();
    assert_eq!(
        other.get_data(&app_context(), "shared").unwrap().as_deref(),
        Some("yes")
    );
}
