use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use custom_service::CustomServiceClient;
use custom_service::Event;
use custom_service::LocalSubscriber;

use crate::common::app_context;
use crate::common::started_service;
use crate::common::wait_for;
use crate::common::WAIT;

#[test]
fn test_analysis_completes_exactly_once() {
    let service = started_service();
    let ctx = app_context();
    let (subscriber, rx) = LocalSubscriber::channel();
    service.register_callback(&ctx, subscriber).unwrap();

    let id = service.analyze_data_with_ai(&ctx, "foo", "pattern").unwrap();

    let event = wait_for(&rx, WAIT, |e| matches!(e, Event::AiAnalysisComplete { .. }));
    let Some(Event::AiAnalysisComplete { analysis_id, result }) = event else {
        panic!("analysis {id} never completed");
    };
    assert_eq!(analysis_id, id);
    assert!(serde_json::from_str::<serde_json::Value>(&result).is_ok());

    let repeated = wait_for(&rx, Duration::from_millis(200), |e| {
        matches!(e, Event::AiAnalysisComplete { analysis_id, .. } if *analysis_id == id)
    });
    assert!(repeated.is_none());
}

#[test]
fn test_analysis_ids_are_unique() {
    let service = started_service();
    let ctx = app_context();

    let ids: HashSet<String> = (0..20)
        .map(|_| service.analyze_data_with_ai(&ctx, "data", "sentiment").unwrap())
        .collect();

    assert_eq!(ids.len(), 20);
}

#[test]
fn test_unknown_analysis_type_still_completes() {
    let service = started_service();
    let ctx = app_context();
    let (subscriber, rx) = LocalSubscriber::channel();
    service.register_callback(&ctx, subscriber).unwrap();

    service.analyze_data_with_ai(&ctx, "data", "astrology").unwrap();

    let Some(Event::AiAnalysisComplete { result, .. }) =
        wait_for(&rx, WAIT, |e| matches!(e, Event::AiAnalysisComplete { .. }))
    else {
        panic!("no completion event");
    };
    let json: serde_json::Value = serde_json::from_str(&result).unwrap();
    assert!(json.get("error").is_some());
}

#[test]
fn test_anomaly_detection_reports_and_broadcasts() {
    let service = started_service();
    let ctx = app_context();
    let (subscriber, rx) = LocalSubscriber::channel();
    service.register_callback(&ctx, subscriber).unwrap();

    let mut metrics = HashMap::new();
    metrics.insert("memory".to_string(), 960.0);
    metrics.insert("totalMemory".to_string(), 1000.0);
    metrics.insert("responseTime".to_string(), 50.0);
    let report = service.detect_anomalies(&ctx, &metrics).unwrap();

    let json: serde_json::Value = serde_json::from_str(&report).unwrap();
    assert_eq!(json["status"], "warning");
    assert_eq!(json["anomalies"][0]["type"], "HIGH_MEMORY");
    let event = wait_for(&rx, WAIT, |e| matches!(e, Event::AnomalyDetected { .. }));
    assert!(matches!(
        event,
        Some(Event::AnomalyDetected { anomaly_type, severity: 5, .. }) if anomaly_type == "HIGH_MEMORY"
    ));
}

#[test]
fn test_prediction_and_model_info() {
    let service = started_service();
    let ctx = app_context();
    let history: Vec<String> = ["10", "12", "11", "13", "12"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let prediction = service.predict_with_ai(&ctx, &history, 3).unwrap();
    let json: serde_json::Value = serde_json::from_str(&prediction).unwrap();
    assert_eq!(json["predictions"].as_array().map(Vec::len), Some(3));

    let info = service.get_ai_model_info(&ctx).unwrap();
    assert!(info.initialized);
    assert!(info.supported_analysis_types.contains(&"pattern".to_string()));
}

#[test]
fn test_auto_tune_profiles() {
    let service = started_service();
    let ctx = app_context();

    assert!(service.auto_tune_with_ai(&ctx, "memory").unwrap());
    let options = service.get_configuration(&ctx).unwrap();
    assert_eq!(options["cacheSize"].to_string(), "500");

    assert!(!service.auto_tune_with_ai(&ctx, "latency").unwrap());
}

#[tokio::test]
async fn test_client_waits_for_analysis() {
    let service = started_service();
    let client = CustomServiceClient::connect(service.clone(), Arc::new(app_context())).unwrap();

    let result = client
        .analyze_and_wait("great service, love it", "sentiment", WAIT)
        .await
        .unwrap();

    let json: serde_json::Value = serde_json::from_str(&result).unwrap();
    assert_eq!(json["analysisType"], "sentiment");
    assert_eq!(client.get_statistics().map(|s| s.analysis_cache_size), Some(1));
}
