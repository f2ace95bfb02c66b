use std::collections::HashMap;

use serde_json::Value;

use super::*;
use crate::AiConfig;
use crate::AiError;
use crate::ConfigValue;
use crate::Error;
use crate::Statistics;

fn assistant() -> RuleBasedAssistant {
    let assistant = RuleBasedAssistant::new(AiConfig::default());
    assistant.initialize().unwrap();
    assistant
}

fn statistics() -> Statistics {
    Statistics {
        start_time: 0,
        uptime: 1_000,
        total_operations: 10,
        successful_operations: 10,
        failed_operations: 0,
        data_store_size: 3,
        custom_data_store_size: 0,
        analysis_cache_size: 0,
        callback_count: 1,
        pending_tasks: 0,
        version: "test".to_string(),
    }
}

fn parse(report: &str) -> Value {
    serde_json::from_str(report).unwrap()
}

#[test]
fn uninitialized_assistant_should_refuse_analysis() {
    let assistant = RuleBasedAssistant::new(AiConfig::default());

    assert!(matches!(
        assistant.analyze("data", "pattern"),
        Err(Error::Ai(AiError::NotInitialized))
    ));
    assert!(matches!(
        assistant.predict(&[], 3),
        Err(Error::Ai(AiError::NotInitialized))
    ));
}

#[test]
fn analyze_should_tag_report_with_type() {
    let assistant = assistant();

    let report = parse(&assistant.analyze("hello", "pattern").unwrap());

    assert_eq!(report["analysisType"], "pattern");
    assert_eq!(report["patterns"].as_array().unwrap().len(), 2);
    assert!(report["timestamp"].as_i64().unwrap() > 0);
}

#[test]
fn unknown_analysis_type_should_report_error_field() {
    let assistant = assistant();

    let report = parse(&assistant.analyze("hello", "astrology").unwrap());

    assert_eq!(report["error"], "Unknown analysis type: astrology");
}

#[test]
fn oversized_data_should_be_flagged_as_size_anomaly() {
    let assistant = assistant();
    let data = "x".repeat(10_001);

    let report = parse(&assistant.analyze(&data, "anomaly").unwrap());

    assert_eq!(report["anomalies"][0]["type"], "size_anomaly");
    let small = parse(&assistant.analyze("x", "anomaly").unwrap());
    assert!(small["anomalies"].as_array().unwrap().is_empty());
}

#[test]
fn sentiment_should_follow_word_counts() {
    assert_eq!(sentiment_score("great success"), 1.0);
    assert_eq!(sentiment_score("bad problem, but good"), -1.0 / 3.0);
    assert_eq!(sentiment_score("nothing here"), 0.0);

    let report = parse(&assistant().analyze("an excellent result", "sentiment").unwrap());
    assert_eq!(report["sentiment"]["label"], "positive");
}

#[test]
fn classification_should_use_keywords() {
    assert_eq!(category_of("CPU at 90%"), "performance_metrics");
    assert_eq!(category_of("NullPointerException thrown"), "error_log");
    assert_eq!(category_of("lorem ipsum"), "other");

    let report = parse(&assistant().analyze("user profile", "classification").unwrap());
    assert_eq!(report["classification"]["category"], "user_data");
    assert_eq!(
        report["classification"]["relatedCategories"]
            .as_array()
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn predict_should_emit_one_step_per_horizon() {
    let assistant = assistant();
    let history: Vec<String> = vec!["10", "20", "oops", "30"].into_iter().map(String::from).collect();

    let report = parse(&assistant.predict(&history, 4).unwrap());

    assert_eq!(report["predictionHorizon"], 4);
    assert_eq!(report["dataPoints"], 4);
    let predictions = report["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 4);
    // Baseline 20, trend within [-5, 5) per step
    let first = predictions[0]["predictedValue"].as_f64().unwrap();
    assert!((15.0..25.0).contains(&first));
    let confidence = predictions[0]["confidence"].as_f64().unwrap();
    assert!((0.7..0.9).contains(&confidence));
}

#[test]
fn detect_anomalies_should_apply_thresholds_and_severity() {
    let assistant = assistant();
    let metrics = HashMap::from([
        ("cpu".to_string(), 96.0),
        ("memory".to_string(), 90.0),
        ("totalMemory".to_string(), 100.0),
        ("responseTime".to_string(), 1500.0),
        ("errorRate".to_string(), 0.01),
    ]);

    let report = assistant.detect_anomalies(&metrics).unwrap();

    let kinds: Vec<(&str, i32)> = report
        .anomalies
        .iter()
        .map(|a| (a.anomaly_type.as_str(), a.severity))
        .collect();
    assert_eq!(kinds, vec![("HIGH_CPU", 5), ("HIGH_MEMORY", 3), ("SLOW_RESPONSE", 2)]);
    assert_eq!(report.total_anomalies, 3);
    assert_eq!(report.status, "warning");
}

#[test]
fn healthy_metrics_should_yield_healthy_report() {
    let assistant = assistant();
    let metrics = HashMap::from([("cpu".to_string(), 10.0)]);

    let report = assistant.detect_anomalies(&metrics).unwrap();

    assert!(report.is_healthy());
    assert_eq!(report.status, "healthy");
}

#[test]
fn auto_tune_should_map_known_targets() {
    let assistant = assistant();

    let performance = assistant.auto_tune("performance").unwrap().unwrap();
    assert_eq!(performance.get("workerThreads"), Some(&ConfigValue::Int(8)));
    assert_eq!(performance.get("cacheSize"), Some(&ConfigValue::Int(2000)));

    let memory = assistant.auto_tune("memory").unwrap().unwrap();
    assert_eq!(memory.get("aggressiveGC"), Some(&ConfigValue::Bool(true)));

    assert_eq!(assistant.auto_tune("latency").unwrap(), None);
}

#[test]
fn suggestions_should_fall_back_when_nothing_triggers() {
    let assistant = assistant();

    let suggestions = assistant.optimization_suggestions(&HashMap::new(), &statistics());

    assert_eq!(suggestions.len(), 2);
    assert!(suggestions[0].contains("running well"));
}

#[test]
fn suggestions_should_flag_failure_rate_and_callbacks() {
    let assistant = assistant();
    let mut stats = statistics();
    stats.failed_operations = 5;
    stats.successful_operations = 5;
    stats.callback_count = 101;

    let suggestions = assistant.optimization_suggestions(&HashMap::new(), &stats);

    assert_eq!(suggestions.len(), 2);
    assert!(suggestions[0].contains("50.00%"));
    assert!(suggestions[1].contains("101 registered callbacks"));
}

#[test]
fn history_should_respect_limit() {
    let config = AiConfig {
        history_limit: 3,
        ..AiConfig::default()
    };
    let assistant = RuleBasedAssistant::new(config);
    assistant.initialize().unwrap();

    for _ in 0..5 {
        assistant.analyze("d", "pattern").unwrap();
    }

    assert_eq!(assistant.history_size(), 3);
    assert_eq!(assistant.model_info().analysis_history_size, 3);
    assert_eq!(assistant.last_analysis().map(|(t, _)| t), Some("pattern".to_string()));
}

#[test]
fn shutdown_should_clear_state() {
    let assistant = assistant();
    assistant.analyze("d", "pattern").unwrap();

    assistant.shutdown();

    let info = assistant.model_info();
    assert!(!info.initialized);
    assert_eq!(info.analysis_history_size, 0);
    assert_eq!(info.supported_analysis_types.len(), 5);
}
