use super::*;
use crate::Error;
use crate::ServiceError;

#[test]
fn wire_form_should_preserve_every_field() {
    let record = Record {
        id: 42,
        name: "sensor".to_string(),
        value: "3.25".to_string(),
        timestamp: 1_700_000_000_000,
        type_tag: TypeTag::Float,
    };

    let decoded = Record::from_wire(&record.to_wire().unwrap()).unwrap();

    assert_eq!(decoded, record);
}

#[test]
fn from_wire_should_reject_unknown_type_tag() {
    let bytes = bincode::serialize(&(1i32, "n", "v", 0i64, 9i32)).unwrap();

    match Record::from_wire(&bytes) {
        Err(Error::Service(ServiceError::InvalidParameter(msg))) => assert!(msg.contains('9')),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn from_wire_should_reject_truncated_input() {
    let bytes = Record::new(1, "n").to_wire().unwrap();

    assert!(matches!(
        Record::from_wire(&bytes[..bytes.len() - 2]),
        Err(Error::Codec(_))
    ));
}

#[test]
fn typed_accessors_should_follow_value() {
    let record = Record::new(1, "flag").with_value(" TRUE ", TypeTag::Boolean);
    assert_eq!(record.as_bool(), Some(true));
    assert!(record.is_well_typed());

    let record = Record::new(2, "count").with_value("12x", TypeTag::Integer);
    assert_eq!(record.as_i64(), None);
    assert!(!record.is_well_typed());
}

#[test]
fn json_form_should_use_camel_case_and_type_field() {
    let record = Record::new(7, "n").with_value("v", TypeTag::String);
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["id"], 7);
    assert_eq!(json["type"], "String");
    assert!(json.get("timestamp").is_some());
}
