use simple_core::{SimpleModel, SimpleModelValidationError};
use uuid::Uuid;

#[test]
fn new_model_has_no_id() {
    let model = SimpleModel::new("hello");

    assert_eq!(model.id, None);
    assert_eq!(model.name, "hello");
    assert_eq!(model.description, None);
    assert!(model.validate().is_ok());
}

#[test]
fn serialization_uses_expected_wire_fields() {
    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let model = SimpleModel::with_id(id, "widget").unwrap().describe("blue");

    let json = serde_json::to_value(&model).unwrap();
    assert_eq!(json["id"], id.to_string());
    assert_eq!(json["name"], "widget");
    assert_eq!(json["description"], "blue");

    let decoded: SimpleModel = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, model);
}

#[test]
fn unsaved_model_serializes_null_id() {
    let json = serde_json::to_value(SimpleModel::new("draft")).unwrap();
    assert!(json["id"].is_null());
}

#[test]
fn with_id_rejects_nil_uuid() {
    let err = SimpleModel::with_id(Uuid::nil(), "invalid").unwrap_err();
    assert_eq!(err, SimpleModelValidationError::NilId);
}
