use super::*;
use std::str::FromStr;

#[test]
fn test_typed_id_from_uuid() {
    let uuid = Uuid::new_v4();
    let id = TaskId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_typed_id_display_matches_uuid() {
    let uuid = Uuid::new_v4();
    assert_eq!(ClosureStepId::from_uuid(uuid).to_string(), uuid.to_string());
}

#[test]
fn test_typed_id_from_str() {
    let uuid = Uuid::new_v4();
    let id = BudgetId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
    assert!(BudgetId::from_str("invalid").is_err());
}

#[test]
fn test_new_ids_are_distinct() {
    assert_ne!(ThirdPartyId::new(), ThirdPartyId::new());
}

#[test]
fn test_serde_transparent() {
    let uuid = Uuid::nil();
    let json = serde_json::to_string(&ClosurePeriodId::from_uuid(uuid)).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));
}
