//! Unit tests for strongly-typed identifiers

use core_kernel::{ClaimId, TransactionId};
use uuid::Uuid;

#[test]
fn test_prefixes() {
    assert_eq!(ClaimId::prefix(), "CLM");
    assert_eq!(TransactionId::prefix(), "TXN");
}

#[test]
fn test_v7_ids_are_unique() {
    let a = ClaimId::new_v7();
    let b = ClaimId::new_v7();
    assert_ne!(a, b);
}

#[test]
fn test_parse_rejects_garbage() {
    assert!("CLM-not-a-uuid".parse::<ClaimId>().is_err());
}

#[test]
fn test_uuid_round_trip() {
    let uuid = Uuid::new_v4();
    let id = ClaimId::from(uuid);
    assert_eq!(Uuid::from(id), uuid);
    assert_eq!(id.as_uuid(), &uuid);
}

#[test]
fn test_serializes_as_bare_uuid() {
    let id = ClaimId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{}\"", id.as_uuid()));
}

#[test]
fn test_short_code_is_capped_at_uuid_length() {
    let id = ClaimId::new();
    assert_eq!(id.short_code(64).len(), 32);
}
