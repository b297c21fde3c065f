//! Integration tests for parsing zone lockdown responses.

use cis_zone_lockdown::models::{DeleteLockdownResp, ListLockdownResp, LockdownTarget};
use std::fs;
use std::path::PathBuf;

fn load_fixture(name: &str) -> String {
    let fixture_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

#[test]
fn test_deserialize_lockdown_list() {
    let list: ListLockdownResp = serde_json::from_str(&load_fixture("lockdown_list.json"))
        .unwrap_or_else(|e| panic!("Failed to deserialize lockdown list: {e}"));

    assert!(list.success);
    assert_eq!(list.result.len(), 2);

    let info = list.result_info.expect("list responses carry result_info");
    assert_eq!(info.page, 1);
    assert_eq!(info.per_page, 2);
    assert_eq!(info.count, 1);
    assert_eq!(info.total_count, 200);
}

#[test]
fn test_configurations_keep_their_order() {
    let list: ListLockdownResp = serde_json::from_str(&load_fixture("lockdown_list.json")).unwrap();
    let rule = &list.result[0];

    assert_eq!(rule.id, "372e67954025e0ba6aaa6d586b9e0b59");
    assert_eq!(rule.priority, Some(5));
    assert!(!rule.paused);
    assert_eq!(rule.urls, vec!["api.mysite.com/some/endpoint*".to_string()]);

    let targets: Vec<_> = rule.configurations.iter().map(|c| c.target).collect();
    assert_eq!(targets, vec![LockdownTarget::Ip, LockdownTarget::IpRange]);
    assert_eq!(rule.configurations[1].value, "2.2.2.0/24");
}

#[test]
fn test_sparse_rule_with_unknown_target() {
    let list: ListLockdownResp = serde_json::from_str(&load_fixture("lockdown_list.json")).unwrap();
    let rule = &list.result[1];

    assert!(rule.paused);
    assert!(rule.priority.is_none());
    assert!(rule.description.is_none());
    assert_eq!(rule.configurations[0].target, LockdownTarget::Unknown);
    assert_eq!(rule.configurations[0].value, "AS13335");
}

#[test]
fn test_deserialize_delete_response() {
    let deleted: DeleteLockdownResp =
        serde_json::from_str(&load_fixture("lockdown_delete.json")).unwrap();
    assert!(deleted.success);
    assert_eq!(deleted.result.id, "f1aba936b94213e5b8dca0c0dbf1f9cc");
    assert!(deleted.result_info.is_none());
}
