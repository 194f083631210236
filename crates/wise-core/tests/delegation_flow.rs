//! End-to-end flow: stream a delegator's history, decode the protocol
//! operations, apply rulesets and validate vote orders against them.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{TimeZone, Utc};

use wise_core::protocol::v2::{ACTIVATION_BLOCK, CUSTOM_JSON_ID};
use wise_core::{
    Command, ContentItem, CustomJsonOperation, HistoryEntry, LedgerApi, OperationPayload,
    OperationPosition, RawTransaction, RemoteCheckClient, Result, VoteOrder, Wise,
};

// ============================================================================
// Fakes
// ============================================================================

struct InMemoryLedger {
    history: Vec<HistoryEntry>,
    content: HashMap<(String, String), ContentItem>,
}

#[async_trait::async_trait]
impl LedgerApi for InMemoryLedger {
    async fn fetch_history(
        &self,
        _account: &str,
        from: Option<u64>,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>> {
        let newest = match from {
            None => self.history.len(),
            Some(c) => (c as usize).saturating_add(1).min(self.history.len()),
        };
        let oldest = newest.saturating_sub(limit as usize);
        Ok(self.history[oldest..newest].to_vec())
    }

    async fn fetch_content(&self, author: &str, permlink: &str) -> Result<Option<ContentItem>> {
        Ok(self
            .content
            .get(&(author.to_string(), permlink.to_string()))
            .cloned())
    }
}

struct ApprovingRemote;

#[async_trait::async_trait]
impl RemoteCheckClient for ApprovingRemote {
    async fn call_remote(
        &self,
        _host: &str,
        _port: u16,
        _path: &str,
        _method: &str,
        _order: &VoteOrder,
    ) -> Result<bool> {
        Ok(true)
    }
}

// ============================================================================
// Fixture history
// ============================================================================

fn custom_json(id: &str, auth: &str, json: &str) -> OperationPayload {
    OperationPayload::CustomJson(CustomJsonOperation {
        id: id.to_string(),
        json: json.to_string(),
        required_posting_auths: vec![auth.to_string()],
    })
}

fn entry(index: u64, block_num: u64, payload: OperationPayload) -> HistoryEntry {
    HistoryEntry {
        index,
        transaction: RawTransaction {
            transaction_id: format!("tx-{index}"),
            block_num,
            transaction_num: 0,
            timestamp: Utc.with_ymd_and_hms(2018, 7, 14, 12, 0, 0).unwrap(),
            operations: vec![(0, payload)],
        },
    }
}

/// History of delegator "noisy":
/// - sets rules for voters alice (rulesets "safe", "loose") and bob
/// - carries unrelated and foreign operations that must be skipped
/// - later replaces alice's rules, leaving bob untouched
fn noisy_history() -> Vec<HistoryEntry> {
    let first_set_rules = r#"{
        "name": "set_rules",
        "rulesets": [
            {"voter": "alice", "name": "safe", "rules": [
                {"type": "authors", "mode": "allow", "authors": ["pojan"]},
                {"type": "tags", "mode": "any", "tags": ["blog", "steemprojects"]}
            ]},
            {"voter": "bob", "name": "bobset", "rules": [
                {"type": "payout", "mode": "less_than", "value": 100.0}
            ]},
            {"voter": "alice", "name": "loose", "rules": []}
        ]
    }"#;
    let second_set_rules = r#"{
        "name": "set_rules",
        "rulesets": [
            {"voter": "alice", "name": "safe", "rules": [
                {"type": "authors", "mode": "allow", "authors": ["greg"]}
            ]}
        ]
    }"#;

    vec![
        entry(
            0,
            ACTIVATION_BLOCK + 10,
            custom_json(CUSTOM_JSON_ID, "noisy", first_set_rules),
        ),
        entry(1, ACTIVATION_BLOCK + 20, OperationPayload::Other),
        entry(
            2,
            ACTIVATION_BLOCK + 30,
            custom_json("follow", "noisy", r#"{"follower": "noisy"}"#),
        ),
        entry(
            3,
            ACTIVATION_BLOCK + 40,
            custom_json(CUSTOM_JSON_ID, "noisy", second_set_rules),
        ),
    ]
}

fn wise() -> Wise {
    let mut content = HashMap::new();
    content.insert(
        ("pojan".to_string(), "abusers-post".to_string()),
        ContentItem {
            author: "pojan".to_string(),
            permlink: "abusers-post".to_string(),
            tags: vec!["blog".to_string()],
            total_payout: "73.054 SBD".to_string(),
        },
    );

    let api = Arc::new(InMemoryLedger {
        history: noisy_history(),
        content,
    });
    Wise::new(api, Arc::new(ApprovingRemote))
}

fn order(ruleset_name: &str) -> VoteOrder {
    VoteOrder {
        delegator: "noisy".to_string(),
        ruleset_name: ruleset_name.to_string(),
        author: "pojan".to_string(),
        permlink: "abusers-post".to_string(),
        weight: 2_000,
    }
}

fn pos(block_num: u64) -> OperationPosition {
    OperationPosition::new(block_num, 0, 0)
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_loads_only_protocol_operations_newest_first() {
    let ops = wise().load_operations("noisy", None, None).await.unwrap();

    // 2 voters from the first envelope + 1 from the second; nothing else decodes
    assert_eq!(ops.len(), 3);
    assert!(ops.windows(2).all(|w| w[0].position >= w[1].position));
    assert_eq!(ops[0].position, pos(ACTIVATION_BLOCK + 40));
    assert!(ops
        .iter()
        .all(|op| matches!(op.command, Command::SetRules { .. })));
}

#[tokio::test]
async fn test_load_respects_limit_and_cutoff() {
    let client = wise();

    let newest_only = client
        .load_operations("noisy", None, Some(1))
        .await
        .unwrap();
    assert_eq!(newest_only.len(), 1);
    assert_eq!(newest_only[0].position, pos(ACTIVATION_BLOCK + 40));

    // a cutoff at the second envelope's position excludes it
    let older = client
        .load_operations("noisy", Some(pos(ACTIVATION_BLOCK + 40)), None)
        .await
        .unwrap();
    assert!(older.is_empty());
}

#[tokio::test]
async fn test_synced_rules_validate_vote_orders_as_of_position() {
    let client = wise();
    let applied = client.sync_rules("noisy", None).await.unwrap();
    assert_eq!(applied, 3);

    // between the two set_rules the first one is in force: pojan is allowed
    let verdict = client
        .validate_vote_order("alice", &order("safe"), pos(ACTIVATION_BLOCK + 35))
        .await
        .unwrap();
    assert!(verdict.passed());

    // after the replacement only greg is allowed
    let verdict = client
        .validate_vote_order("alice", &order("safe"), pos(ACTIVATION_BLOCK + 45))
        .await
        .unwrap();
    match verdict {
        wise_core::Verdict::Failed { reason } => {
            assert!(reason.contains("not on the allow list"), "got: {reason}");
        }
        wise_core::Verdict::Passed => panic!("order should fail after rules were replaced"),
    }

    // the replacement also dropped alice's "loose" ruleset
    let verdict = client
        .validate_vote_order("alice", &order("loose"), pos(ACTIVATION_BLOCK + 45))
        .await
        .unwrap();
    assert!(!verdict.passed());

    // bob's rules were set in the same envelope and survive the replacement
    let mut bob_order = order("bobset");
    bob_order.delegator = "noisy".to_string();
    let verdict = client
        .validate_vote_order("bob", &bob_order, pos(ACTIVATION_BLOCK + 45))
        .await
        .unwrap();
    assert!(verdict.passed());
}

#[tokio::test]
async fn test_unknown_ruleset_fails_with_reason() {
    let client = wise();
    client.sync_rules("noisy", None).await.unwrap();

    let verdict = client
        .validate_vote_order("alice", &order("nope"), pos(ACTIVATION_BLOCK + 45))
        .await
        .unwrap();
    match verdict {
        wise_core::Verdict::Failed { reason } => {
            assert!(reason.contains("no ruleset \"nope\""), "got: {reason}");
        }
        wise_core::Verdict::Passed => panic!("unknown ruleset must not pass"),
    }
}
