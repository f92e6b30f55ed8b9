//! End-to-end pipeline tests with a canned oracle.
//!
//! The oracle seam is the injection point: each test feeds the pipeline a
//! fixed oracle response (or a forced failure) and checks the reply and the
//! declared storage effect.

use chitieu_common::error::BotError;
use chitieu_common::model::{Category, ExpenseRecord, FieldChange};
use chitieu_common::replies;
use chitieud::bot::Bot;
use chitieud::oracle::Oracle;
use chitieud::pipeline::{handle_utterance, StorageEffect};
use chitieud::store::{ExpenseStore, SqliteStore};
use chrono::Utc;

/// Oracle returning one canned response, or failing like a timeout.
struct CannedOracle {
    response: Option<String>,
}

impl CannedOracle {
    fn replies(response: &str) -> Self {
        Self {
            response: Some(response.to_string()),
        }
    }

    fn unavailable() -> Self {
        Self { response: None }
    }
}

impl Oracle for CannedOracle {
    async fn structured_complete(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, BotError> {
        match &self.response {
            Some(r) => Ok(r.clone()),
            None => Err(BotError::OracleUnavailable("timed out".to_string())),
        }
    }
}

fn prior_pho() -> ExpenseRecord {
    let now = Utc::now();
    ExpenseRecord {
        id: 7,
        user_id: 1,
        amount: 50_000,
        description: "phở".to_string(),
        category: Category::Food,
        raw_text: "Ăn phở 50k".to_string(),
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn scenario_a_add_expense() {
    let oracle = CannedOracle::replies(
        r#"{"intent":"add_expense","amount":50000,"description":"Ăn phở","category":"food","confidence":0.92,"needs_clarification":false,"clarification_question":null}"#,
    );

    let outcome = handle_utterance(&oracle, None, "Ăn phở 50k").await;

    assert!(outcome.reply.contains("50,000"));
    assert!(outcome.reply.contains("food"));
    match outcome.effect {
        StorageEffect::Append(new) => {
            assert_eq!(new.amount, 50_000);
            assert_eq!(new.category, Category::Food);
            assert_eq!(new.raw_text, "Ăn phở 50k");
        }
        other => panic!("expected append, got {:?}", other),
    }
}

#[tokio::test]
async fn scenario_b_amount_only_edit() {
    let oracle = CannedOracle::replies(
        r#"{"intent":"edit_expense","amount":45000,"description":null,"category":null,"confidence":0.9,"needs_clarification":false,"clarification_question":null}"#,
    );

    let prior = prior_pho();
    let outcome = handle_utterance(&oracle, Some(prior.clone()), "sửa thành 45k").await;

    assert!(outcome.reply.contains("45,000"));
    match outcome.effect {
        StorageEffect::ApplyMerge {
            id, merged, diff, ..
        } => {
            assert_eq!(id, prior.id);
            assert_eq!(merged.amount, 45_000);
            assert_eq!(merged.description, "phở");
            assert_eq!(merged.category, Category::Food);
            assert_eq!(merged.raw_text, "sửa thành 45k");
            assert_eq!(
                diff,
                vec![FieldChange::Amount {
                    old: 50_000,
                    new: 45_000
                }]
            );
        }
        other => panic!("expected merge, got {:?}", other),
    }
}

#[tokio::test]
async fn scenario_c_oracle_failure_is_unclear() {
    let oracle = CannedOracle::unavailable();
    let outcome = handle_utterance(&oracle, None, "Ăn phở 50k").await;
    assert_eq!(outcome.reply, replies::GENERIC_CLARIFICATION);
    assert_eq!(outcome.effect, StorageEffect::None);
}

#[tokio::test]
async fn malformed_oracle_response_is_unclear() {
    let oracle = CannedOracle::replies("xin chào, tôi không trả JSON đâu");
    let outcome = handle_utterance(&oracle, None, "Ăn phở 50k").await;
    assert_eq!(outcome.reply, replies::GENERIC_CLARIFICATION);
    assert_eq!(outcome.effect, StorageEffect::None);
}

#[tokio::test]
async fn add_without_amount_gets_syntax_help() {
    let oracle = CannedOracle::replies(
        r#"{"intent":"add_expense","amount":null,"description":"mua đồ","category":"shopping","confidence":0.8,"needs_clarification":false,"clarification_question":null}"#,
    );
    // No numeral in the text either, so the local normalizer cannot help.
    let outcome = handle_utterance(&oracle, None, "mua đồ").await;
    assert_eq!(outcome.reply, replies::AMOUNT_HELP);
    assert_eq!(outcome.effect, StorageEffect::None);
}

#[tokio::test]
async fn edit_without_prior_record() {
    let oracle = CannedOracle::replies(
        r#"{"intent":"edit_expense","amount":45000,"description":null,"category":null,"confidence":0.9,"needs_clarification":false,"clarification_question":null}"#,
    );
    let outcome = handle_utterance(&oracle, None, "sửa thành 45k").await;
    assert_eq!(outcome.reply, replies::NO_PRIOR_EXPENSE);
    assert_eq!(outcome.effect, StorageEffect::None);
}

#[tokio::test]
async fn edit_with_no_changes_reports_nothing_changed() {
    let oracle = CannedOracle::replies(
        r#"{"intent":"edit_expense","amount":null,"description":null,"category":null,"confidence":0.85,"needs_clarification":false,"clarification_question":null}"#,
    );
    let prior = prior_pho();
    let outcome = handle_utterance(&oracle, Some(prior.clone()), "sửa lại nhé").await;

    assert_eq!(outcome.reply, replies::NOTHING_CHANGED);
    // Never a false confirmation: the reply must not reference any change.
    assert!(!outcome.reply.contains("→"));
    // The merge is still applied so raw_text carries the latest instruction.
    match outcome.effect {
        StorageEffect::ApplyMerge { merged, diff, .. } => {
            assert!(diff.is_empty());
            assert_eq!(merged.amount, prior.amount);
            assert_eq!(merged.description, prior.description);
            assert_eq!(merged.category, prior.category);
            assert_eq!(merged.raw_text, "sửa lại nhé");
        }
        other => panic!("expected merge, got {:?}", other),
    }
}

#[tokio::test]
async fn clarification_short_circuits_storage() {
    let oracle = CannedOracle::replies(
        r#"{"intent":"add_expense","amount":null,"description":"chi tiêu","category":"other","confidence":0.4,"needs_clarification":true,"clarification_question":"Bạn chi bao nhiêu tiền?"}"#,
    );
    let outcome = handle_utterance(&oracle, None, "hôm nay tốn tiền quá").await;
    assert_eq!(outcome.reply, "Bạn chi bao nhiêu tiền?");
    assert_eq!(outcome.effect, StorageEffect::None);
}

#[tokio::test]
async fn low_confidence_add_carries_notice() {
    let oracle = CannedOracle::replies(
        r#"{"intent":"add_expense","amount":30000,"description":"gì đó","category":"other","confidence":0.65,"needs_clarification":false,"clarification_question":null}"#,
    );
    let outcome = handle_utterance(&oracle, None, "gì đó 30k").await;
    assert!(outcome.reply.contains(replies::LOW_CONFIDENCE_NOTICE));

    let oracle = CannedOracle::replies(
        r#"{"intent":"add_expense","amount":30000,"description":"gì đó","category":"other","confidence":0.75,"needs_clarification":false,"clarification_question":null}"#,
    );
    let outcome = handle_utterance(&oracle, None, "gì đó 30k").await;
    assert!(!outcome.reply.contains(replies::LOW_CONFIDENCE_NOTICE));
}

#[tokio::test]
async fn greeting_and_question_replies() {
    let oracle = CannedOracle::replies(r#"{"intent":"greeting","should_show_help":true}"#);
    let outcome = handle_utterance(&oracle, None, "xin chào").await;
    assert_eq!(outcome.reply, replies::WELCOME);
    assert_eq!(outcome.effect, StorageEffect::None);

    let oracle = CannedOracle::replies(
        r#"{"intent":"question","topic":"categories","should_show_help":false}"#,
    );
    let outcome = handle_utterance(&oracle, None, "bot phân loại thế nào?").await;
    assert_eq!(outcome.reply, replies::TOPIC_CATEGORIES);
}

#[tokio::test]
async fn bot_persists_add_then_edit() {
    let store = SqliteStore::open_in_memory().unwrap();
    let oracle = CannedOracle::replies(
        r#"{"intent":"add_expense","amount":50000,"description":"Ăn phở","category":"food","confidence":0.92,"needs_clarification":false,"clarification_question":null}"#,
    );
    let bot = Bot::new(oracle, store);

    let reply = bot.respond(1, "Ăn phở 50k").await.unwrap();
    assert!(reply.contains("50,000"));
    let stored = bot.store().latest(1).unwrap().unwrap();
    assert_eq!(stored.amount, 50_000);

    // Same store, new bot wired with an edit response.
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .append(
            1,
            &chitieu_common::model::NewExpense {
                amount: 50_000,
                description: "phở".to_string(),
                category: Category::Food,
                raw_text: "Ăn phở 50k".to_string(),
            },
        )
        .unwrap();
    let oracle = CannedOracle::replies(
        r#"{"intent":"edit_expense","amount":45000,"description":null,"category":null,"confidence":0.9,"needs_clarification":false,"clarification_question":null}"#,
    );
    let bot = Bot::new(oracle, store);

    let reply = bot.respond(1, "sửa thành 45k").await.unwrap();
    assert!(reply.contains("45,000"));
    let stored = bot.store().latest(1).unwrap().unwrap();
    assert_eq!(stored.amount, 45_000);
    assert_eq!(stored.description, "phở");
    assert_eq!(stored.raw_text, "sửa thành 45k");
}

#[tokio::test]
async fn unknown_command_short_circuits_before_oracle() {
    // The oracle would fail; the pre-filter must answer first.
    let store = SqliteStore::open_in_memory().unwrap();
    let bot = Bot::new(CannedOracle::unavailable(), store);
    let reply = bot.respond(1, "/hepl").await.unwrap();
    assert!(reply.contains("/help"));
}
