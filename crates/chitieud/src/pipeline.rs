//! The classify → merge → compose pipeline.
//!
//! `handle_utterance` takes the prior record as an explicit input and
//! returns the storage effect as a value. It never touches storage itself;
//! the caller fetches the prior record and applies the effect, which keeps
//! the lost-update window visible as an optimistic check in the store.

use chrono::{DateTime, Utc};
use tracing::info;

use chitieu_common::intent::IntentResult;
use chitieu_common::model::{ExpenseRecord, FieldChange, NewExpense};

use crate::classifier;
use crate::compose;
use crate::merge;
use crate::oracle::Oracle;

/// What the caller must persist, if anything.
#[derive(Debug, Clone, PartialEq)]
pub enum StorageEffect {
    /// Nothing to persist (greetings, questions, clarifications, failures).
    None,
    /// Append a new expense.
    Append(NewExpense),
    /// Apply a merge against the record read at `read_at`. The store rejects
    /// it as stale when the record changed in between.
    ApplyMerge {
        id: i64,
        read_at: DateTime<Utc>,
        merged: ExpenseRecord,
        diff: Vec<FieldChange>,
    },
}

/// One rendered reply plus the storage effect it implies.
#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceOutcome {
    pub reply: String,
    pub effect: StorageEffect,
}

impl UtteranceOutcome {
    fn reply_only(reply: String) -> Self {
        Self {
            reply,
            effect: StorageEffect::None,
        }
    }
}

/// Run one classify → merge → compose cycle.
///
/// `prior` is the user's latest stored expense, fetched by the caller; it is
/// both the edit target and context for the classifier.
pub async fn handle_utterance<O: Oracle>(
    oracle: &O,
    prior: Option<ExpenseRecord>,
    text: &str,
) -> UtteranceOutcome {
    let result = classifier::classify(oracle, text, prior.as_ref()).await;

    match result {
        IntentResult::AddExpense(payload) => {
            if payload.needs_clarification {
                if let Some(question) = &payload.clarification_question {
                    return UtteranceOutcome::reply_only(compose::clarification(question));
                }
            }
            match payload.amount {
                // Unresolvable amount is a terminal condition for this
                // message, never a zero-amount record.
                None => UtteranceOutcome::reply_only(compose::amount_help()),
                Some(amount) => {
                    let reply = compose::add_confirmation(
                        amount,
                        &payload.description,
                        payload.category,
                        payload.confidence,
                    );
                    info!(
                        "add: amount={} category={} confidence={:.2}",
                        amount, payload.category, payload.confidence
                    );
                    UtteranceOutcome {
                        reply,
                        effect: StorageEffect::Append(NewExpense {
                            amount,
                            description: payload.description,
                            category: payload.category,
                            raw_text: text.to_string(),
                        }),
                    }
                }
            }
        }
        IntentResult::EditExpense(payload) => {
            if payload.needs_clarification {
                if let Some(question) = &payload.clarification_question {
                    return UtteranceOutcome::reply_only(compose::clarification(question));
                }
            }
            let Some(prior) = prior else {
                return UtteranceOutcome::reply_only(compose::no_prior_expense());
            };

            let merge::MergeResult { merged, diff } = merge::merge(&prior, &payload, text);
            let reply = if diff.is_empty() {
                compose::nothing_changed()
            } else {
                compose::edit_confirmation(&diff, payload.confidence)
            };
            info!("edit: id={} changed_fields={}", prior.id, diff.len());
            // The merge is applied even with an empty diff so raw_text keeps
            // the latest edit instruction.
            UtteranceOutcome {
                reply,
                effect: StorageEffect::ApplyMerge {
                    id: prior.id,
                    read_at: prior.updated_at,
                    merged,
                    diff,
                },
            }
        }
        IntentResult::Greeting { should_show_help } => {
            UtteranceOutcome::reply_only(compose::greeting(should_show_help))
        }
        IntentResult::Question {
            topic,
            should_show_help,
        } => UtteranceOutcome::reply_only(compose::question_reply(topic, should_show_help)),
        IntentResult::Unclear {
            clarification_question,
            ..
        } => UtteranceOutcome::reply_only(compose::unclear(&clarification_question)),
    }
}
