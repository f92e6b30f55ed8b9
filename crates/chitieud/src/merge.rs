//! Edit-merge engine.
//!
//! Folds a partial edit payload into the prior record. A field absent from
//! the payload leaves the prior value untouched; only fields whose value
//! actually changes produce a diff entry. Callers guarantee a prior record
//! exists before invoking merge.

use chitieu_common::intent::EditPayload;
use chitieu_common::model::{ExpenseRecord, FieldChange};

/// Merged record plus the ordered list of changed fields. An empty diff is
/// reported as such, never treated as a successful edit.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeResult {
    pub merged: ExpenseRecord,
    pub diff: Vec<FieldChange>,
}

/// Compute the merged record. `raw_text` is always overwritten with the
/// current utterance so the audit trail reflects the latest edit
/// instruction, even when no field value changed. `created_at` is never
/// touched.
pub fn merge(prior: &ExpenseRecord, payload: &EditPayload, raw_text: &str) -> MergeResult {
    let mut merged = prior.clone();
    let mut diff = Vec::new();

    if let Some(amount) = payload.amount {
        if amount != prior.amount {
            diff.push(FieldChange::Amount {
                old: prior.amount,
                new: amount,
            });
            merged.amount = amount;
        }
    }

    if let Some(description) = &payload.description {
        if *description != prior.description {
            diff.push(FieldChange::Description {
                old: prior.description.clone(),
                new: description.clone(),
            });
            merged.description = description.clone();
        }
    }

    if let Some(category) = payload.category {
        if category != prior.category {
            diff.push(FieldChange::Category {
                old: prior.category,
                new: category,
            });
            merged.category = category;
        }
    }

    merged.raw_text = raw_text.to_string();
    MergeResult { merged, diff }
}
