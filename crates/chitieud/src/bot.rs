//! Caller-side driver: owns the store, applies pipeline effects.
//!
//! This is the layer a chat transport talks to. It fetches the prior
//! record, runs the pipeline, and performs the storage side effects the
//! pipeline declared. Retries are its policy decision; currently none - a
//! stale write just asks the user to re-send.

use anyhow::Result;

use crate::classifier;
use crate::compose;
use crate::oracle::Oracle;
use crate::pipeline::{self, StorageEffect};
use crate::store::{ExpenseStore, MergeApply};

pub struct Bot<O: Oracle, S: ExpenseStore> {
    oracle: O,
    store: S,
}

impl<O: Oracle, S: ExpenseStore> Bot<O, S> {
    pub fn new(oracle: O, store: S) -> Self {
        Self { oracle, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one free-form message for a user and return the reply text.
    pub async fn respond(&self, user_id: i64, text: &str) -> Result<String> {
        // Malformed slash commands never reach the oracle.
        if let Some(reply) = classifier::command_prefilter(text) {
            return Ok(reply);
        }

        let prior = self.store.latest(user_id)?;
        let outcome = pipeline::handle_utterance(&self.oracle, prior, text).await;

        match outcome.effect {
            StorageEffect::None => {}
            StorageEffect::Append(new) => {
                self.store.append(user_id, &new)?;
            }
            StorageEffect::ApplyMerge {
                id, read_at, merged, ..
            } => match self.store.apply_merge(id, read_at, &merged)? {
                MergeApply::Applied(_) => {}
                MergeApply::Stale => return Ok(compose::stale_edit()),
                MergeApply::NotFound => return Ok(compose::no_prior_expense()),
            },
        }

        Ok(outcome.reply)
    }
}
