//! Shared vocabulary for the ChiTieu expense assistant.
//!
//! Everything the engine and its callers exchange lives here: the expense
//! record, the closed category and intent enumerations, merge diffs, the
//! error taxonomy, and the canned Vietnamese reply texts.

pub mod error;
pub mod intent;
pub mod model;
pub mod replies;
