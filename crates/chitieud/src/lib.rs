//! ChiTieu daemon - the classify → merge → compose engine.
//!
//! One incoming message produces exactly one cycle: the classifier asks the
//! language oracle for a typed intent, the merge engine folds edit payloads
//! into the prior record, and the composer renders one reply. Storage is a
//! collaborator behind a trait; the pipeline itself never touches it.

pub mod amount;
pub mod bot;
pub mod classifier;
pub mod compose;
pub mod config;
pub mod merge;
pub mod oracle;
pub mod pipeline;
pub mod store;
