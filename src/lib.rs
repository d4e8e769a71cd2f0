//! Form-field classification and autofill resolution.
//!
//! A page snapshot is loaded into an in-process [`dom::Document`]; the
//! [`pipeline::AutofillEngine`] scans its controls, classifies each one,
//! resolves a value from the user's stored preferences and writes it back,
//! fanning out across iframes through [`frames::Coordinator`].

pub mod classify;
pub mod cli;
pub mod context;
pub mod dom;
pub mod error;
pub mod field;
pub mod fill;
pub mod frames;
pub mod logging;
pub mod options;
pub mod pattern;
pub mod pipeline;
pub mod resolve;
pub mod slow;
pub mod trace;

pub use error::{AutofillError, Result};
pub use pipeline::{AutofillEngine, FillReport, SaveReport};
