//! Medicine-mention extraction.
//!
//! Turns free text (prescription OCR, chat replies) and answers from the
//! explanation backend into candidate medicine names. Names are resolved
//! against the catalog by `medsafe-core`; nothing here knows the catalog.

pub mod detection;
pub mod response;

pub use detection::*;
pub use response::*;
