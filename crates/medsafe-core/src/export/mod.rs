//! Export of session state for rendering and hand-off.

mod report;

pub use report::*;
