//! Domain models for the decision support engine.

mod assessment;
mod medicine;
mod profile;

pub use assessment::*;
pub use medicine::*;
pub use profile::*;
