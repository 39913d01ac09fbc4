//! The constrained-deal synthesis engine.
//!
//! This module is composed of:
//! - `viability`: static feasibility checks run once per loaded profile.
//! - `select`: per-board weighted subprofile selection with role coupling.
//! - `synth`: the card-dealing loop with bounded retries and failure
//!   attribution.
//! - `observe`: the optional per-attempt failure snapshot sink.

mod observe;
mod select;
mod synth;
mod viability;

pub use observe::{AttemptSnapshot, DealObserver, ObserverStack};
pub use select::{SeatSelection, select_subprofiles};
pub use synth::{
    AttributionCounters, DEFAULT_MAX_ATTEMPTS, Deal, DealSynthesizer, FailureCategory,
};
pub use viability::{ConstraintBounds, check_viability, individually_viable};
