//! Immutable constraint-profile model.
//!
//! This module is composed of:
//! - `range`: per-suit and whole-hand bound value types.
//! - `constraint`: random-suit and contingent special constraints.
//! - `subprofile` / `seat_profile`: one seat's weighted alternatives.
//! - `hand_profile`: the validated four-seat profile with coupling metadata.
//! - `doc`: serde document types and the load/normalize path.
//! - `error`: the validation-time domain error.

mod constraint;
pub mod doc;
mod error;
mod hand_profile;
mod range;
mod seat_profile;
mod subprofile;

pub use constraint::{ContingentSuit, RandomSuitConstraint, SpecialConstraint, SuitPair};
pub use error::ProfileError;
pub use hand_profile::{BespokeMap, ExclusionRule, HandProfile, RoleMode};
pub use range::{DECK_HCP, HAND_SIZE, MAX_HAND_HCP, StandardConstraints, SuitRange};
pub use seat_profile::SeatProfile;
pub use subprofile::{RoleUsage, SubProfile};
