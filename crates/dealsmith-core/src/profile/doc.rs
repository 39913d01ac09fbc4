//! Serde document types for the on-disk profile format.
//!
//! Documents are parsed permissively (missing fields fall back to documented
//! defaults) and then built into a validated [`HandProfile`]; nothing in the
//! engine ever touches a raw document.

use crate::model::seat::{Partnership, Seat};
use crate::model::suit::{Suit, SuitSet};
use crate::profile::constraint::{
    ContingentSuit, RandomSuitConstraint, SpecialConstraint, SuitPair,
};
use crate::profile::error::ProfileError;
use crate::profile::hand_profile::{BespokeMap, ExclusionRule, HandProfile, RoleMode};
use crate::profile::range::{StandardConstraints, SuitRange};
use crate::profile::seat_profile::SeatProfile;
use crate::profile::subprofile::{RoleUsage, SubProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDoc {
    #[serde(default)]
    pub name: Option<String>,
    pub seats: BTreeMap<Seat, SeatDoc>,
    /// Seat the rotation starts from when no explicit dealing order is given.
    #[serde(default)]
    pub dealer: Option<Seat>,
    #[serde(default)]
    pub dealing_order: Option<Vec<Seat>>,
    #[serde(default)]
    pub ns_role_mode: Option<String>,
    #[serde(default)]
    pub ew_role_mode: Option<String>,
    #[serde(default)]
    pub ns_bespoke_map: Option<BTreeMap<String, Vec<usize>>>,
    #[serde(default)]
    pub ew_bespoke_map: Option<BTreeMap<String, Vec<usize>>>,
    #[serde(default)]
    pub subprofile_exclusions: Vec<ExclusionRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatDoc {
    pub subprofiles: Vec<SubProfileDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubProfileDoc {
    #[serde(default)]
    pub standard: StandardConstraints,
    #[serde(default)]
    pub random_suit_constraint: Option<RandomSuitDoc>,
    #[serde(default)]
    pub partner_contingent_constraint: Option<ContingentDoc>,
    #[serde(default)]
    pub opponents_contingent_suit_constraint: Option<ContingentDoc>,
    #[serde(default)]
    pub weight_percent: f64,
    #[serde(default)]
    pub ns_role_usage: RoleUsage,
    #[serde(default)]
    pub ew_role_usage: RoleUsage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomSuitDoc {
    pub required_suits_count: usize,
    pub allowed_suits: Vec<Suit>,
    pub suit_ranges: Vec<SuitRange>,
    #[serde(default)]
    pub pair_overrides: Vec<PairOverrideDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairOverrideDoc {
    pub suits: [Suit; 2],
    pub ranges: [SuitRange; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContingentDoc {
    pub target_seat: Seat,
    pub suit_range: SuitRange,
    #[serde(default)]
    pub use_non_chosen_suit: bool,
}

impl ProfileDoc {
    pub fn parse(json: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds and validates the profile this document describes.
    pub fn build(self) -> Result<HandProfile, ProfileError> {
        let mut seats: Vec<SeatProfile> = Vec::with_capacity(4);
        for seat in Seat::LOOP {
            let doc = self
                .seats
                .get(&seat)
                .ok_or(ProfileError::MissingSeat { seat })?;
            let mut subprofiles = Vec::with_capacity(doc.subprofiles.len());
            for (index, sub) in doc.subprofiles.iter().enumerate() {
                subprofiles.push(build_subprofile(seat, index, sub)?);
            }
            seats.push(SeatProfile::new(seat, subprofiles)?);
        }
        let seats: [SeatProfile; 4] = match seats.try_into() {
            Ok(array) => array,
            Err(_) => unreachable!("one profile per seat was just built"),
        };

        let dealing_order = match &self.dealing_order {
            Some(order) => {
                if order.len() != 4 {
                    return Err(ProfileError::InvalidDealingOrder {
                        detail: format!("{} seats listed, expected 4", order.len()),
                    });
                }
                [order[0], order[1], order[2], order[3]]
            }
            None => rotation_from(self.dealer.unwrap_or(Seat::North)),
        };

        let ns_role_mode = parse_role_mode(Partnership::NorthSouth, self.ns_role_mode.as_deref())?;
        let ew_role_mode = parse_role_mode(Partnership::EastWest, self.ew_role_mode.as_deref())?;
        let ns_bespoke_map = self
            .ns_bespoke_map
            .map(|entries| build_bespoke_map(Partnership::NorthSouth, entries))
            .transpose()?;
        let ew_bespoke_map = self
            .ew_bespoke_map
            .map(|entries| build_bespoke_map(Partnership::EastWest, entries))
            .transpose()?;

        HandProfile::new(
            self.name,
            seats,
            dealing_order,
            ns_role_mode,
            ew_role_mode,
            ns_bespoke_map,
            ew_bespoke_map,
            self.subprofile_exclusions,
        )
    }
}

impl HandProfile {
    /// Parses, normalizes, and validates a JSON profile document.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        ProfileDoc::parse(json)?.build()
    }
}

fn rotation_from(dealer: Seat) -> [Seat; 4] {
    let mut order = [dealer; 4];
    for index in 1..4 {
        order[index] = order[index - 1].next();
    }
    order
}

fn build_subprofile(
    seat: Seat,
    index: usize,
    doc: &SubProfileDoc,
) -> Result<SubProfile, ProfileError> {
    let mut specials: Vec<SpecialConstraint> = Vec::new();
    if let Some(random_suit) = &doc.random_suit_constraint {
        specials.push(SpecialConstraint::RandomSuit(build_random_suit(random_suit)));
    }
    if let Some(contingent) = &doc.partner_contingent_constraint {
        specials.push(SpecialConstraint::PartnerContingent(build_contingent(
            contingent,
        )));
    }
    if let Some(contingent) = &doc.opponents_contingent_suit_constraint {
        specials.push(SpecialConstraint::OpponentContingent(build_contingent(
            contingent,
        )));
    }
    if specials.len() > 1 {
        return Err(ProfileError::MultipleSpecialConstraints {
            seat,
            subprofile: index,
        });
    }
    let weight_tenths = weight_tenths(seat, index, doc.weight_percent)?;
    Ok(SubProfile::new(
        doc.standard.clone(),
        specials.pop(),
        weight_tenths,
        doc.ns_role_usage,
        doc.ew_role_usage,
    ))
}

fn build_random_suit(doc: &RandomSuitDoc) -> RandomSuitConstraint {
    let mut pair_overrides = BTreeMap::new();
    for override_doc in &doc.pair_overrides {
        pair_overrides.insert(
            SuitPair::new(override_doc.suits[0], override_doc.suits[1]),
            override_doc.ranges,
        );
    }
    RandomSuitConstraint {
        required_suits: doc.required_suits_count,
        allowed_suits: SuitSet::from_suits(&doc.allowed_suits),
        suit_ranges: doc.suit_ranges.clone(),
        pair_overrides,
    }
}

fn build_contingent(doc: &ContingentDoc) -> ContingentSuit {
    ContingentSuit {
        target_seat: doc.target_seat,
        suit_range: doc.suit_range,
        use_non_chosen_suit: doc.use_non_chosen_suit,
    }
}

/// Declared percentages carry at most one decimal place; anything finer is a
/// document error rather than silent rounding.
fn weight_tenths(seat: Seat, index: usize, percent: f64) -> Result<u16, ProfileError> {
    let invalid = ProfileError::InvalidWeight {
        seat,
        subprofile: index,
    };
    if !percent.is_finite() || percent < 0.0 || percent > 200.0 {
        return Err(invalid);
    }
    let tenths = percent * 10.0;
    if (tenths - tenths.round()).abs() > 1e-6 {
        return Err(invalid);
    }
    Ok(tenths.round() as u16)
}

fn parse_role_mode(
    partnership: Partnership,
    value: Option<&str>,
) -> Result<RoleMode, ProfileError> {
    let Some(value) = value else {
        return Ok(RoleMode::Independent);
    };
    let mode = match value {
        "no_driver_no_index" => RoleMode::Independent,
        "random_driver" => RoleMode::RandomDriver,
        "north_drives" => RoleMode::Drives(Seat::North),
        "east_drives" => RoleMode::Drives(Seat::East),
        "south_drives" => RoleMode::Drives(Seat::South),
        "west_drives" => RoleMode::Drives(Seat::West),
        _ => {
            return Err(ProfileError::InvalidRoleMode {
                partnership,
                value: value.to_string(),
            });
        }
    };
    if let RoleMode::Drives(seat) = mode {
        if !partnership.contains(seat) {
            return Err(ProfileError::InvalidRoleMode {
                partnership,
                value: value.to_string(),
            });
        }
    }
    Ok(mode)
}

fn build_bespoke_map(
    partnership: Partnership,
    entries: BTreeMap<String, Vec<usize>>,
) -> Result<BespokeMap, ProfileError> {
    let mut parsed = BTreeMap::new();
    for (key, followers) in entries {
        let driver_index: usize =
            key.parse()
                .map_err(|_| ProfileError::InvalidBespokeMap {
                    partnership,
                    detail: format!("key '{key}' is not a subprofile index"),
                })?;
        parsed.insert(driver_index, followers);
    }
    Ok(BespokeMap::new(parsed))
}
