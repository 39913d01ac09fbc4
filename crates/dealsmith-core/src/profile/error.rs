use crate::model::seat::{Partnership, Seat};
use crate::model::suit::Suit;
use std::fmt;

/// Validation-time failures raised while loading or vetting a profile.
///
/// Every variant names the invariant that was violated; none of these are
/// raised once board generation has started.
#[derive(Debug)]
pub enum ProfileError {
    Parse(serde_json::Error),
    MissingSeat {
        seat: Seat,
    },
    EmptySeat {
        seat: Seat,
    },
    InvalidSuitRange {
        seat: Seat,
        subprofile: usize,
        detail: String,
    },
    InvalidTotalHcp {
        seat: Seat,
        subprofile: usize,
    },
    MultipleSpecialConstraints {
        seat: Seat,
        subprofile: usize,
    },
    InvalidRandomSuit {
        seat: Seat,
        subprofile: usize,
        detail: String,
    },
    InvalidContingent {
        seat: Seat,
        subprofile: usize,
        detail: String,
    },
    ContingentOrdering {
        dependent: Seat,
        target: Seat,
    },
    NonChosenSuitSurplus {
        dependent: Seat,
        target: Seat,
    },
    InvalidWeight {
        seat: Seat,
        subprofile: usize,
    },
    WeightSum {
        seat: Seat,
        declared_tenths: u32,
    },
    InvalidDealingOrder {
        detail: String,
    },
    InvalidRoleMode {
        partnership: Partnership,
        value: String,
    },
    InvalidBespokeMap {
        partnership: Partnership,
        detail: String,
    },
    InvalidExclusion {
        seat: Seat,
        subprofile: usize,
    },
    NoViableSubprofile {
        seat: Seat,
    },
    NoJointlyViableIndex {
        partnership: Partnership,
    },
    JointlyInfeasiblePair {
        partnership: Partnership,
        index: usize,
        suit: Suit,
    },
    DeckHcpOvercommitted {
        required: u32,
    },
    DeckSuitOvercommitted {
        suit: Suit,
        required: u32,
    },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::Parse(err) => write!(f, "profile document does not parse: {err}"),
            ProfileError::MissingSeat { seat } => {
                write!(f, "profile document defines no entry for {seat}")
            }
            ProfileError::EmptySeat { seat } => {
                write!(f, "{seat} declares no subprofiles")
            }
            ProfileError::InvalidSuitRange {
                seat,
                subprofile,
                detail,
            } => write!(f, "{seat} subprofile {subprofile}: {detail}"),
            ProfileError::InvalidTotalHcp { seat, subprofile } => write!(
                f,
                "{seat} subprofile {subprofile}: total HCP bounds must satisfy min <= max <= 37"
            ),
            ProfileError::MultipleSpecialConstraints { seat, subprofile } => write!(
                f,
                "{seat} subprofile {subprofile}: at most one of the random-suit and contingent constraints may be set"
            ),
            ProfileError::InvalidRandomSuit {
                seat,
                subprofile,
                detail,
            } => write!(
                f,
                "{seat} subprofile {subprofile}: random-suit constraint is malformed: {detail}"
            ),
            ProfileError::InvalidContingent {
                seat,
                subprofile,
                detail,
            } => write!(
                f,
                "{seat} subprofile {subprofile}: contingent constraint is malformed: {detail}"
            ),
            ProfileError::ContingentOrdering { dependent, target } => write!(
                f,
                "{dependent} depends on {target}'s suit choice but is dealt before it"
            ),
            ProfileError::NonChosenSuitSurplus { dependent, target } => write!(
                f,
                "{dependent} targets {target}'s non-chosen suit, which requires every random-suit subprofile of {target} to leave exactly one allowed suit unchosen"
            ),
            ProfileError::InvalidWeight { seat, subprofile } => write!(
                f,
                "{seat} subprofile {subprofile}: weight must be non-negative with at most one decimal place"
            ),
            ProfileError::WeightSum {
                seat,
                declared_tenths,
            } => write!(
                f,
                "{seat}: declared weights sum to {}.{}% which is outside the 100% +/- 2 tolerance",
                declared_tenths / 10,
                declared_tenths % 10
            ),
            ProfileError::InvalidDealingOrder { detail } => {
                write!(f, "dealing order is invalid: {detail}")
            }
            ProfileError::InvalidRoleMode { partnership, value } => {
                write!(f, "{partnership} role mode '{value}' is not recognised")
            }
            ProfileError::InvalidBespokeMap {
                partnership,
                detail,
            } => write!(f, "{partnership} bespoke map is invalid: {detail}"),
            ProfileError::InvalidExclusion { seat, subprofile } => write!(
                f,
                "exclusion rule references {seat} subprofile {subprofile} which does not exist"
            ),
            ProfileError::NoViableSubprofile { seat } => {
                write!(f, "{seat} has no individually viable subprofile")
            }
            ProfileError::NoJointlyViableIndex { partnership } => write!(
                f,
                "{partnership} coupling admits no index where both partners are viable"
            ),
            ProfileError::JointlyInfeasiblePair {
                partnership,
                index,
                suit,
            } => write!(
                f,
                "{partnership} subprofile pair {index} demands more than 13 {suit} cards between the partners"
            ),
            ProfileError::DeckHcpOvercommitted { required } => write!(
                f,
                "best-case seat minimums demand {required} HCP but the deck holds 40"
            ),
            ProfileError::DeckSuitOvercommitted { suit, required } => write!(
                f,
                "best-case seat minimums demand {required} {suit} cards but the deck holds 13"
            ),
        }
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProfileError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ProfileError {
    fn from(err: serde_json::Error) -> Self {
        ProfileError::Parse(err)
    }
}
