use crate::model::seat::Partnership;
use crate::profile::constraint::{ContingentSuit, RandomSuitConstraint, SpecialConstraint};
use crate::profile::range::StandardConstraints;
use serde::{Deserialize, Serialize};

/// How a subprofile may be used when its partnership runs in a coupled role
/// mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleUsage {
    #[default]
    Any,
    DriverOnly,
    FollowerOnly,
}

impl RoleUsage {
    pub const fn allows_driver(self) -> bool {
        matches!(self, RoleUsage::Any | RoleUsage::DriverOnly)
    }

    pub const fn allows_follower(self) -> bool {
        matches!(self, RoleUsage::Any | RoleUsage::FollowerOnly)
    }
}

/// One complete constraint alternative for a seat. A seat's effective
/// constraint on any board is exactly one of its subprofiles.
#[derive(Debug, Clone, PartialEq)]
pub struct SubProfile {
    standard: StandardConstraints,
    special: Option<SpecialConstraint>,
    weight_tenths: u16,
    ns_role_usage: RoleUsage,
    ew_role_usage: RoleUsage,
}

impl SubProfile {
    pub fn new(
        standard: StandardConstraints,
        special: Option<SpecialConstraint>,
        weight_tenths: u16,
        ns_role_usage: RoleUsage,
        ew_role_usage: RoleUsage,
    ) -> Self {
        Self {
            standard,
            special,
            weight_tenths,
            ns_role_usage,
            ew_role_usage,
        }
    }

    /// Unconstrained subprofile with the given weight, in tenths of a percent.
    pub fn open(weight_tenths: u16) -> Self {
        Self::new(
            StandardConstraints::default(),
            None,
            weight_tenths,
            RoleUsage::Any,
            RoleUsage::Any,
        )
    }

    pub fn standard(&self) -> &StandardConstraints {
        &self.standard
    }

    pub fn special(&self) -> Option<&SpecialConstraint> {
        self.special.as_ref()
    }

    pub fn random_suit(&self) -> Option<&RandomSuitConstraint> {
        self.special.as_ref().and_then(SpecialConstraint::random_suit)
    }

    pub fn contingent(&self) -> Option<&ContingentSuit> {
        self.special.as_ref().and_then(SpecialConstraint::contingent)
    }

    /// Selection weight in tenths of a percent; a seat's subprofiles sum to
    /// 1000 after normalization.
    pub fn weight_tenths(&self) -> u16 {
        self.weight_tenths
    }

    pub(crate) fn set_weight_tenths(&mut self, weight_tenths: u16) {
        self.weight_tenths = weight_tenths;
    }

    /// Role usage for the seat's own partnership.
    pub fn role_usage(&self, partnership: Partnership) -> RoleUsage {
        match partnership {
            Partnership::NorthSouth => self.ns_role_usage,
            Partnership::EastWest => self.ew_role_usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RoleUsage, SubProfile};
    use crate::model::seat::Partnership;

    #[test]
    fn role_usage_gates_driver_and_follower() {
        assert!(RoleUsage::Any.allows_driver());
        assert!(RoleUsage::Any.allows_follower());
        assert!(RoleUsage::DriverOnly.allows_driver());
        assert!(!RoleUsage::DriverOnly.allows_follower());
        assert!(!RoleUsage::FollowerOnly.allows_driver());
        assert!(RoleUsage::FollowerOnly.allows_follower());
    }

    #[test]
    fn open_subprofile_has_no_special_constraint() {
        let sub = SubProfile::open(250);
        assert!(sub.special().is_none());
        assert_eq!(sub.weight_tenths(), 250);
        assert_eq!(sub.role_usage(Partnership::NorthSouth), RoleUsage::Any);
    }
}
