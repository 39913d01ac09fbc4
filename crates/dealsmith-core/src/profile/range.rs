use crate::model::suit::Suit;
use serde::{Deserialize, Serialize};

/// Cards in one hand.
pub const HAND_SIZE: u8 = 13;
/// Most high-card points a single 13-card hand can hold.
pub const MAX_HAND_HCP: u8 = 37;
/// High-card points in the full deck.
pub const DECK_HCP: u8 = 40;

/// Card-count and high-card-point bounds for one suit of one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuitRange {
    #[serde(default)]
    pub min_cards: u8,
    #[serde(default = "default_max_cards")]
    pub max_cards: u8,
    #[serde(default)]
    pub min_hcp: u8,
    #[serde(default = "default_max_hcp")]
    pub max_hcp: u8,
}

fn default_max_cards() -> u8 {
    HAND_SIZE
}

fn default_max_hcp() -> u8 {
    MAX_HAND_HCP
}

impl SuitRange {
    pub const OPEN: SuitRange = SuitRange {
        min_cards: 0,
        max_cards: HAND_SIZE,
        min_hcp: 0,
        max_hcp: MAX_HAND_HCP,
    };

    pub fn validate(&self) -> Result<(), String> {
        if self.min_cards > self.max_cards {
            return Err(format!(
                "min_cards {} exceeds max_cards {}",
                self.min_cards, self.max_cards
            ));
        }
        if self.max_cards > HAND_SIZE {
            return Err(format!("max_cards {} exceeds {HAND_SIZE}", self.max_cards));
        }
        if self.min_hcp > self.max_hcp {
            return Err(format!(
                "min_hcp {} exceeds max_hcp {}",
                self.min_hcp, self.max_hcp
            ));
        }
        if self.max_hcp > MAX_HAND_HCP {
            return Err(format!("max_hcp {} exceeds {MAX_HAND_HCP}", self.max_hcp));
        }
        Ok(())
    }

    pub fn contains(&self, cards: usize, hcp: u8) -> bool {
        cards >= self.min_cards as usize
            && cards <= self.max_cards as usize
            && hcp >= self.min_hcp
            && hcp <= self.max_hcp
    }

    /// Intersection of two ranges, or `None` when they admit no common value.
    pub fn intersect(&self, other: &SuitRange) -> Option<SuitRange> {
        let merged = SuitRange {
            min_cards: self.min_cards.max(other.min_cards),
            max_cards: self.max_cards.min(other.max_cards),
            min_hcp: self.min_hcp.max(other.min_hcp),
            max_hcp: self.max_hcp.min(other.max_hcp),
        };
        if merged.min_cards > merged.max_cards || merged.min_hcp > merged.max_hcp {
            None
        } else {
            Some(merged)
        }
    }
}

impl Default for SuitRange {
    fn default() -> Self {
        SuitRange::OPEN
    }
}

/// Per-suit ranges plus whole-hand HCP bounds; the baseline constraint every
/// subprofile carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardConstraints {
    #[serde(default)]
    pub clubs: SuitRange,
    #[serde(default)]
    pub diamonds: SuitRange,
    #[serde(default)]
    pub hearts: SuitRange,
    #[serde(default)]
    pub spades: SuitRange,
    #[serde(default)]
    pub total_min_hcp: u8,
    #[serde(default = "default_max_hcp")]
    pub total_max_hcp: u8,
}

impl StandardConstraints {
    pub fn suit(&self, suit: Suit) -> &SuitRange {
        match suit {
            Suit::Clubs => &self.clubs,
            Suit::Diamonds => &self.diamonds,
            Suit::Hearts => &self.hearts,
            Suit::Spades => &self.spades,
        }
    }

    pub fn total_hcp_valid(&self) -> bool {
        self.total_min_hcp <= self.total_max_hcp && self.total_max_hcp <= MAX_HAND_HCP
    }
}

impl Default for StandardConstraints {
    fn default() -> Self {
        StandardConstraints {
            clubs: SuitRange::OPEN,
            diamonds: SuitRange::OPEN,
            hearts: SuitRange::OPEN,
            spades: SuitRange::OPEN,
            total_min_hcp: 0,
            total_max_hcp: MAX_HAND_HCP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{StandardConstraints, SuitRange};
    use crate::model::suit::Suit;

    #[test]
    fn open_range_accepts_everything() {
        assert!(SuitRange::OPEN.validate().is_ok());
        assert!(SuitRange::OPEN.contains(0, 0));
        assert!(SuitRange::OPEN.contains(13, 10));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let range = SuitRange {
            min_cards: 5,
            max_cards: 3,
            ..SuitRange::OPEN
        };
        assert!(range.validate().is_err());
    }

    #[test]
    fn intersect_narrows_both_axes() {
        let a = SuitRange {
            min_cards: 2,
            max_cards: 6,
            min_hcp: 0,
            max_hcp: 7,
        };
        let b = SuitRange {
            min_cards: 4,
            max_cards: 13,
            min_hcp: 3,
            max_hcp: 10,
        };
        let merged = a.intersect(&b).expect("overlapping ranges");
        assert_eq!(merged.min_cards, 4);
        assert_eq!(merged.max_cards, 6);
        assert_eq!(merged.min_hcp, 3);
        assert_eq!(merged.max_hcp, 7);
    }

    #[test]
    fn disjoint_ranges_have_no_intersection() {
        let a = SuitRange {
            min_cards: 0,
            max_cards: 2,
            ..SuitRange::OPEN
        };
        let b = SuitRange {
            min_cards: 5,
            max_cards: 13,
            ..SuitRange::OPEN
        };
        assert!(a.intersect(&b).is_none());
    }

    #[test]
    fn missing_document_fields_default_to_open() {
        let parsed: SuitRange = serde_json::from_str("{\"min_cards\": 4}").unwrap();
        assert_eq!(parsed.min_cards, 4);
        assert_eq!(parsed.max_cards, 13);
        assert_eq!(parsed.max_hcp, 37);
    }

    #[test]
    fn standard_constraints_index_by_suit() {
        let mut constraints = StandardConstraints::default();
        constraints.hearts.min_cards = 5;
        assert_eq!(constraints.suit(Suit::Hearts).min_cards, 5);
        assert_eq!(constraints.suit(Suit::Clubs).min_cards, 0);
    }
}
