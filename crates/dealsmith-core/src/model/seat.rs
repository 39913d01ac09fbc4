use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum Seat {
    #[serde(rename = "N")]
    North = 0,
    #[serde(rename = "E")]
    East = 1,
    #[serde(rename = "S")]
    South = 2,
    #[serde(rename = "W")]
    West = 3,
}

impl Seat {
    pub const LOOP: [Seat; 4] = [Seat::North, Seat::East, Seat::South, Seat::West];

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Seat::North),
            1 => Some(Seat::East),
            2 => Some(Seat::South),
            3 => Some(Seat::West),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Clockwise neighbour.
    pub const fn next(self) -> Seat {
        match self {
            Seat::North => Seat::East,
            Seat::East => Seat::South,
            Seat::South => Seat::West,
            Seat::West => Seat::North,
        }
    }

    pub const fn partner(self) -> Seat {
        match self {
            Seat::North => Seat::South,
            Seat::East => Seat::West,
            Seat::South => Seat::North,
            Seat::West => Seat::East,
        }
    }

    pub const fn partnership(self) -> Partnership {
        match self {
            Seat::North | Seat::South => Partnership::NorthSouth,
            Seat::East | Seat::West => Partnership::EastWest,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Seat::North => "North",
            Seat::East => "East",
            Seat::South => "South",
            Seat::West => "West",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partnership {
    NorthSouth,
    EastWest,
}

impl Partnership {
    pub const BOTH: [Partnership; 2] = [Partnership::NorthSouth, Partnership::EastWest];

    pub const fn seats(self) -> [Seat; 2] {
        match self {
            Partnership::NorthSouth => [Seat::North, Seat::South],
            Partnership::EastWest => [Seat::East, Seat::West],
        }
    }

    pub const fn contains(self, seat: Seat) -> bool {
        matches!(
            (self, seat),
            (Partnership::NorthSouth, Seat::North | Seat::South)
                | (Partnership::EastWest, Seat::East | Seat::West)
        )
    }
}

impl fmt::Display for Partnership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Partnership::NorthSouth => "NS",
            Partnership::EastWest => "EW",
        };
        f.write_str(label)
    }
}
