//! The wheel's outcome space.
//!
//! Segments are drawn clockwise in declaration order, each taking an equal
//! slice of the circle. The same table drives the wheel drawing, result
//! validation on the server and the webhook embed colour.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One labeled slice of the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "LUCKY")]
    Lucky,
    #[serde(rename = "CURSED")]
    Cursed,
    #[serde(rename = "LEGEND")]
    Legend,
    #[serde(rename = "GOBLIN")]
    Goblin,
    #[serde(rename = "GENIUS")]
    Genius,
    #[serde(rename = "CLOWN")]
    Clown,
}

/// All segments in drawing order.
pub const SEGMENTS: [Segment; 6] = [
    Segment::Lucky,
    Segment::Cursed,
    Segment::Legend,
    Segment::Goblin,
    Segment::Genius,
    Segment::Clown,
];

impl Segment {
    /// Label shown on the wheel and stored in the `spins.result` column.
    pub const fn label(self) -> &'static str {
        match self {
            Segment::Lucky => "LUCKY",
            Segment::Cursed => "CURSED",
            Segment::Legend => "LEGEND",
            Segment::Goblin => "GOBLIN",
            Segment::Genius => "GENIUS",
            Segment::Clown => "CLOWN",
        }
    }

    /// Fill colour as `0xRRGGBB`.
    pub const fn color(self) -> u32 {
        match self {
            Segment::Lucky => 0x2ecc71,
            Segment::Cursed => 0x8e44ad,
            Segment::Legend => 0xf1c40f,
            Segment::Goblin => 0x27ae60,
            Segment::Genius => 0x3498db,
            Segment::Clown => 0xe74c3c,
        }
    }

    /// Segment at `index`, if in range.
    pub fn from_index(index: usize) -> Option<Self> {
        SEGMENTS.get(index).copied()
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a submitted label is not one of [`SEGMENTS`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown segment: {0}")]
pub struct UnknownSegment(pub String);

impl FromStr for Segment {
    type Err = UnknownSegment;

    /// Exact, case-sensitive match on the label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SEGMENTS
            .iter()
            .copied()
            .find(|seg| seg.label() == s)
            .ok_or_else(|| UnknownSegment(s.to_string()))
    }
}
