//! per-cell data: coordinates, content and visibility tier

use std::fmt;

use glam::Vec2;

use crate::constants::FADE_DONE_EPSILON;

/* ===========================================================
   grid coordinates
   =========================================================== */

/// integer grid address, the identity key into the active window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// nearest cell under a continuous position
    pub fn round_from(pos: Vec2) -> Self {
        Self {
            x: pos.x.round() as i32,
            y: pos.y.round() as i32,
        }
    }

    #[inline]
    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }

    /// Euclidean distance from the cell center to a continuous position
    #[inline]
    pub fn distance(self, pos: Vec2) -> f32 {
        self.as_vec2().distance(pos)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/* ===========================================================
   cell content
   =========================================================== */

/// what a cell holds; a point of interest remembers the coordinate it was
/// generated at so a claim can be recorded against it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Content {
    Empty,
    Background { variant: u8 },
    PointOfInterest { variant: u8, origin: Coord },
}

impl Content {
    #[inline]
    pub fn is_poi(&self) -> bool {
        matches!(self, Content::PointOfInterest { .. })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Content::Empty)
    }
}

/* ===========================================================
   visibility tiers
   =========================================================== */

/// LOW covers the scanner ring, HIGH the fleet's own visual range,
/// POI marks cells holding an unidentified point of interest
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum VisTier {
    #[default]
    Hidden = 0,
    Low = 3,
    High = 5,
    Poi = 10,
}

/* ===========================================================
   pooled cell record
   =========================================================== */

/// one live cell of the active window, recycled through the record pool
#[derive(Clone, Debug)]
pub struct CellRecord {
    pub coord: Coord,
    pub content: Content,
    pub tier: VisTier,
    /// reveal animation progress in [0, 1]; the host reads it as a scale
    pub reveal: f32,
    /// set when the cell leaves the window, drives the outward fade
    pub pending_removal: bool,
}

impl CellRecord {
    pub(crate) fn pooled() -> Self {
        Self {
            coord: Coord::ORIGIN,
            content: Content::Empty,
            tier: VisTier::Hidden,
            reveal: 0.0,
            pending_removal: false,
        }
    }

    /// back to the acquire state: tier hidden, nothing inside, flags clear
    pub(crate) fn reset(&mut self) {
        self.content = Content::Empty;
        self.tier = VisTier::Hidden;
        self.reveal = 0.0;
        self.pending_removal = false;
    }

    /// true once the reveal animation has fully shrunk away
    #[inline]
    pub fn fully_hidden(&self) -> bool {
        self.reveal <= FADE_DONE_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_are_ordered() {
        assert!(VisTier::Hidden < VisTier::Low);
        assert!(VisTier::Low < VisTier::High);
        assert!(VisTier::High < VisTier::Poi);
    }

    #[test]
    fn round_from_picks_nearest_cell() {
        assert_eq!(Coord::round_from(Vec2::new(1.4, -2.6)), Coord::new(1, -3));
        assert_eq!(Coord::round_from(Vec2::new(-0.2, 0.2)), Coord::ORIGIN);
    }

    #[test]
    fn reset_restores_acquire_state() {
        let mut record = CellRecord::pooled();
        record.coord = Coord::new(3, 4);
        record.content = Content::Background { variant: 2 };
        record.tier = VisTier::High;
        record.reveal = 0.7;
        record.pending_removal = true;

        record.reset();
        assert!(record.content.is_empty());
        assert_eq!(record.tier, VisTier::Hidden);
        assert!(record.fully_hidden());
        assert!(!record.pending_removal);
    }
}
