//! fog-of-war tier derivation, evaluated per cell every tick

use glam::Vec2;

use crate::cell::{Content, Coord, VisTier};

/// observer snapshot for one evaluation pass
#[derive(Clone, Copy, Debug)]
pub struct ObserverView {
    pub pos: Vec2,
    pub radius: f32,
}

/// Derive a cell's tier, in strict priority order: no observer, then
/// unidentified points of interest, then the fleet's visual range, then
/// the scanner ring.
pub fn tier(
    coord: Coord,
    content: Content,
    observer: Option<ObserverView>,
    low_multiplier: f32,
) -> VisTier {
    let Some(view) = observer else {
        return VisTier::Hidden;
    };
    if content.is_poi() {
        return VisTier::Poi;
    }
    let distance = coord.distance(view.pos);
    if distance < view.radius {
        return VisTier::High;
    }
    if distance < view.radius * low_multiplier {
        return VisTier::Low;
    }
    VisTier::Hidden
}

/// One reveal-fade step: grow while any visible tier is active, shrink when
/// hidden or leaving the window. The rate is the same for every visible
/// tier.
pub fn fade_step(tier: VisTier, pending_removal: bool, reveal: f32, rate: f32) -> f32 {
    if pending_removal || tier == VisTier::Hidden {
        (reveal - rate).max(0.0)
    } else {
        (reveal + rate).min(1.0)
    }
}
