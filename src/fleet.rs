//! fleet state: course following and visibility radius easing

use std::collections::VecDeque;

use glam::Vec2;

use crate::cell::Coord;
use crate::config::SimConfig;
use crate::visibility::ObserverView;

pub struct Fleet {
    pos: Vec2,
    base_visibility: f32,
    current_visibility: f32,
    visibility_change_speed: f32,
    speed: f32,
    reach_threshold: f32,
    course: VecDeque<Coord>,
}

impl Fleet {
    pub(crate) fn new(config: &SimConfig) -> Self {
        Self {
            pos: Vec2::ZERO,
            base_visibility: config.base_visibility,
            // a fresh run starts blind; the circle grows in over time
            current_visibility: 0.0,
            visibility_change_speed: config.visibility_change_speed,
            speed: config.fleet_speed,
            reach_threshold: config.waypoint_reach_threshold,
            course: VecDeque::new(),
        }
    }

    /* ---------- queries ---------- */

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    /// the cell the fleet currently occupies
    pub fn coord(&self) -> Coord {
        Coord::round_from(self.pos)
    }

    pub fn visibility(&self) -> f32 {
        self.current_visibility
    }

    /// snapshot handed to the visibility pass
    pub fn view(&self) -> ObserverView {
        ObserverView {
            pos: self.pos,
            radius: self.current_visibility,
        }
    }

    pub fn has_course(&self) -> bool {
        !self.course.is_empty()
    }

    pub fn course(&self) -> impl Iterator<Item = Coord> + '_ {
        self.course.iter().copied()
    }

    /* ---------- per-tick updates ---------- */

    /// installing a new course abandons any waypoints still pending
    pub(crate) fn set_course(&mut self, waypoints: impl IntoIterator<Item = Coord>) {
        self.course.clear();
        self.course.extend(waypoints);
    }

    /// grow the visible circle toward its configured base radius
    pub(crate) fn ease_visibility(&mut self, dt: f32) {
        if self.current_visibility < self.base_visibility {
            let gap = self.base_visibility - self.current_visibility;
            self.current_visibility += gap * (self.visibility_change_speed * dt).min(1.0);
        }
    }

    /// Advance toward the front waypoint; at most one waypoint is consumed
    /// per tick. Returns the waypoint if it was reached.
    pub(crate) fn advance(&mut self, dt: f32) -> Option<Coord> {
        let next = *self.course.front()?;
        let target = next.as_vec2();

        let to_target = target - self.pos;
        let distance = to_target.length();
        if distance > f32::EPSILON {
            // never overshoot the waypoint within one step
            let step = (self.speed * dt).min(distance);
            self.pos += to_target / distance * step;
        }

        if self.pos.distance(target) < self.reach_threshold {
            self.course.pop_front();
            return Some(next);
        }
        None
    }

    /// back to origin, blind, with no course
    pub(crate) fn reset(&mut self) {
        self.pos = Vec2::ZERO;
        self.current_visibility = 0.0;
        self.course.clear();
    }
}
