//! simulation session: owns the world state and the per-tick ordering
//!
//! One [`Session`] is one run. The host drives it with [`Session::tick`]
//! and reads back events as plain values; there is no event bus.

use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::cell::{Content, Coord};
use crate::config::SimConfig;
use crate::content::ContentGenerator;
use crate::error::Result;
use crate::fleet::Fleet;
use crate::grid::GridWindow;
use crate::path;
use crate::visibility;

/// what happened during one tick
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// the fleet settled on a course waypoint
    WaypointReached { coord: Coord },
    /// a point of interest was claimed on arrival; its content is gone from
    /// the cell and its origin is excluded from future generation
    PoiClaimed { coord: Coord, variant: u8 },
    /// the last waypoint of the course was consumed
    CourseCompleted,
}

pub struct Session {
    config: SimConfig,
    grid: GridWindow,
    fleet: Fleet,
    generator: ContentGenerator,
    collected: HashSet<Coord>,
    rng: ChaCha8Rng,
}

impl Session {
    /// Validate the configuration and materialize the initial window around
    /// the origin.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let mut session = Self {
            grid: GridWindow::new(config.half_width, config.half_height, config.pool_ceiling()),
            fleet: Fleet::new(&config),
            generator: ContentGenerator::new(&config),
            collected: HashSet::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
        };
        session
            .grid
            .reconcile(&session.generator, &session.collected, &mut session.rng)?;
        Ok(session)
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Within one tick, movement and window upkeep resolve first, then
    /// visibility, then claim handling for the waypoint settled this tick.
    pub fn tick(&mut self, dt: f32) -> Result<Vec<Event>> {
        let mut events = Vec::new();

        /* ---------- movement & window upkeep ---------- */
        self.fleet.ease_visibility(dt);
        let reached = self.fleet.advance(dt);
        self.grid.recenter(self.fleet.coord());
        if !self.grid.is_settled() {
            self.grid
                .reconcile(&self.generator, &self.collected, &mut self.rng)?;
        }

        /* ---------- visibility ---------- */
        let view = self.fleet.view();
        let low_multiplier = self.config.low_visibility_multiplier;
        let fade_rate = self.config.fade_speed * dt;
        for cell in self.grid.cells_mut() {
            cell.tier = visibility::tier(cell.coord, cell.content, Some(view), low_multiplier);
            cell.reveal = visibility::fade_step(cell.tier, cell.pending_removal, cell.reveal, fade_rate);
        }

        /* ---------- claims & course bookkeeping ---------- */
        if let Some(coord) = reached {
            events.push(Event::WaypointReached { coord });
            if let Some(Content::PointOfInterest { variant, origin }) =
                self.grid.claim_poi(coord)
            {
                self.collected.insert(origin);
                info!(%origin, variant, "point of interest claimed");
                events.push(Event::PoiClaimed {
                    coord: origin,
                    variant,
                });
            }
            if !self.fleet.has_course() {
                events.push(Event::CourseCompleted);
            }
        }

        Ok(events)
    }

    /// Plan a route from the fleet's cell and make it the active course.
    /// Any previous course is abandoned. Returns the installed waypoints.
    pub fn set_course(&mut self, target: Coord) -> Vec<Coord> {
        let route: Vec<Coord> = path::plan(self.fleet.coord(), target, &self.grid)
            .iter()
            .map(|cell| cell.coord)
            .collect();
        debug!(%target, waypoints = route.len(), "course laid in");
        self.fleet.set_course(route.iter().copied());
        route
    }

    /// New game: forget every claim, return the fleet to the origin and
    /// refill the window there.
    pub fn reset(&mut self) -> Result<()> {
        info!("session reset");
        self.collected.clear();
        self.fleet.reset();
        self.grid.clear();
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.grid
            .reconcile(&self.generator, &self.collected, &mut self.rng)
    }

    /* ---------- read access for the host ---------- */

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn grid(&self) -> &GridWindow {
        &self.grid
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    /// origins of every claimed point of interest this run
    pub fn collected(&self) -> &HashSet<Coord> {
        &self.collected
    }
}
