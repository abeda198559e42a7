//! sparse active window: recenter diffing, cell spawning and pooling
//!
//! The window owns every live [`CellRecord`]; visibility and routing only
//! read it. Records cycle through a bounded pool instead of being
//! reallocated as the window scrolls.

use std::collections::{HashMap, HashSet};

use glam::Vec2;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::cell::{CellRecord, Content, Coord};
use crate::content::ContentGenerator;
use crate::error::{Result, SimError};

pub struct GridWindow {
    half_width: i32,
    half_height: i32,
    center: Coord,
    last_center: Coord,
    active: HashMap<Coord, CellRecord>,
    free: Vec<CellRecord>,
    /// records created so far; never exceeds `capacity`
    spawned: usize,
    capacity: usize,
}

impl GridWindow {
    pub fn new(half_width: i32, half_height: i32, capacity: usize) -> Self {
        Self {
            half_width,
            half_height,
            center: Coord::ORIGIN,
            last_center: Coord::ORIGIN,
            active: HashMap::new(),
            free: Vec::new(),
            spawned: 0,
            capacity,
        }
    }

    /* ===========================================================
       queries
       =========================================================== */

    pub fn center(&self) -> Coord {
        self.center
    }

    /// has the active map caught up with the latest recenter?
    pub fn is_settled(&self) -> bool {
        self.center == self.last_center
    }

    /// rectangle membership against the current center
    #[inline]
    pub fn in_window(&self, coord: Coord) -> bool {
        (coord.x - self.center.x).abs() <= self.half_width
            && (coord.y - self.center.y).abs() <= self.half_height
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.active.contains_key(&coord)
    }

    pub fn get(&self, coord: Coord) -> Option<&CellRecord> {
        self.active.get(&coord)
    }

    /// cell under a continuous position, if its coordinate is active
    pub fn cell_at(&self, pos: Vec2) -> Option<&CellRecord> {
        self.get(Coord::round_from(pos))
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = &CellRecord> {
        self.active.values()
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut CellRecord> {
        self.active.values_mut()
    }

    /* ===========================================================
       recenter & reconcile
       =========================================================== */

    /// Move the window target. The active map is untouched until the next
    /// [`reconcile`](Self::reconcile).
    pub fn recenter(&mut self, new_center: Coord) {
        self.center = new_center;
    }

    /// Bring the active map into agreement with the current rectangle.
    ///
    /// The sweep is expanded per axis by the magnitude of the center's
    /// movement since the last settle, so cells jumped over in one step are
    /// still created and destroyed individually rather than skipped.
    pub fn reconcile(
        &mut self,
        generator: &ContentGenerator,
        collected: &HashSet<Coord>,
        rng: &mut ChaCha8Rng,
    ) -> Result<()> {
        let sweep_x = (self.center.x - self.last_center.x).abs();
        let sweep_y = (self.center.y - self.last_center.y).abs();
        let (mut created, mut evicted) = (0usize, 0usize);

        for x in (self.center.x - self.half_width - sweep_x)
            ..=(self.center.x + self.half_width + sweep_x)
        {
            for y in (self.center.y - self.half_height - sweep_y)
                ..=(self.center.y + self.half_height + sweep_y)
            {
                let coord = Coord::new(x, y);
                if self.in_window(coord) {
                    if !self.active.contains_key(&coord) {
                        let mut record = self.acquire()?;
                        record.coord = coord;
                        record.content = generator.populate(coord, collected, rng);
                        trace!(%coord, content = ?record.content, "cell spawned");
                        self.active.insert(coord, record);
                        created += 1;
                    }
                } else if let Some(mut record) = self.active.remove(&coord) {
                    record.pending_removal = true;
                    trace!(%coord, "cell evicted");
                    self.release(record);
                    evicted += 1;
                }
            }
        }

        if created > 0 || evicted > 0 {
            debug!(center = %self.center, created, evicted, "window reconciled");
        }
        self.last_center = self.center;
        Ok(())
    }

    /// Take the point of interest out of a cell, leaving it empty.
    pub fn claim_poi(&mut self, coord: Coord) -> Option<Content> {
        let record = self.active.get_mut(&coord)?;
        if record.content.is_poi() {
            Some(std::mem::replace(&mut record.content, Content::Empty))
        } else {
            None
        }
    }

    /// Evict everything and retarget the origin; the caller refills with a
    /// reconcile pass.
    pub fn clear(&mut self) {
        for (_, mut record) in self.active.drain() {
            record.pending_removal = true;
            self.free.push(record);
        }
        self.center = Coord::ORIGIN;
        self.last_center = Coord::ORIGIN;
    }

    /* ===========================================================
       record pool
       =========================================================== */

    /// one owner per record; acquired records come back reset
    fn acquire(&mut self) -> Result<CellRecord> {
        if let Some(mut record) = self.free.pop() {
            record.reset();
            return Ok(record);
        }
        if self.spawned >= self.capacity {
            return Err(SimError::PoolExhausted {
                capacity: self.capacity,
            });
        }
        self.spawned += 1;
        Ok(CellRecord::pooled())
    }

    fn release(&mut self, record: CellRecord) {
        self.free.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use rand::SeedableRng;

    struct Fixture {
        grid: GridWindow,
        generator: ContentGenerator,
        collected: HashSet<Coord>,
        rng: ChaCha8Rng,
        half_width: i32,
        half_height: i32,
    }

    impl Fixture {
        fn new(half_width: i32, half_height: i32) -> Self {
            let config = SimConfig {
                half_width,
                half_height,
                seed: 5,
                poi_probability: 0.5,
                background_probability: 0.7,
                ..SimConfig::default()
            };
            let mut fixture = Self {
                grid: GridWindow::new(half_width, half_height, config.pool_ceiling()),
                generator: ContentGenerator::new(&config),
                collected: HashSet::new(),
                rng: ChaCha8Rng::seed_from_u64(5),
                half_width,
                half_height,
            };
            fixture.reconcile();
            fixture
        }

        fn reconcile(&mut self) {
            self.grid
                .reconcile(&self.generator, &self.collected, &mut self.rng)
                .unwrap();
        }

        fn move_to(&mut self, x: i32, y: i32) {
            self.grid.recenter(Coord::new(x, y));
            self.reconcile();
        }

        fn assert_window_exact(&self) {
            let expected = ((2 * self.half_width + 1) * (2 * self.half_height + 1)) as usize;
            assert_eq!(self.grid.active_len(), expected);
            let center = self.grid.center();
            for dx in -self.half_width..=self.half_width {
                for dy in -self.half_height..=self.half_height {
                    let coord = Coord::new(center.x + dx, center.y + dy);
                    assert!(self.grid.contains(coord), "missing {coord}");
                }
            }
            for cell in self.grid.cells() {
                assert!(self.grid.in_window(cell.coord), "stray {}", cell.coord);
            }
        }
    }

    #[test]
    fn initial_fill_covers_the_rectangle() {
        let fixture = Fixture::new(3, 2);
        fixture.assert_window_exact();
    }

    #[test]
    fn small_scroll_keeps_the_invariant() {
        let mut fixture = Fixture::new(3, 2);
        fixture.move_to(1, 0);
        fixture.move_to(2, -1);
        fixture.assert_window_exact();
    }

    #[test]
    fn large_jump_sweeps_everything_in_between() {
        let mut fixture = Fixture::new(3, 2);
        // jump farther than the window extent in one reconcile
        fixture.move_to(15, 9);
        fixture.assert_window_exact();
        // nothing from the old rectangle survives
        assert!(!fixture.grid.contains(Coord::ORIGIN));
    }

    #[test]
    fn reconcile_is_idempotent_once_settled() {
        let mut fixture = Fixture::new(3, 2);
        fixture.move_to(4, 2);
        let spawned = fixture.grid.spawned;
        let active = fixture.grid.active_len();

        fixture.move_to(4, 2);
        assert_eq!(fixture.grid.spawned, spawned);
        assert_eq!(fixture.grid.active_len(), active);
    }

    #[test]
    fn records_are_recycled_while_scrolling() {
        let mut fixture = Fixture::new(3, 2);
        let capacity = fixture.grid.capacity;
        for step in 1..=30 {
            fixture.move_to(step, 0);
            assert!(fixture.grid.spawned <= capacity);
            assert!(fixture.grid.active_len() <= capacity);
        }
    }

    #[test]
    fn acquire_beyond_capacity_is_fatal() {
        let config = SimConfig {
            half_width: 3,
            half_height: 2,
            ..SimConfig::default()
        };
        // room for less than one window's worth of live cells
        let mut grid = GridWindow::new(3, 2, config.window_area() - 1);
        let generator = ContentGenerator::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        let result = grid.reconcile(&generator, &HashSet::new(), &mut rng);
        assert!(matches!(result, Err(SimError::PoolExhausted { .. })));
    }

    #[test]
    fn cell_at_rounds_to_the_nearest_cell() {
        let fixture = Fixture::new(3, 2);
        let cell = fixture.grid.cell_at(Vec2::new(1.4, -0.6)).unwrap();
        assert_eq!(cell.coord, Coord::new(1, -1));
        // outside the window is a plain miss, not an error
        assert!(fixture.grid.cell_at(Vec2::new(40.0, 0.0)).is_none());
    }

    #[test]
    fn claim_empties_the_cell_and_returns_the_content() {
        let mut fixture = Fixture::new(6, 6);
        let poi = fixture
            .grid
            .cells()
            .find(|cell| cell.content.is_poi())
            .map(|cell| cell.coord)
            .expect("a point of interest inside the window");

        let content = fixture.grid.claim_poi(poi).unwrap();
        assert!(content.is_poi());
        assert!(fixture.grid.get(poi).unwrap().content.is_empty());
        // a second claim finds nothing
        assert!(fixture.grid.claim_poi(poi).is_none());
    }
}
