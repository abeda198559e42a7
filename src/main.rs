//! headless demo voyage for the farwater core
//!
//! Runs a scripted course through a fresh session and logs what happens
//! along the way. `RUST_LOG=farwater=trace` shows per-cell spawn and evict
//! churn; the default filter sticks to the interesting events.

use std::path::Path;

use farwater::{Coord, Event, Session, SimConfig};

const TICK_DT: f32 = 1.0 / 60.0;
/// per-leg safety stop in case a course never completes
const MAX_TICKS_PER_LEG: u32 = 20_000;

fn main() -> farwater::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farwater=info".into()),
        )
        .init();

    let mut session = Session::new(load_config())?;

    // a small scripted tour: east, a diagonal sweep south-west, then home
    let legs = [Coord::new(9, 3), Coord::new(-6, -5), Coord::ORIGIN];
    let mut claimed = 0usize;

    for leg in legs {
        let route = session.set_course(leg);
        tracing::info!(leg = %leg, waypoints = route.len(), "departing");
        if route.is_empty() {
            continue;
        }

        let mut done = false;
        for _ in 0..MAX_TICKS_PER_LEG {
            for event in session.tick(TICK_DT)? {
                match event {
                    Event::WaypointReached { coord } => {
                        tracing::debug!(%coord, "waypoint reached")
                    }
                    Event::PoiClaimed { coord, variant } => {
                        claimed += 1;
                        tracing::info!(%coord, variant, "salvaged a point of interest");
                    }
                    Event::CourseCompleted => done = true,
                }
            }
            if done {
                break;
            }
        }
        if !done {
            tracing::warn!(leg = %leg, "leg abandoned after tick limit");
        }
    }

    tracing::info!(
        claimed,
        active_cells = session.grid().active_len(),
        visibility = session.fleet().visibility(),
        "voyage over"
    );
    Ok(())
}

/// optional `farwater.toml` next to the working directory, else defaults
fn load_config() -> SimConfig {
    let path = Path::new("farwater.toml");
    if path.exists() {
        match SimConfig::load(path) {
            Ok(config) => return config,
            Err(err) => tracing::warn!(%err, "config file ignored"),
        }
    }
    SimConfig::default()
}
