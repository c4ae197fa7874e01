//! grid_town: an evacuation in a synthetic grid town.
//!
//! Reads a JSON scenario (default `demos/grid_town/scenario.json`), runs it,
//! prints the evacuation curve, and writes per-tick aggregates and the
//! scenario geometry under `output/grid_town/`.
//!
//! ```text
//! cargo run -p grid_town -- [scenario.json]
//! RUST_LOG=debug cargo run -p grid_town      # per-agent decisions
//! ```

mod town;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use ev_agent::Status;
use ev_core::{Tick, TravelMode};
use ev_sim::{AgentSnapshot, ModelBuilder, ScenarioConfig, SimObserver, TickSummary};
use ev_spatial::EvacuationZone;

const DEFAULT_SCENARIO: &str = "demos/grid_town/scenario.json";
const OUTPUT_DIR: &str = "output/grid_town";
/// Print a progress line every this many ticks.
const PRINT_EVERY: u64 = 30;

// ── Observer ──────────────────────────────────────────────────────────────────

/// Prints progress and streams tick summaries to CSV.
struct Reporter {
    summaries: csv::Writer<File>,
    error:     Option<csv::Error>,
    moving:    usize,
}

impl Reporter {
    fn new(path: &Path) -> Result<Self> {
        let summaries = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
        Ok(Self { summaries, error: None, moving: 0 })
    }

    fn finish(mut self) -> Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e.into());
        }
        self.summaries.flush()?;
        Ok(())
    }
}

impl SimObserver for Reporter {
    fn on_hazard(&mut self, tick: Tick, zone: &EvacuationZone, flagged: usize) {
        println!(
            "{tick}: hazard at {} (r = {:.0} m), {} walking / {} driving exits, {flagged} agents inside",
            zone.centre(),
            zone.radius_m(),
            zone.exits_for(TravelMode::Walk).len(),
            zone.exits_for(TravelMode::Car).len(),
        );
    }

    fn on_tick_end(&mut self, s: &TickSummary) {
        if self.error.is_none() {
            if let Err(e) = self.summaries.serialize(s) {
                self.error = Some(e);
            }
        }
        if s.tick.0 % PRINT_EVERY == 0 {
            println!(
                "{:>8}  {:>5}/{:<5} evacuated  {:>5} on the move",
                s.time.to_string(),
                s.number_evacuated,
                s.number_requiring_evacuation,
                self.moving,
            );
        }
    }

    fn on_snapshot(&mut self, _tick: Tick, agents: &[AgentSnapshot]) {
        self.moving = agents
            .iter()
            .filter(|a| matches!(a.status, Status::Travelling | Status::Evacuating))
            .count();
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn load_scenario(path: &Path) -> Result<ScenarioConfig> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let scenario_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SCENARIO));
    let config = load_scenario(&scenario_path)?;
    info!("scenario {}: {} agents, seed {}", scenario_path.display(), config.num_agents, config.seed);

    let (walk, drive) = town::networks()?;
    let buildings = town::buildings()?;
    println!(
        "Town: {0}×{0} streets, {1} m blocks, {2} buildings",
        town::GRID,
        town::BLOCK_M,
        buildings.len(),
    );

    let mut model = ModelBuilder::standard(config, walk, drive, buildings).build()?;

    let out = Path::new(OUTPUT_DIR);
    fs::create_dir_all(out)?;
    let mut reporter = Reporter::new(&out.join("tick_summaries.csv"))?;

    let t0 = Instant::now();
    let last = model.run(&mut reporter);
    let elapsed = t0.elapsed();
    reporter.finish()?;

    let export_path = out.join("scenario_export.json");
    let file = File::create(&export_path).with_context(|| format!("creating {}", export_path.display()))?;
    serde_json::to_writer(BufWriter::new(file), &model.export())?;

    println!();
    println!("Finished at {} after {} ticks in {:.3} s", last.time, last.tick.0, elapsed.as_secs_f64());
    println!(
        "  {} of {} agents requiring evacuation got out",
        last.number_evacuated, last.number_requiring_evacuation,
    );
    let stranded = model.population.iter().filter(|a| a.stranded).count();
    let sheltering = model.population.iter().filter(|a| a.sheltering).count();
    println!("  {stranded} stranded, {sheltering} sheltering at home");

    if !model.sensors.is_empty() {
        println!();
        println!("{:<8} {:>6} {:>8} {:>8}", "Way", "Total", "Walking", "Driving");
        for s in model.sensors.iter() {
            println!(
                "{:<8} {:>6} {:>8} {:>8}",
                s.way_id,
                s.count(),
                s.count_mode(TravelMode::Walk),
                s.count_mode(TravelMode::Car),
            );
        }
    }

    info!("wrote {} and {}", out.join("tick_summaries.csv").display(), export_path.display());
    Ok(())
}
