//! spine — smallest end-to-end example for the rust_tg framework.
//!
//! Assembles a three-vertebra spine: each vertebra is a hinged body tracking
//! a set-point angle trajectory, tied to its neighbour by a cable group and
//! carrying marker probes.  Runs it at 1 kHz and reports the tracked angles.
//!
//! Usage: `spine [config.json|-] [trajectory.csv]`.  The JSON is a
//! `tg_core::SimConfig` (`-` keeps the defaults).  The trajectory CSV has no
//! header; column 0 is control time in seconds and column `i + 1` holds the
//! set-point angles (rad) of vertebra `i`.  Without a path the bundled
//! `data/trajectory.csv` is used.
//! Set `RUST_LOG=debug` to see structural events from the model tree.

use std::io::Read;
use std::time::Instant;

use anyhow::{Context, Result, ensure};
use log::{debug, info};

use tg_core::{Marker, NodeId, SimConfig, Tags, Vec3};
use tg_model::{ModelTree, ModelVisitor, NodeBehavior, NodeRef};
use tg_sim::{RenderObserver, SimBuilder};

// ── Constants ─────────────────────────────────────────────────────────────────

const VERTEBRAE:    usize = 3;
const STEP_SECS:    f64   = 0.001;
const SIM_SECS:     f64   = 4.0;
const START_SECS:   f64   = 0.5;  // controllers idle before this
const SNAPSHOT_HZ:  u64   = 4;

const BUNDLED_TRAJECTORY: &str = include_str!("../data/trajectory.csv");

// ── World ─────────────────────────────────────────────────────────────────────

/// Stand-in for the physics world: records which hinges were registered.
#[derive(Default)]
struct SpineWorld {
    hinges: Vec<String>,
}

// ── Hinged vertebra ───────────────────────────────────────────────────────────

/// A vertebra rotating about its hinge axis under a PD controller.
struct Vertebra {
    name:       String,
    times:      Vec<f64>,
    angles:     Vec<f64>,
    kp:         f64,
    kd:         f64,
    angle:      f64,
    rate:       f64,
    time:       f64,
}

impl Vertebra {
    fn new(name: impl Into<String>, times: Vec<f64>, angles: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            times,
            angles,
            kp: 400.0,
            kd: 40.0,
            angle: 0.0,
            rate: 0.0,
            time: 0.0,
        }
    }

    /// Angle of the first sample not yet passed; the last one holds forever.
    fn setpoint(&self) -> f64 {
        let control_time = self.time - START_SECS;
        let idx = self
            .times
            .iter()
            .position(|&t| control_time <= t)
            .unwrap_or(self.times.len().saturating_sub(1));
        self.angles.get(idx).copied().unwrap_or(0.0)
    }
}

impl NodeBehavior<SpineWorld> for Vertebra {
    fn kind(&self) -> &str {
        "Vertebra"
    }

    fn on_setup(&mut self, world: &mut SpineWorld) {
        world.hinges.push(self.name.clone());
        self.angle = 0.0;
        self.rate = 0.0;
        self.time = 0.0;
    }

    fn on_step(&mut self, dt: f64) {
        self.time += dt;
        if self.time <= START_SECS {
            return;
        }
        let torque = self.kp * (self.setpoint() - self.angle) - self.kd * self.rate;
        self.rate += torque * dt;
        self.angle += self.rate * dt;
    }

    fn on_teardown(&mut self) {
        debug!("{} released at {:.3} rad", self.name, self.angle);
    }
}

// ── Angle probe (renderer) ────────────────────────────────────────────────────

/// Visitor sampling every vertebra's angle at each snapshot.
#[derive(Default)]
struct AngleProbe {
    samples: Vec<(String, f64)>,
}

impl ModelVisitor<SpineWorld> for AngleProbe {
    fn render(&mut self, node: NodeRef<'_, SpineWorld>) {
        if let Some(v) = node.behavior_as::<Vertebra>() {
            self.samples.push((v.name.clone(), v.angle));
        }
    }
}

// ── Assembly ──────────────────────────────────────────────────────────────────

/// Read a headerless trajectory CSV into columns.
///
/// Every row must have the same number of fields; column 0 is time and there
/// must be one angle column per vertebra.
fn load_trajectory<R: Read>(reader: R) -> Result<Vec<Vec<f64>>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut columns: Vec<Vec<f64>> = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        if columns.is_empty() {
            columns.resize_with(record.len(), Vec::new);
        }
        for (col, field) in record.iter().enumerate() {
            let value = field
                .parse::<f64>()
                .with_context(|| format!("trajectory row {}, column {}: {field:?}", row + 1, col))?;
            columns[col].push(value);
        }
    }
    ensure!(!columns.is_empty(), "trajectory has no rows");
    ensure!(
        columns.len() > VERTEBRAE,
        "trajectory has {} columns; need time plus {VERTEBRAE} angle columns",
        columns.len()
    );
    Ok(columns)
}

/// `spine → {segment i → {vertebra i, cables i}}`, markers on each vertebra.
fn build_spine(tree: &mut ModelTree<SpineWorld>, trajectory: &[Vec<f64>]) -> Result<NodeId> {
    ensure!(trajectory.len() > VERTEBRAE, "missing angle columns");
    let spine = tree.create("spine");
    for i in 0..VERTEBRAE {
        let segment = tree.create(format!("segment s{i}"));
        let vertebra = tree.create_with(
            format!("vertebra rod hinge v{i}"),
            Vertebra::new(format!("v{i}"), trajectory[0].clone(), trajectory[i + 1].clone()),
        );
        let cables = tree.create(format!("cable saddle c{i}"));

        tree.attach_child(spine, segment)?;
        tree.attach_child(segment, vertebra)?;
        tree.attach_child(segment, cables)?;

        for (k, y) in [0.0, 0.5].into_iter().enumerate() {
            let color = if k == 0 { Vec3::new(1.0, 0.0, 0.0) } else { Vec3::new(0.0, 0.0, 1.0) };
            tree.add_marker(vertebra, Marker::new(Vec3::new(0.0, y, 0.0), color, i as i32))?;
        }
    }
    tree.add_marker(spine, Marker::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), -1))?;
    Ok(spine)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next().filter(|p| p != "-") {
        Some(path) => serde_json::from_str::<SimConfig>(&std::fs::read_to_string(&path)?)?,
        None => SimConfig {
            step_secs:               STEP_SECS,
            total_steps:             (SIM_SECS / STEP_SECS).round() as u64,
            snapshot_interval_steps: (1.0 / (STEP_SECS * SNAPSHOT_HZ as f64)).round() as u64,
        },
    };
    println!("=== spine — rust_tg tensegrity model tree ===");
    println!(
        "dt = {} s  |  steps = {}  |  snapshot every {} steps",
        config.step_secs, config.total_steps, config.snapshot_interval_steps
    );

    // 1. Assemble the model.
    let trajectory = match args.next() {
        Some(path) => {
            let file = std::fs::File::open(&path).with_context(|| format!("opening {path}"))?;
            load_trajectory(file)?
        }
        None => load_trajectory(BUNDLED_TRAJECTORY.as_bytes())?,
    };
    info!("trajectory: {} columns, {} rows", trajectory.len(), trajectory[0].len());
    let mut tree = ModelTree::new();
    let spine = build_spine(&mut tree, &trajectory)?;
    debug!("\n{}", tree.describe(spine, "")?);

    let hinges = tree.find(spine, &Tags::from("rod hinge"))?;
    let senseables = tree.senseable_descendants(spine)?.len();
    println!(
        "Model: {} nodes, {} hinged rods, {} senseables at the root",
        tree.len(),
        hinges.len(),
        senseables
    );

    // 2. Build and run.
    let total_steps = config.total_steps;
    let mut sim = SimBuilder::new(config, tree, spine, SpineWorld::default()).build()?;
    let mut obs = RenderObserver::new(AngleProbe::default());

    let t0 = Instant::now();
    sim.run_steps(total_steps, &mut obs)?;
    info!("stepped {} in {:.3} s wall", sim.clock, t0.elapsed().as_secs_f64());

    // 3. Summary (before teardown frees the vertebrae).
    println!("Hinges registered: {}", sim.world.hinges.join(", "));
    println!(
        "Frames rendered:   {} ({} angle samples)",
        obs.frames,
        obs.visitor.samples.len()
    );
    println!();
    println!("{:<10} {:>12} {:>12}", "Vertebra", "Angle (rad)", "Target");
    println!("{}", "-".repeat(36));
    for &h in &hinges {
        if let Some(v) = sim.tree.behavior::<Vertebra>(h)? {
            println!("{:<10} {:>12.4} {:>12.4}", v.name, v.angle, v.setpoint());
        }
    }

    sim.teardown(&mut obs)?;
    println!();
    println!("Torn down: {} node(s) left", sim.tree.len());
    Ok(())
}
