//! `tg-sim` — fixed-timestep runner for rust_tg model trees.
//!
//! # Run loop
//!
//! ```text
//! setup(root, &mut world)                  → on_setup
//! for step in 0..config.total_steps:
//!   on_step_start
//!   step(root, config.step_secs)           every node once, pre-order
//!   on_step_end
//!   on_snapshot every snapshot_interval_steps (renderers visit here)
//! teardown(root)                           → on_teardown
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tg_core::SimConfig;
//! use tg_model::ModelTree;
//! use tg_sim::{NoopObserver, SimBuilder};
//!
//! let mut tree = ModelTree::new();
//! let robot = tree.create("robot");
//! let mut sim = SimBuilder::new(SimConfig::default(), tree, robot, ()).build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, RenderObserver, SimObserver};
pub use sim::{Phase, Simulation};
