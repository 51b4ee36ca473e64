//! # warehouse-replay - Step-by-step replay of warehouse logistics plans
//!
//! Takes the initial configuration of a grid warehouse (ASP `init/2` facts)
//! and a plan computed by clingo (`occurs/3` atoms in clingo's JSON output),
//! and replays the plan one timestep at a time, producing an immutable
//! snapshot of the warehouse after every step.
//!
//! ## Core Concepts
//!
//! - **Fact Store** ([`facts`]): builds the timestep-0 [`WarehouseState`]
//! - **Plan Store** ([`plan`]): per-timestep robot actions
//! - **Engine** ([`engine`]): applies one timestep of actions to a snapshot
//! - **Replay** ([`replay`]): iterates frames `0..=max_time`
//! - **Renderer** ([`render`]): draws a frame as a text grid
//!
//! Bad fact lines, unknown atoms and illegal actions never abort a run. They
//! are returned as [`Diagnostic`]s next to the result. Only missing or
//! undecipherable inputs and invalid configuration are errors.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warehouse_replay::{load_facts, load_plan, Replay, WitnessSelector};
//!
//! let facts = load_facts("instance.lp")?;
//! let loaded = load_plan("plan.json", WitnessSelector::First)?;
//!
//! for frame in Replay::new(facts.state, &loaded.plan) {
//!     println!("t={} digest={}", frame.time, frame.digest.short());
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod facts;
pub mod plan;
pub mod render;
pub mod replay;
pub mod warehouse;

// Re-export primary types at crate root for convenience
pub use config::ReplayConfig;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use engine::{apply, Step};
pub use error::{InputError, ReplayError, ReplayResult, ValidationError};
pub use facts::{load_facts, parse_facts, InitialFacts};
pub use plan::{load_plan, parse_plan, Action, LoadedPlan, Plan, PlannedAction, WitnessSelector};
pub use render::{GridSymbols, Renderer};
pub use replay::{Frame, Replay, ReplayOutcome, TimedDiagnostic};
pub use warehouse::{
    Coord, GridBounds, Layout, OrderId, ProductId, RobotId, ShelfId, StateDigest, StationId,
    WarehouseState,
};
