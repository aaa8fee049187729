//! Alien orchestration for the alien invasion simulation.
//!
//! This crate owns the aliens and everything that happens to them: random
//! placement, the per-alien move protocol, collision detection, and the
//! bookkeeping that keeps the city -> occupants index in step with the live
//! alien set while cities are destroyed underneath it.
//!
//! # Modules
//!
//! - [`alien`] -- Alien identity, location, and lifecycle status.
//! - [`config`] -- Configuration loading from `invasion-config.yaml`.
//! - [`error`] -- [`OrchestratorError`] for construction and stale moves.
//! - [`event`] -- [`InvasionEvent`] and the [`EventSink`] trait, with
//!   the provided sinks.
//! - [`orchestrator`] -- The [`Orchestrator`]: move, step, and run rounds.
//! - [`runner`] -- Config-driven batch run with end-of-run logging.
//!
//! [`OrchestratorError`]: error::OrchestratorError
//! [`InvasionEvent`]: event::InvasionEvent
//! [`EventSink`]: event::EventSink
//! [`Orchestrator`]: orchestrator::Orchestrator

pub mod alien;
pub mod config;
pub mod error;
pub mod event;
mod occupancy;
pub mod orchestrator;
pub mod runner;

pub use alien::{Alien, AlienId, AlienStatus};
pub use error::OrchestratorError;
pub use event::{EventSink, InvasionEvent, JsonLinesSink, NullSink, RecordingSink, TracingSink};
pub use orchestrator::{EndReason, MoveOutcome, Orchestrator, OrchestratorBuilder, RunSummary};
