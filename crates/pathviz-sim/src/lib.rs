//! Simulation controller for the pathfinding visualiser.
//!
//! [`Simulation`] owns the shared grid and one pathfinder per start cell,
//! applies front-end [`Command`](pathviz_core::Command)s, and enforces the
//! configured [`ResetPolicy`] against in-flight runs.

mod config;
mod controller;
pub mod layout;

pub use config::{ConfigError, ResetPolicy, SimConfig};
pub use controller::{Simulation, Status};
