pub mod simulation;

pub use simulation::{run_simulation, SIMULATION_SESSION};
