pub mod integrator;
pub mod runner;
pub mod event;

pub use runner::{simulate, simulate_with, Sample, SimConfig, MAX_STEPS};
pub use integrator::rk4_step;
