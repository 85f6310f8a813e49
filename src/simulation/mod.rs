mod phase_barrier;
mod partition;
mod scenario;
mod step_driver;

pub use phase_barrier::*;
pub use partition::*;
pub use scenario::*;
pub use step_driver::*;

#[cfg(test)]
mod phase_barrier_tests;
#[cfg(test)]
mod partition_tests;
#[cfg(test)]
mod scenario_tests;
