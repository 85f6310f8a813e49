//! Parallel Barnes-Hut simulation of gravitating bodies in two dimensions.
//!
//! Each step builds a quadtree over the bodies, approximates the force on every
//! body from the tree, and integrates positions and velocities. Steps run on a
//! fixed pool of worker threads that synchronise on barriers, so results do not
//! depend on the number of workers.
//!
//! ```
//! use rs_barnes_hut::simulation::{new_simulation, run};
//!
//! let state = new_simulation(64, 59.742, 0.05, 42).unwrap();
//! let state = run(state, 20, 4, 0.5, 0.1).unwrap();
//! assert_eq!(state.steps_completed, 20);
//! ```
pub mod utils;
pub mod particles;
pub mod simulation;
