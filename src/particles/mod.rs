mod body;
mod quad;
mod barnes_hut;
mod force_solver;

pub use body::*;
pub use quad::*;
pub use barnes_hut::*;
pub use force_solver::*;

#[cfg(test)]
mod body_tests;
