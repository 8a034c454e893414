//! # Royalty Math
//!
//! Numerical building blocks for the royalty earnings analytics engine.
//!
//! This crate provides:
//!
//! - **Regression**: Ordinary least squares line fitting
//! - **Statistics**: Mean, population standard deviation, clipping
//! - **Solvers**: Root-finding algorithms (Newton-Raphson, Bisection, Hybrid)
//!
//! Everything here works on plain `f64` slices and closures. Nothing in this
//! crate allocates global state or performs I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::doc_markdown)]

pub mod error;
pub mod regression;
pub mod solvers;
pub mod statistics;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::regression::{fit_linear, LinearFit};
    pub use crate::solvers::{
        bisection, hybrid, hybrid_numerical, newton_raphson, newton_raphson_numerical,
        SolverConfig, SolverResult,
    };
    pub use crate::statistics::{clip, mean, population_std_dev};
}

pub use error::{MathError, MathResult};
