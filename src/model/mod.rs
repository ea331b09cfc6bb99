//! Cycle Model
//!
//! Responsible for:
//! - The input parameter records and their defaults
//! - The closed-form profit calculation for one 4-month cycle

pub mod calculator;
pub mod params;

pub use calculator::{analyze, compute, CycleAnalysis, CycleResult, CYCLE_MONTHS};
pub use params::{CycleInputs, CycleParameters, Param, ParamAssignment, ParameterWarning};
