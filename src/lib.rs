//! Bangus farming cycle economics
//!
//! `model::compute` turns a `CycleParameters` record into a `CycleResult`;
//! the remaining modules are the plumbing around it: share links, advice,
//! console reports, configuration and the interactive session.

pub mod advisor;
pub mod config;
pub mod model;
pub mod report;
pub mod session;
pub mod share;
