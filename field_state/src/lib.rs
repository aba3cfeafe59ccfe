//! # Field State
//!
//! The situational record for an advisory session - which crop was scanned,
//! what condition was detected, and its health status. This crate is the
//! single source of truth for that record and the contract by which the
//! upstream scan workflow hands it over. It does not contain any learning or
//! prompt logic.

pub mod handoff;
pub mod session;

pub use handoff::*;
pub use session::*;
