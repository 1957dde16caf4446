//! End-to-end test support for cubememo
//!
//! - `harness`: isolated, temp-dir backed trainers
//! - `mocks`: deterministic cards, dictionaries and clocks

pub mod harness;
pub mod mocks;
