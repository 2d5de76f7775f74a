#![forbid(unsafe_code)]

//! Organization directory runtime.
//!
//! Hosts the directory kernel: configuration, seed data, logging
//! setup, a thread-safe shared handle and the dashboard report.
//!
//! No domain logic lives here. Validation, hierarchy rules and
//! statistics are delegated to the kernel.

pub mod config;
pub mod seed;
pub mod session;
pub mod telemetry;
pub mod report;
