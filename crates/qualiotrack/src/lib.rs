//! Compliance-evidence tracking core for Qualiopi-certified training
//! providers: indicator catalogue, regulatory-feed monitoring, proof capture
//! and generation, and conformity aggregation.

pub mod catalog;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
