//! Autofill and compliance core for automated job applications.
//!
//! `workflows::autofill` classifies form controls and validates candidate values;
//! `workflows::sla` enforces application quotas and interview guarantee periods.

pub mod clock;
pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
