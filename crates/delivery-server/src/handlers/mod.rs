//! HTTP handlers.

pub mod delivery;
pub mod health;
pub mod invalidate;
pub mod metrics;
