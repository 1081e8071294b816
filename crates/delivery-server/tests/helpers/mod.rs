//! Test helpers para delivery-server.

#![allow(dead_code, unused_imports)]

pub mod assertions;
pub mod client;
pub mod doubles;
pub mod fixtures;

pub use assertions::*;
pub use client::{TestClient, TestResponse};
pub use doubles::{CountingStore, FaultyCache};
pub use fixtures::{TestApp, fixture_store};
