//! Proxmox VE API client
//!
//! [`PveApi`] is the seam the generators consume: one required raw `get`
//! plus typed helpers for every endpoint the documentation covers. Tests
//! implement the trait over fixtures; [`PveClient`] is the reqwest-backed
//! implementation used by the binary.

pub mod api;
pub mod client;

pub use api::PveApi;
pub use client::PveClient;
