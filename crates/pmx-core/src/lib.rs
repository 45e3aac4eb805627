//! Core domain models and shared types for pmxdocs
//!
//! This crate contains:
//! - Domain models (ClusterInfo, NodeInfo, VirtualMachine, Container, ...)
//! - The permissive `Record` type used for raw API payloads
//! - Error types and formatting helpers shared by all other crates

pub mod error;
pub mod format;
pub mod model;
pub mod record;

pub use error::{Error, Result};
pub use model::{ClusterInfo, Container, NetworkInterface, NodeInfo, StoragePool, VirtualMachine};
pub use record::Record;
