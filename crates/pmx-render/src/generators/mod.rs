//! Document generators, one module per documentation section

pub mod cluster;
pub mod container;
pub mod network;
pub mod node;
pub mod reference;
pub mod storage;
pub mod vm;
