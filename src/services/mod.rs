//! # Services Module
//!
//! Asset normalization rules and the batch registration coordinator.

pub mod activos;
pub mod batch;
