//! Infrastructure layer - Port implementations
//!
//! This module contains concrete implementations of the core's capability
//! ports using actual hardware and system resources.

pub mod drivers;
pub mod services;
pub mod tasks;
