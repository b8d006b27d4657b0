//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Planar math types and operations
//! - Scratch and owned memory pools
//! - Logging utilities

pub mod math;
pub mod memory;
pub mod logging;
