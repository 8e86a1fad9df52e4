//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Vector types and in-place vector operations
//! - Homogeneous 4x4 matrix operations
//! - Logging utilities

pub mod math;
pub mod matrix;
pub mod logging;
