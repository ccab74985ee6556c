//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Math types and axis-aligned boxes
//! - Logging utilities

pub mod logging;
pub mod math;
