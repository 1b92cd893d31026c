//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the physics core:
//! - 2D math types and helpers
//! - Arena handles and callback registries
//! - Time management for the outer loop
//! - Logging utilities

pub mod collections;
pub mod logging;
pub mod math;
pub mod time;
