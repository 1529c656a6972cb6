//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the crate:
//! - Handle collections for pooled resources
//! - Logging utilities

pub mod collections;
pub mod logging;
