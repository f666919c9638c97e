//! Methods served by the bundled binary
//!
//! Provides the greeting methods registered at startup.

pub mod greeting;
