//! Utilities shared by the roomcast binaries and their tests.

pub mod logger;
pub mod time;
