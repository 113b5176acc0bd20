//! Shared plumbing for the workspace binaries.

pub mod utils;
