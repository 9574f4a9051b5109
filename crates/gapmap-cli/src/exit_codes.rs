//! Unified exit codes for the gapmap CLI.
//! These codes are part of the public contract.

pub const SUCCESS: i32 = 0;
pub const RUNTIME_ERROR: i32 = 1; // Scan or scoring failed mid-flight
pub const INPUT_ERROR: i32 = 2; // Missing file, short sequence, or bad config
