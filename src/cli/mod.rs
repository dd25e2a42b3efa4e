//! Workflows behind the command-line surface

pub mod export;
pub mod orchestration;
pub mod status;
