//! cubefaces core - shared plumbing for the cubefaces tool
//!
//! Standard paths and structured invocation of external programs.

pub mod paths;
pub mod process;

pub use paths::Paths;
pub use process::{Invocation, ProcessError, ToolOutput};
