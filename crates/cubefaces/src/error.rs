//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while generating cube faces
#[derive(Error, Debug)]
pub enum CubefaceError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("Invalid config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },

    #[error("{tool} not found (needed for face {face}). Install it or set its path in the config file.")]
    ToolMissing { tool: String, face: &'static str },

    #[error("{tool} failed on face {face} ({}){}", exit_label(.code), stderr_suffix(.stderr))]
    ToolFailed {
        tool: String,
        face: &'static str,
        code: Option<i32>,
        stderr: String,
    },

    #[error("could not start {tool} for face {face}: {reason}")]
    Spawn {
        tool: String,
        face: &'static str,
        reason: String,
    },

    #[error("{tool} timed out on face {face} after {secs}s")]
    TimedOut {
        tool: String,
        face: &'static str,
        secs: u64,
    },

    #[error("{tool} exited successfully on face {face} but {} was not produced", .path.display())]
    OutputMissing {
        tool: String,
        face: &'static str,
        path: PathBuf,
    },

    #[error("{} of 6 faces failed: {}", .failed.len(), .failed.join(", "))]
    PartialOutput { failed: Vec<&'static str> },
}

impl CubefaceError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArguments(_) | Self::Config { .. } => 2,
            Self::ToolMissing { .. } => 127,
            _ => 1,
        }
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit status {}", code),
        None => "killed by signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_tool_and_face() {
        let err = CubefaceError::ToolMissing {
            tool: "gdalwarp".to_string(),
            face: "px",
        };
        let msg = err.to_string();
        assert!(msg.starts_with("gdalwarp not found"));
        assert!(msg.contains("face px"));

        let err = CubefaceError::ToolFailed {
            tool: "magick".to_string(),
            face: "ny",
            code: Some(1),
            stderr: "unable to open image".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "magick failed on face ny (exit status 1): unable to open image"
        );
    }

    #[test]
    fn test_partial_output_summary() {
        let err = CubefaceError::PartialOutput {
            failed: vec!["px", "nz"],
        };
        assert_eq!(err.to_string(), "2 of 6 faces failed: px, nz");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(CubefaceError::InvalidArguments("size".into()).exit_code(), 2);
        assert_eq!(
            CubefaceError::ToolMissing {
                tool: "magick".into(),
                face: "px"
            }
            .exit_code(),
            127
        );
        assert_eq!(CubefaceError::PartialOutput { failed: vec!["px"] }.exit_code(), 1);
    }
}
