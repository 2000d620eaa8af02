// SPDX-License-Identifier: MIT

//! Common error type.
//!

use std::{ffi::NulError, fmt::Display};

/// Exit status used when no target name was given.
pub const EXIT_MISSING_ARGUMENT: u8 = 2;

/// Exit status used when the target path does not fit the reserved capacity.
pub const EXIT_PATH_OVERFLOW: u8 = 1;

/// Exit status used when the OS refuses to replace the process image.
/// This is `-1` as seen by the parent after the byte truncation of the exit code.
pub const EXIT_EXEC_FAILURE: u8 = 255;

#[derive(Debug)]
pub enum LaunchError {
    /// The caller did not supply a target name.
    MissingArgument,
    /// Prefix + target name would need `required` bytes, but only `capacity` are reserved.
    PathConstructionOverflow { required: usize, capacity: usize },
    /// The process image could not be replaced.
    ExecFailure(std::io::Error),
}

impl LaunchError {
    /// The status the launcher exits with when it reaches the failed state.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingArgument => EXIT_MISSING_ARGUMENT,
            Self::PathConstructionOverflow { .. } => EXIT_PATH_OVERFLOW,
            Self::ExecFailure(_) => EXIT_EXEC_FAILURE,
        }
    }
}

impl Display for LaunchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingArgument => f.write_str("missing target name argument"),
            Self::PathConstructionOverflow { required, capacity } => write!(
                f,
                "target path needs {required} bytes, but only {capacity} are reserved",
            ),
            Self::ExecFailure(e) => write!(f, "could not execute target: {e}"),
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ExecFailure(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LaunchError {
    fn from(e: std::io::Error) -> Self {
        LaunchError::ExecFailure(e)
    }
}

#[cfg(unix)]
impl From<nix::errno::Errno> for LaunchError {
    fn from(e: nix::errno::Errno) -> Self {
        LaunchError::ExecFailure(e.into())
    }
}

impl From<NulError> for LaunchError {
    fn from(e: NulError) -> Self {
        LaunchError::ExecFailure(std::io::Error::new(std::io::ErrorKind::InvalidFilename, e))
    }
}

impl Into<std::io::Error> for LaunchError {
    fn into(self) -> std::io::Error {
        match self {
            Self::MissingArgument => {
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "missing target name")
            }
            Self::PathConstructionOverflow { required, capacity } => std::io::Error::new(
                std::io::ErrorKind::InvalidFilename,
                format!("path of {required} bytes exceeds capacity {capacity}"),
            ),
            Self::ExecFailure(e) => e,
        }
    }
}
