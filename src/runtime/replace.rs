// SPDX-License-Identifier: MIT

//! The process level operations the launcher needs from the OS.

use std::convert::Infallible;

use crate::runtime::{
    error::LaunchError,
    target::{ResolvedPath, TargetName},
};

/// Control over the running process image.
///
/// The launcher only talks to the OS through this trait, so tests can
/// observe an exec request without losing the test process.
pub trait ProcessImage {
    /// Clear the process-wide file-creation mask, so that new files and
    /// sockets get exactly the permission bits they ask for.
    fn clear_file_mask(&self);

    /// Replace the current process image with the program at `path`.
    /// `argv0` becomes the only argument; the environment is inherited.
    ///
    /// Only returns when the OS refused the request.
    fn replace_process(
        &self,
        path: &ResolvedPath,
        argv0: &TargetName,
    ) -> Result<Infallible, LaunchError>;
}

/// The host platform's own mask and exec calls.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeImage;

#[cfg(unix)]
impl ProcessImage for NativeImage {
    fn clear_file_mask(&self) {
        super::replace_unix::clear_file_mask();
    }

    fn replace_process(
        &self,
        path: &ResolvedPath,
        argv0: &TargetName,
    ) -> Result<Infallible, LaunchError> {
        super::replace_unix::exec(path, argv0)
    }
}

#[cfg(not(unix))]
impl ProcessImage for NativeImage {
    fn clear_file_mask(&self) {}

    fn replace_process(
        &self,
        _path: &ResolvedPath,
        _argv0: &TargetName,
    ) -> Result<Infallible, LaunchError> {
        Err(LaunchError::ExecFailure(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "process image replacement requires a unix platform",
        )))
    }
}
