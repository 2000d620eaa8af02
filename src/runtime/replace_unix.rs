// SPDX-License-Identifier: MIT

//! Mask and exec calls for unix hosts.

use std::{convert::Infallible, ffi::CString, os::unix::ffi::OsStrExt as _};

use nix::sys::stat::{Mode, umask};

use crate::runtime::{
    error::LaunchError,
    target::{ResolvedPath, TargetName},
};

/// Set the file-creation mask to zero.  Returns the mask that was replaced.
/// The mask survives the exec, so the target inherits it.
pub(crate) fn clear_file_mask() -> Mode {
    umask(Mode::empty())
}

/// Run the executable in place of this process.
pub(crate) fn exec(path: &ResolvedPath, argv0: &TargetName) -> Result<Infallible, LaunchError> {
    // Both conversions happen before the exec, so an interior NUL is reported
    // as a failure instead of silently cutting the string.
    let exec_path = CString::new(path.as_path().as_os_str().as_bytes())?;
    let args = [CString::new(argv0.as_os_str().as_bytes())?];
    nix::unistd::execv(&exec_path, &args).map_err(LaunchError::from)
}

/// Tests that touch the process-wide mask hold this while they run.
#[cfg(test)]
pub(crate) static FILE_MASK_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Read the mask.  The only way is to set it, so it is put straight back.
#[cfg(test)]
pub(crate) fn current_file_mask() -> Mode {
    let mask = umask(Mode::empty());
    umask(mask);
    mask
}
