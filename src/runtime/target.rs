// SPDX-License-Identifier: MIT

//! Where launchable targets live, and how their paths are built.

use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
};

use crate::runtime::error::LaunchError;

/// Directory, relative to the working directory, holding the launchable targets.
/// Can be replaced at build time with the `RUN_EXAMPLE_PREFIX` variable.
pub const DEFAULT_PREFIX: &str = match option_env!("RUN_EXAMPLE_PREFIX") {
    Some(p) => p,
    None => "target/debug/examples/",
};

/// Bytes reserved for a resolved path, including its terminating NUL.
pub const PATH_CAPACITY: usize = 1024;

/// Describes where the targets are found.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Prepended verbatim to the target name.  Normally ends with a separator.
    pub prefix: OsString,
    /// Maximum size of the resolved path, counting the terminating NUL.
    pub capacity: usize,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        LaunchConfig {
            prefix: OsString::from(DEFAULT_PREFIX),
            capacity: PATH_CAPACITY,
        }
    }
}

impl LaunchConfig {
    /// Use a different target directory with the default capacity.
    pub fn with_prefix<P: Into<OsString>>(prefix: P) -> Self {
        LaunchConfig {
            prefix: prefix.into(),
            ..Default::default()
        }
    }

    /// The longest target name this configuration can resolve.
    pub fn max_name_len(&self) -> usize {
        self.capacity.saturating_sub(self.prefix.len() + 1)
    }

    /// Join the prefix and the name.
    ///
    /// The size is checked before anything is written, so an oversized name
    /// never produces a truncated path.
    pub fn resolve(&self, name: &TargetName) -> Result<ResolvedPath, LaunchError> {
        let required = self.prefix.len() + name.len() + 1;
        if required > self.capacity {
            return Err(LaunchError::PathConstructionOverflow {
                required,
                capacity: self.capacity,
            });
        }
        let mut path = OsString::with_capacity(required);
        path.push(&self.prefix);
        path.push(name.as_os_str());
        Ok(ResolvedPath {
            path: PathBuf::from(path),
        })
    }
}

/// The caller supplied name of the program to run.
/// Opaque: separators and `..` are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetName(OsString);

impl TargetName {
    /// Accept any non-empty name.
    pub fn new<S: Into<OsString>>(name: S) -> Result<Self, LaunchError> {
        let name = name.into();
        if name.is_empty() {
            return Err(LaunchError::MissingArgument);
        }
        Ok(TargetName(name))
    }

    /// Take the name from an optional command line slot.
    pub fn from_arg(arg: Option<OsString>) -> Result<Self, LaunchError> {
        match arg {
            Some(name) => Self::new(name),
            None => Err(LaunchError::MissingArgument),
        }
    }

    pub fn as_os_str(&self) -> &OsStr {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed name.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The prefix joined with a target name, known to fit the capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    path: PathBuf,
}

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Size in bytes, without the terminating NUL.
    #[cfg(test)]
    fn len(&self) -> usize {
        self.path.as_os_str().len()
    }
}
