//! # run-example
//!
//! Replaces the current process with a built example program, after
//! clearing the file-creation mask so the example's sockets and files get
//! exactly the modes it requests.

pub mod runtime;

pub use runtime::{
    LaunchConfig, LaunchState, Launcher, NativeImage, ProcessImage, ResolvedPath, TargetName,
    error::LaunchError,
};
