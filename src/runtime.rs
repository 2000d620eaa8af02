// SPDX-License-Identifier: MIT

//! Turns the current process into the requested target program.
//!
//! The `Launcher` walks through a fixed sequence: clear the file-creation
//! mask, resolve `<prefix><name>`, then replace the process image.  A
//! successful launch never comes back; every other outcome is a
//! `LaunchError` whose `exit_code` becomes this process's status.

pub mod error;
pub mod replace;
pub mod target;

#[cfg(unix)]
mod replace_unix;

use std::{convert::Infallible, ffi::OsString};

pub use replace::{NativeImage, ProcessImage};
pub use target::{LaunchConfig, ResolvedPath, TargetName};

use error::LaunchError;

/// Progress of a launch.  `Launched` is never observed from the inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Init,
    PermissionsConfigured,
    PathResolved,
    Failed,
}

/// Launches targets from one directory.
pub struct Launcher<I: ProcessImage = NativeImage> {
    config: LaunchConfig,
    image: I,
    state: LaunchState,
}

impl Launcher<NativeImage> {
    /// Launch through the host OS.
    pub fn new(config: LaunchConfig) -> Self {
        Self::with_image(config, NativeImage)
    }
}

impl Default for Launcher<NativeImage> {
    fn default() -> Self {
        Self::new(LaunchConfig::default())
    }
}

impl<I: ProcessImage> Launcher<I> {
    pub fn with_image(config: LaunchConfig, image: I) -> Self {
        Launcher {
            config,
            image,
            state: LaunchState::Init,
        }
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    /// Clear the file-creation mask.  The cleared mask is inherited by the
    /// target, which must be able to create files and sockets with exactly
    /// the modes it asks for.
    pub fn configure_permissions(&mut self) {
        self.image.clear_file_mask();
        self.state = LaunchState::PermissionsConfigured;
        tracing::debug!("file creation mask cleared");
    }

    /// Build the path of the target.  Fails instead of truncating.
    pub fn resolve_path(&mut self, name: &TargetName) -> Result<ResolvedPath, LaunchError> {
        match self.config.resolve(name) {
            Ok(path) => {
                self.state = LaunchState::PathResolved;
                tracing::debug!(path = %path.as_path().display(), "target path resolved");
                Ok(path)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Become the target.  Returns only on failure.
    pub fn launch(
        &mut self,
        path: &ResolvedPath,
        name: &TargetName,
    ) -> Result<Infallible, LaunchError> {
        tracing::debug!(
            path = %path.as_path().display(),
            argv0 = ?name.as_os_str(),
            "replacing process image",
        );
        self.image
            .replace_process(path, name)
            .map_err(|e| self.fail(e))
    }

    /// Run the whole sequence for the optional command line argument.
    ///
    /// The argument is checked first, so a missing name leaves the process
    /// mask alone.
    pub fn run(&mut self, arg: Option<OsString>) -> Result<Infallible, LaunchError> {
        let name = TargetName::from_arg(arg).map_err(|e| self.fail(e))?;
        self.configure_permissions();
        let path = self.resolve_path(&name)?;
        self.launch(&path, &name)
    }

    fn fail(&mut self, e: LaunchError) -> LaunchError {
        self.state = LaunchState::Failed;
        tracing::debug!(error = %e, "launch failed");
        e
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, path::PathBuf};

    use super::*;

    /// Records what the launcher asked of the OS.
    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
        exec: RefCell<Option<(PathBuf, OsString)>>,
    }

    impl ProcessImage for &Recorder {
        fn clear_file_mask(&self) {
            self.calls.borrow_mut().push("mask".to_string());
        }

        fn replace_process(
            &self,
            path: &ResolvedPath,
            argv0: &TargetName,
        ) -> Result<Infallible, LaunchError> {
            self.calls.borrow_mut().push("exec".to_string());
            *self.exec.borrow_mut() =
                Some((path.as_path().to_path_buf(), argv0.as_os_str().to_owned()));
            Err(LaunchError::ExecFailure(std::io::Error::from(
                std::io::ErrorKind::NotFound,
            )))
        }
    }

    fn examples() -> LaunchConfig {
        LaunchConfig::with_prefix("target/debug/examples/")
    }

    #[test]
    fn sequence_is_mask_then_exec() {
        let rec = Recorder::default();
        let mut launcher = Launcher::with_image(examples(), &rec);
        assert_eq!(launcher.state(), LaunchState::Init);

        let res = launcher.run(Some(OsString::from("hello")));
        assert!(matches!(res, Err(LaunchError::ExecFailure(_))));
        assert_eq!(launcher.state(), LaunchState::Failed);
        assert_eq!(*rec.calls.borrow(), vec!["mask", "exec"]);

        let (path, argv0) = rec.exec.borrow_mut().take().unwrap();
        assert_eq!(path, PathBuf::from("target/debug/examples/hello"));
        assert_eq!(argv0, OsString::from("hello"));
    }

    #[test]
    fn missing_argument_does_nothing() {
        let rec = Recorder::default();
        let mut launcher = Launcher::with_image(examples(), &rec);
        let res = launcher.run(None);
        assert!(matches!(res, Err(LaunchError::MissingArgument)));
        assert_eq!(launcher.state(), LaunchState::Failed);
        assert!(rec.calls.borrow().is_empty());

        let res = launcher.run(Some(OsString::new()));
        assert!(matches!(res, Err(LaunchError::MissingArgument)));
        assert!(rec.calls.borrow().is_empty());
    }

    #[test]
    fn overflow_stops_before_exec() {
        let rec = Recorder::default();
        let mut launcher = Launcher::with_image(examples(), &rec);
        let name = "n".repeat(launcher.config().max_name_len() + 1);
        let res = launcher.run(Some(OsString::from(name)));
        assert!(matches!(
            res,
            Err(LaunchError::PathConstructionOverflow { .. })
        ));
        assert_eq!(launcher.state(), LaunchState::Failed);
        assert_eq!(*rec.calls.borrow(), vec!["mask"]);
        assert!(rec.exec.borrow().is_none());
    }

    #[test]
    fn step_by_step_states() {
        let rec = Recorder::default();
        let mut launcher = Launcher::with_image(examples(), &rec);
        let name = TargetName::new("countdown").unwrap();

        launcher.configure_permissions();
        assert_eq!(launcher.state(), LaunchState::PermissionsConfigured);

        let path = launcher.resolve_path(&name).unwrap();
        assert_eq!(launcher.state(), LaunchState::PathResolved);

        let err = launcher.launch(&path, &name).unwrap_err();
        assert_eq!(err.exit_code(), error::EXIT_EXEC_FAILURE);
        assert_eq!(launcher.state(), LaunchState::Failed);
    }

    /// With the real mask call, the mask is already zero by the time the
    /// exec is requested.
    #[cfg(unix)]
    #[test]
    fn native_mask_is_clear_at_exec() {
        struct MaskProbe(RefCell<Option<nix::sys::stat::Mode>>);

        impl ProcessImage for &MaskProbe {
            fn clear_file_mask(&self) {
                NativeImage.clear_file_mask();
            }

            fn replace_process(
                &self,
                _path: &ResolvedPath,
                _argv0: &TargetName,
            ) -> Result<Infallible, LaunchError> {
                *self.0.borrow_mut() = Some(replace_unix::current_file_mask());
                Err(LaunchError::ExecFailure(std::io::Error::from(
                    std::io::ErrorKind::NotFound,
                )))
            }
        }

        let _guard = replace_unix::FILE_MASK_LOCK
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let previous =
            nix::sys::stat::umask(nix::sys::stat::Mode::from_bits_truncate(0o027));

        let probe = MaskProbe(RefCell::new(None));
        let mut launcher = Launcher::with_image(examples(), &probe);
        let _ = launcher.run(Some(OsString::from("hello")));
        assert_eq!(*probe.0.borrow(), Some(nix::sys::stat::Mode::empty()));

        nix::sys::stat::umask(previous);
    }

    #[cfg(unix)]
    #[test]
    fn native_launch_of_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        let mut prefix = dir.path().as_os_str().to_owned();
        prefix.push("/");
        // Only exec, no mask change; this test does not hold the mask lock.
        let mut launcher = Launcher::new(LaunchConfig::with_prefix(prefix));
        let name = TargetName::new("not-built").unwrap();
        let path = launcher.resolve_path(&name).unwrap();
        match launcher.launch(&path, &name) {
            Err(LaunchError::ExecFailure(e)) => {
                assert_eq!(e.kind(), std::io::ErrorKind::NotFound)
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
