//! Browser launching.
//!
//! [`Launcher`] is the seam between the action dispatcher and the OS.
//! [`ProcessLauncher`] spawns the configured browser directly (no shell),
//! either detached or waiting for it to exit, depending on
//! `wait_for_browser` in the config.

use std::process::{Command, Stdio};

use anyhow::Result;

use crate::error::BookmarkerError;

/// Result of a launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchResult {
    /// The process was started and left running.
    Spawned { pid: u32 },
    /// The process was started and ran to successful completion.
    Exited,
}

/// Starts external programs.
pub trait Launcher {
    fn launch(&self, command: &str, args: &[&str]) -> Result<LaunchResult>;
}

/// Launches real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher {
    /// Block until the launched process exits.
    pub wait: bool,
}

impl ProcessLauncher {
    pub fn new(wait: bool) -> Self {
        Self { wait }
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, command: &str, args: &[&str]) -> Result<LaunchResult> {
        let mut cmd = Command::new(command);
        cmd.args(args);

        if self.wait {
            let status = cmd
                .status()
                .map_err(|e| BookmarkerError::Launch(format!("{}: {}", command, e)))?;
            if !status.success() {
                return Err(BookmarkerError::Launch(format!(
                    "'{}' exited with {}",
                    command, status
                ))
                .into());
            }
            return Ok(LaunchResult::Exited);
        }

        // Detached: the browser must not hold on to our terminal streams.
        let child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| BookmarkerError::Launch(format!("{}: {}", command, e)))?;
        Ok(LaunchResult::Spawned { pid: child.id() })
    }
}
