//! Route probe backed by an external command.

use tokio::process::Command;

use super::{ProbeError, RouteProbe};

/// Runs a command (by default `ip route show`) and uses its standard output
/// as the route table dump.
///
/// The child is killed if the probe future is dropped before it exits, so
/// shutting the watcher down never waits on a hung command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
}

impl Default for CommandProbe {
    fn default() -> Self {
        Self::new("ip", ["route", "show"])
    }
}

impl CommandProbe {
    /// Creates a probe running `program` with `args`.
    #[must_use]
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the command line as a single string.
    #[must_use]
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl RouteProbe for CommandProbe {
    async fn dump(&self) -> Result<Vec<u8>, ProbeError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ProbeError::Spawn {
                command: self.command_line(),
                source,
            })?;

        if !output.status.success() {
            return Err(ProbeError::CommandFailed {
                command: self.command_line(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(output.stdout)
    }
}
