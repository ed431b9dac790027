//! External command execution.
//!
//! Shared by the loudness measurement and encode passes. Commands block
//! until the tool exits; a nonzero exit surfaces the tool name, exit code,
//! and captured stderr.

use std::process::{Command, Output};

/// Error types for external command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The tool could not be started at all.
    #[error("Failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool ran but exited with a failure status.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    Failed {
        tool: String,
        exit_code: i32,
        message: String,
    },
}

/// Type alias for command execution results.
pub type CommandResult<T> = Result<T, CommandError>;

/// Run a tool with the given arguments, capturing its output.
pub fn run(tool: &str, args: &[String]) -> CommandResult<Output> {
    tracing::debug!("Running: {}", render(tool, args));

    let output = Command::new(tool)
        .args(args)
        .output()
        .map_err(|e| CommandError::Spawn {
            tool: tool.to_string(),
            source: e,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(CommandError::Failed {
            tool: tool.to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            message: stderr.trim().to_string(),
        });
    }

    Ok(output)
}

/// Render a command line for echoing in simulate mode.
pub fn render(tool: &str, args: &[String]) -> String {
    let mut line = String::from(tool);
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
