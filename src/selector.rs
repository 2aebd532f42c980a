//! Selector bridge: hand the rendered bookmark list to an interactive filter
//! and capture what the user picked.
//!
//! The default selector is an external command (`peco`, `fzf`, ...) run
//! through `sh -c`. The rendered list is written to its stdin, its stdout is
//! captured, and its stderr stays attached to the terminal so the filter's
//! own diagnostics remain visible.

use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::Result;

use crate::error::BookmarkerError;

/// Something that lets the user pick lines out of a rendered bookmark list.
pub trait Selector {
    /// Present `input` and return the chosen line(s), trimmed.
    ///
    /// Must fail with [`BookmarkerError::NoSelection`] when nothing was chosen.
    fn select(&self, input: &str) -> Result<String>;
}

/// An external filter command run through the shell.
#[derive(Debug, Clone)]
pub struct FilterCommand {
    template: String,
}

impl FilterCommand {
    /// Create a filter from a shell command template such as `"fzf --height $FZF_HEIGHT"`.
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    /// The command line after environment expansion.
    pub fn command_line(&self) -> String {
        expand_env(&self.template, |name| std::env::var(name).ok())
    }
}

impl Selector for FilterCommand {
    fn select(&self, input: &str) -> Result<String> {
        let command = self.command_line();
        log::debug!("running filter: sh -c '{}'", command);

        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| BookmarkerError::FilterExecution(format!("{}: {}", command, e)))?;

        // Filters may emit output before consuming all input; stdin gets its own thread.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = input.to_string();
            std::thread::spawn(move || match stdin.write_all(input.as_bytes()) {
                // A filter may exit without reading everything.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
                other => other,
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|e| BookmarkerError::FilterExecution(format!("{}: {}", command, e)))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => return Err(BookmarkerError::FilterExecution(e.to_string()).into()),
                Err(_) => {
                    return Err(BookmarkerError::FilterExecution(
                        "stdin writer panicked".to_string(),
                    )
                    .into())
                }
            }
        }

        if !output.status.success() {
            return Err(BookmarkerError::FilterExecution(format!(
                "'{}' exited with {}",
                command, output.status
            ))
            .into());
        }

        let selected = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if selected.is_empty() {
            return Err(BookmarkerError::NoSelection.into());
        }
        Ok(selected)
    }
}

/// Expand `$NAME` and `${NAME}` references using `lookup`.
///
/// Unknown variables expand to the empty string. A `$` not followed by a
/// name is kept literally.
pub fn expand_env<F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let bytes = template.as_bytes();
    let is_name = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    let mut out = String::with_capacity(template.len());
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }

        let (name, next) = match bytes.get(i + 1) {
            Some(b'{') => match template[i + 2..].find('}') {
                Some(len) => (&template[i + 2..i + 2 + len], i + 3 + len),
                None => break,
            },
            Some(&b) if is_name(b) => {
                let mut end = i + 1;
                while end < bytes.len() && is_name(bytes[end]) {
                    end += 1;
                }
                (&template[i + 1..end], end)
            }
            _ => {
                i += 1;
                continue;
            }
        };

        out.push_str(&template[literal_start..i]);
        out.push_str(&lookup(name).unwrap_or_default());
        literal_start = next;
        i = next;
    }

    out.push_str(&template[literal_start..]);
    out
}
