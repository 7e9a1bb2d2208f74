//! Transcript sources
//!
//! The orchestrator only needs the text a test run produced. Production runs
//! get it from a pyresttest subprocess; tests plug in canned transcripts.

use async_trait::async_trait;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command as TokioCommand;

use crate::common::config::RunnerConfig;
use crate::common::{Error, Result};

/// Produces the raw transcript for one test definition file
#[async_trait]
pub trait TranscriptSource {
    async fn capture(&self, test_file: &Path) -> Result<String>;
}

/// Runs pyresttest and records stdout and stderr as one transcript
#[derive(Debug, Clone)]
pub struct PyRestTest {
    config: RunnerConfig,
}

impl PyRestTest {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    /// Arguments after the program name
    pub fn args(&self, test_file: &Path) -> Vec<String> {
        vec![
            self.config.base_url.clone(),
            test_file.display().to_string(),
            "--import_extensions".to_string(),
            self.config.extensions.clone(),
            "--verbose".to_string(),
            "--log".to_string(),
            self.config.log_level.clone(),
        ]
    }

    fn resolve_program(&self) -> Result<PathBuf> {
        which::which(&self.config.program).map_err(|_| {
            let searched: Vec<String> = std::env::var_os("PATH")
                .map(|path| {
                    std::env::split_paths(&path)
                        .map(|p| p.display().to_string())
                        .collect()
                })
                .unwrap_or_default();
            Error::runner_not_found(&self.config.program.display().to_string(), &searched)
        })
    }
}

#[async_trait]
impl TranscriptSource for PyRestTest {
    async fn capture(&self, test_file: &Path) -> Result<String> {
        let program = self.resolve_program()?;
        let args = self.args(test_file);
        tracing::debug!(program = %program.display(), ?args, "spawning test runner");

        // curl traces land on stderr and the extension's dump on stdout. Both
        // share one pipe so the transcript keeps the order they were written.
        let (mut reader, writer) = io::pipe()?;
        // The parent's write ends close with `command`, so the read below sees
        // EOF once the runner exits.
        let mut child = {
            let mut command = TokioCommand::new(&program);
            command
                .args(&args)
                .stdin(Stdio::null())
                .stdout(Stdio::from(writer.try_clone()?))
                .stderr(Stdio::from(writer))
                .kill_on_drop(true);
            command.spawn().map_err(Error::RunnerSpawn)?
        };

        let bytes = tokio::task::spawn_blocking(move || -> io::Result<Vec<u8>> {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            Ok(bytes)
        })
        .await
        .map_err(|e| Error::RunnerOutput(e.to_string()))??;

        let status = child.wait().await?;
        let transcript = String::from_utf8_lossy(&bytes).into_owned();
        tracing::debug!(%status, bytes = transcript.len(), "test runner finished");
        Ok(transcript)
    }
}
