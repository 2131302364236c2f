//! Local command generator.
//!
//! Spawns a model runner (for example `ollama run llama3.1`), pipes the
//! prompt to stdin and collects the completion from stdout.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;

use super::{GenerationOutput, Generator, SamplingConfig};

/// Generator backed by a subprocess
pub struct CommandGenerator {
    /// Program to run
    program: String,
    /// Arguments passed before stdin is written
    args: Vec<String>,
    /// Upper bound for one generation
    call_timeout: Duration,
}

impl CommandGenerator {
    /// Build from an argv list; the first element is the program
    pub fn from_argv(argv: &[String], call_timeout: Duration) -> Result<Self> {
        let (program, args) = argv
            .split_first()
            .context("Generator command is empty")?;

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            call_timeout,
        })
    }

    /// Run the program with the prompt on stdin
    async fn execute_subprocess(
        &self,
        prompt: &str,
        max_output_tokens: u32,
        sampling: &SamplingConfig,
    ) -> Result<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("EXECBRIEF_MAX_TOKENS", max_output_tokens.to_string())
            .env("EXECBRIEF_TEMPERATURE", sampling.temperature.to_string())
            .env("EXECBRIEF_TOP_P", sampling.top_p.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn generator process '{}'", self.program))?;

        // Write prompt to stdin
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(prompt.as_bytes())
                .await
                .context("Failed to write prompt to generator stdin")?;
            // Drop stdin to signal EOF
        }

        let output = timeout(self.call_timeout, child.wait_with_output())
            .await
            .with_context(|| {
                format!(
                    "Generator '{}' timed out after {:?}",
                    self.program, self.call_timeout
                )
            })?
            .with_context(|| format!("Failed to wait for generator process '{}'", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            anyhow::bail!(
                "Generator '{}' failed with exit code {}: {}",
                self.program,
                exit_code,
                stderr.trim()
            );
        }

        let stdout =
            String::from_utf8(output.stdout).context("Generator output is not valid UTF-8")?;

        Ok(stdout)
    }
}

#[async_trait]
impl Generator for CommandGenerator {
    fn name(&self) -> &str {
        "command"
    }

    async fn generate(
        &self,
        prompt: &str,
        max_output_tokens: u32,
        sampling: &SamplingConfig,
    ) -> Result<GenerationOutput> {
        let content = self
            .execute_subprocess(prompt, max_output_tokens, sampling)
            .await?;

        if content.trim().is_empty() {
            anyhow::bail!("Generator '{}' produced no output", self.program);
        }

        Ok(GenerationOutput::new(content.trim().to_string()))
    }

    async fn health_check(&self) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("--version")
            .output()
            .await
            .with_context(|| {
                format!("Failed to run generator health check for '{}'", self.program)
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Generator health check failed: {}", stderr.trim());
        }

        Ok(())
    }
}
