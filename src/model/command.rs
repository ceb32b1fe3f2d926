use super::{LanguageModel, ModelError};
use async_trait::async_trait;
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

const STDERR_TAIL_CHARS: usize = 200;

/// Runs an external program per completion: the prompt goes to stdin, the
/// completion is read from stdout. Generation limits are passed through the
/// `PRSCORE_MAX_TOKENS` and `PRSCORE_TEMPERATURE` environment variables.
#[derive(Debug, Clone)]
pub struct CommandModel {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandModel {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args,
            timeout,
        }
    }

    async fn run(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ModelError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("PRSCORE_MAX_TOKENS", max_tokens.to_string())
            .env("PRSCORE_TEMPERATURE", temperature.to_string())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ModelError::Unavailable(format!("failed to start {}: {e}", self.program)))?;

        // The prompt is fed while stdout drains; the pipe closes when `stdin` drops.
        let stdin = child.stdin.take();
        let send_prompt = async move {
            match stdin {
                Some(mut stdin) => stdin.write_all(prompt.as_bytes()).await,
                None => Ok(()),
            }
        };
        let (sent, output) = tokio::join!(send_prompt, child.wait_with_output());

        // A program that answers without reading its input closes the pipe early.
        if let Err(err) = sent {
            if err.kind() != io::ErrorKind::BrokenPipe {
                return Err(ModelError::Unavailable(format!(
                    "failed to send prompt to {}: {err}",
                    self.program
                )));
            }
        }
        let output =
            output.map_err(|e| ModelError::Unavailable(format!("{} failed: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let tail_start = stderr
                .char_indices()
                .rev()
                .nth(STDERR_TAIL_CHARS)
                .map(|(index, _)| index)
                .unwrap_or(0);
            return Err(ModelError::Unavailable(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                &stderr[tail_start..]
            )));
        }

        String::from_utf8(output.stdout)
            .map_err(|e| ModelError::Malformed(format!("completion is not valid UTF-8: {e}")))
    }
}

#[async_trait]
impl LanguageModel for CommandModel {
    async fn complete(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ModelError> {
        tracing::debug!(program = %self.program, max_tokens, temperature, "invoking model command");
        match tokio::time::timeout(self.timeout, self.run(prompt, max_tokens, temperature)).await {
            Ok(result) => result,
            Err(_) => Err(ModelError::Unavailable(format!(
                "{} timed out after {}s",
                self.program,
                self.timeout.as_secs_f32()
            ))),
        }
    }
}
