use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::BridgeSettings;
use crate::models::BridgeOutcome;

/// How much stderr is kept for the failure diagnostic.
const STDERR_CAP_BYTES: usize = 64 * 1024;

/// Errors that can occur when obtaining a recommendation
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("Failed to launch recommendation process: {0}")]
    Spawn(std::io::Error),

    #[error("Failed to read recommendation process output: {0}")]
    Read(std::io::Error),

    #[error("Recommendation process exited with {status}: {detail}")]
    ProcessFailed { status: String, detail: String },

    #[error("Recommendation process exceeded the {limit}-byte output cap")]
    OutputOverflow { limit: usize },
}

/// Narrow seam for obtaining a recommendation from free text.
///
/// Callers only see `recommend`, so the subprocess model can be swapped for
/// an in-process or networked one without touching the route layer.
#[async_trait]
pub trait Recommender: Send + Sync {
    async fn recommend(&self, text: &str) -> Result<BridgeOutcome, BridgeError>;
}

/// Recommender that shells out to an external script once per request.
///
/// The script receives the free text as a single argument, writes
/// line-oriented progress to stdout, and ends with a JSON object carrying a
/// `recommendation` field. No warm interpreter is kept between requests and
/// no retry is attempted; each call pays full process startup.
pub struct ScriptBridge {
    interpreter: String,
    script: PathBuf,
    max_output_bytes: usize,
    workdir: Option<PathBuf>,
}

impl ScriptBridge {
    pub fn new(
        interpreter: impl Into<String>,
        script: impl Into<PathBuf>,
        max_output_bytes: usize,
        workdir: Option<PathBuf>,
    ) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
            max_output_bytes,
            workdir,
        }
    }

    pub fn from_settings(settings: &BridgeSettings) -> Self {
        Self::new(
            settings.interpreter.clone(),
            settings.script.clone(),
            settings.max_output_bytes,
            settings.workdir.clone().map(PathBuf::from),
        )
    }
}

#[async_trait]
impl Recommender for ScriptBridge {
    async fn recommend(&self, text: &str) -> Result<BridgeOutcome, BridgeError> {
        let mut cmd = Command::new(&self.interpreter);
        // -u keeps the interpreter unbuffered so progress lines arrive as
        // they are printed.
        cmd.arg("-u")
            .arg(&self.script)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }

        debug!(
            interpreter = %self.interpreter,
            script = %self.script.display(),
            "spawning recommendation process"
        );

        // No timeout and kill_on_drop stays off: a client disconnect does
        // not terminate the child. The handler suspends until exit.
        let mut child = cmd.spawn().map_err(BridgeError::Spawn)?;

        let stdout_pipe = child.stdout.take().ok_or_else(|| {
            BridgeError::Spawn(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "stdout was not captured",
            ))
        })?;
        let stderr_pipe = child.stderr.take().ok_or_else(|| {
            BridgeError::Spawn(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "stderr was not captured",
            ))
        })?;

        // Stderr is drained to EOF on its own task so a chatty child never
        // blocks on a full pipe while we read stdout.
        let stderr_task = tokio::spawn(drain_capped(stderr_pipe, STDERR_CAP_BYTES));

        // Stdout is read incrementally and stops at one byte past the cap,
        // so a runaway script is bounded by max_output_bytes of memory.
        let stdout_bytes = read_capped(stdout_pipe, self.max_output_bytes as u64 + 1)
            .await
            .map_err(BridgeError::Read)?;

        if stdout_bytes.len() > self.max_output_bytes {
            warn!(
                limit = self.max_output_bytes,
                "recommendation process output exceeded cap"
            );
            // Kill the child: we stopped reading and it may be blocked on a
            // full stdout pipe forever otherwise.
            let _ = child.kill().await;
            let _ = child.wait().await;
            stderr_task.abort();
            return Err(BridgeError::OutputOverflow {
                limit: self.max_output_bytes,
            });
        }

        let status = child.wait().await.map_err(BridgeError::Read)?;
        let stderr_bytes = match stderr_task.await {
            Ok(Ok(bytes)) => bytes,
            _ => Vec::new(),
        };

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            warn!(status = %status, "recommendation process failed");
            return Err(BridgeError::ProcessFailed {
                status: status.to_string(),
                detail: tail(&stderr, 512),
            });
        }

        let stdout = String::from_utf8_lossy(&stdout_bytes);
        let lines: Vec<String> = stdout
            .lines()
            .map(|l| l.trim_end().to_string())
            .filter(|l| !l.is_empty())
            .collect();

        Ok(parse_output(lines))
    }
}

/// Read at most `limit` bytes from `reader`, then stop reading.
///
/// The caller is responsible for the consequences of the unread remainder
/// (the bridge kills the child when stdout overflows its cap).
async fn read_capped<R: AsyncRead + Unpin>(reader: R, limit: u64) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.take(limit).read_to_end(&mut buf).await?;
    Ok(buf)
}

/// Read `reader` to EOF, keeping only the first `limit` bytes.
///
/// Unlike `read_capped` this never stops consuming, so the child can keep
/// writing past the cap without blocking on a full pipe.
async fn drain_capped<R: AsyncRead + Unpin>(mut reader: R, limit: usize) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        if buf.len() < limit {
            let keep = (limit - buf.len()).min(n);
            buf.extend_from_slice(&chunk[..keep]);
        }
    }
    Ok(buf)
}

/// Interpret the lines a recommendation process emitted.
///
/// The last line is expected to be a JSON object with a `recommendation`
/// field. Anything else is a degraded success: the whole transcript is
/// returned verbatim so the caller still gets the model's output. A clean
/// run that printed nothing degrades to an empty transcript, not an error.
pub fn parse_output(lines: Vec<String>) -> BridgeOutcome {
    let last = lines.last().map(String::as_str).unwrap_or_default();

    match serde_json::from_str::<serde_json::Value>(last) {
        Ok(value) => match value.get("recommendation").and_then(|r| r.as_str()) {
            Some(text) => BridgeOutcome::Recommendation(text.to_string()),
            None => BridgeOutcome::Transcript(lines),
        },
        Err(_) => BridgeOutcome::Transcript(lines),
    }
}

/// Last `max` bytes of `text`, on a char boundary.
fn tail(text: &str, max: usize) -> String {
    if text.len() <= max {
        return text.to_string();
    }
    let mut start = text.len() - max;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    text[start..].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_json_final_line() {
        let outcome = parse_output(lines(&[
            "Using device: cpu",
            "Model loaded successfully",
            r#"{"recommendation":"X"}"#,
        ]));
        assert_eq!(outcome, BridgeOutcome::Recommendation("X".to_string()));
    }

    #[test]
    fn test_parse_non_json_final_line_returns_transcript() {
        let input = lines(&["Loading model...", "No user info provided"]);
        let outcome = parse_output(input.clone());
        assert_eq!(outcome, BridgeOutcome::Transcript(input));
    }

    #[test]
    fn test_parse_empty_transcript_is_empty_degraded_success() {
        let outcome = parse_output(Vec::new());
        assert_eq!(outcome, BridgeOutcome::Transcript(Vec::new()));
    }

    #[test]
    fn test_parse_json_without_recommendation_field_is_degraded() {
        let input = lines(&[r#"{"status":"done"}"#]);
        let outcome = parse_output(input.clone());
        assert_eq!(outcome, BridgeOutcome::Transcript(input));
    }

    #[test]
    fn test_parse_single_json_line() {
        let outcome = parse_output(lines(&[r#"{"recommendation":"seek seed funding"}"#]));
        assert_eq!(
            outcome,
            BridgeOutcome::Recommendation("seek seed funding".to_string())
        );
    }

    #[test]
    fn test_tail_respects_char_boundaries() {
        let text = "αβγδε";
        let tailed = tail(text, 3);
        assert!(tailed.len() <= 3);
        assert!(text.ends_with(&tailed));
    }
}
