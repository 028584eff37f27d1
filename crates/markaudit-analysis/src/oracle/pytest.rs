//! `pytest --collect-only -q` as a collection oracle.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver};
use markaudit_core::config::OracleConfig;
use markaudit_core::constants::PYTEST_NO_TESTS_COLLECTED;
use markaudit_core::errors::OracleError;

use super::CollectionOracle;

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const COLLECT_ARGS: &[&str] = &["--collect-only", "-q", "-p", "no:cacheprovider"];

/// Runs the configured collection command with the scan root as working directory.
#[derive(Debug, Clone)]
pub struct PytestOracle {
    command: Vec<String>,
    extra_args: Vec<String>,
    timeout: Duration,
    root: PathBuf,
}

impl PytestOracle {
    pub fn new(config: &OracleConfig, root: &Path) -> Self {
        Self {
            command: config.effective_command(),
            extra_args: config.extra_args.clone(),
            timeout: Duration::from_secs(config.effective_timeout_secs()),
            root: root.to_path_buf(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn collect(&self, category: Option<&str>) -> Result<u64, OracleError> {
        let (program, leading) = self.command.split_first().ok_or(OracleError::EmptyCommand)?;
        let mut cmd = Command::new(program);
        cmd.args(leading).args(COLLECT_ARGS);
        if let Some(category) = category {
            cmd.args(["-m", category]);
        }
        cmd.args(&self.extra_args)
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let start = Instant::now();
        let mut child = cmd.spawn().map_err(|e| OracleError::Spawn {
            program: program.clone(),
            message: e.to_string(),
        })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        let status = self.wait(&mut child)?;
        let output = stdout.recv_timeout(self.timeout).unwrap_or_default();

        let count = match status.code() {
            Some(0) => count_collected_lines(&output),
            Some(PYTEST_NO_TESTS_COLLECTED) => 0,
            Some(code) => {
                let stderr = stderr.recv_timeout(POLL_INTERVAL * 10).unwrap_or_default();
                return Err(OracleError::NonZeroExit {
                    code,
                    stderr: stderr.trim().to_string(),
                });
            }
            None => return Err(OracleError::Terminated),
        };

        tracing::debug!(
            category = category.unwrap_or("<all>"),
            count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "oracle query finished"
        );
        Ok(count)
    }

    fn wait(&self, child: &mut Child) -> Result<ExitStatus, OracleError> {
        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) if Instant::now() >= deadline => {
                    // Already exited or unkillable: either way we stop waiting.
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(OracleError::Timeout {
                        timeout_secs: self.timeout.as_secs(),
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    return Err(OracleError::Io {
                        message: e.to_string(),
                    })
                }
            }
        }
    }
}

impl CollectionOracle for PytestOracle {
    fn count_for_category(&self, category: &str) -> Result<u64, OracleError> {
        self.collect(Some(category))
    }

    fn total_count(&self) -> Result<u64, OracleError> {
        self.collect(None)
    }
}

/// Read a pipe to completion on its own thread so the child never blocks on a full pipe.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<String> {
    let (tx, rx) = bounded(1);
    if let Some(mut pipe) = pipe {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
        });
    }
    rx
}

/// Count `path::test_id` lines in quiet collection output.
pub fn count_collected_lines(output: &str) -> u64 {
    output.lines().filter(|line| line.contains("::")).count() as u64
}
