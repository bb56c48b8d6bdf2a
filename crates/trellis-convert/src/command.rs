//! External filter process backend.
//!
//! The converter program receives the input on stdin and writes the result
//! to stdout, the way Markdown.pl and SmartyPants.pl are meant to be used.
//! Reading, writing and waiting happen on separate threads so that a chatty
//! process cannot deadlock on a full pipe, and the process is killed when it
//! outlives its timeout.

use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::converter::{Converter, ConverterKind};
use crate::error::ConversionError;

/// Default time a converter process may run.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Interval between exit status polls.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Converter backed by an external filter process.
///
/// The timeout covers the whole exchange, including draining the pipes. A
/// process that outlives it is killed; its pipe threads are detached and end
/// once the last process holding the pipes (such as a backgrounded
/// grandchild) exits.
#[derive(Debug, Clone)]
pub struct CommandConverter {
    kind: ConverterKind,
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandConverter {
    /// Create a converter running `program` with no arguments.
    ///
    /// `program` is used as-is, so paths containing spaces need no quoting.
    #[must_use]
    pub fn new(kind: ConverterKind, program: impl Into<String>) -> Self {
        Self {
            kind,
            program: program.into(),
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append command-line arguments.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set the process timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Program being run.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn io_error(&self, source: std::io::Error) -> ConversionError {
        ConversionError::Io {
            converter: self.kind,
            source,
        }
    }

    fn timeout_error(&self) -> ConversionError {
        ConversionError::Timeout {
            converter: self.kind,
            timeout: self.timeout,
        }
    }

    /// Poll the child until it exits or the timeout elapses.
    fn wait(&self, child: &mut Child, started: Instant) -> Result<ExitStatus, ConversionError> {
        loop {
            if let Some(status) = child.try_wait().map_err(|e| self.io_error(e))? {
                return Ok(status);
            }
            if started.elapsed() >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(self.timeout_error());
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Join a pipe thread, abandoning it once the timeout elapses.
    fn join_until<T>(
        &self,
        handle: JoinHandle<std::io::Result<T>>,
        started: Instant,
    ) -> Result<std::io::Result<T>, ConversionError> {
        while !handle.is_finished() {
            if started.elapsed() >= self.timeout {
                return Err(self.timeout_error());
            }
            thread::sleep(POLL_INTERVAL);
        }
        Ok(join(handle))
    }
}

impl Converter for CommandConverter {
    fn kind(&self) -> ConverterKind {
        self.kind
    }

    fn convert(&self, input: &str) -> Result<String, ConversionError> {
        let started = Instant::now();
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ConversionError::Spawn {
                converter: self.kind,
                program: self.program.clone(),
                source,
            })?;

        let (Some(mut stdin), Some(stdout), Some(stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(self.io_error(std::io::Error::other("converter pipes unavailable")));
        };

        let input_len = input.len();
        let input = input.to_owned();
        // stdin is dropped when the writer finishes, signaling EOF
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));
        let stdout_reader = spawn_reader(stdout);
        let stderr_reader = spawn_reader(stderr);

        let status = self.wait(&mut child, started)?;

        match self.join_until(writer, started)? {
            // A filter may exit without consuming all of its input.
            Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
            Err(e) => return Err(self.io_error(e)),
            Ok(()) => {}
        }
        let stdout = self
            .join_until(stdout_reader, started)?
            .map_err(|e| self.io_error(e))?;
        let stderr = self
            .join_until(stderr_reader, started)?
            .map_err(|e| self.io_error(e))?;

        tracing::debug!(
            converter = %self.kind,
            program = %self.program,
            input_len,
            output_len = stdout.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "Converter process finished"
        );

        if !status.success() {
            return Err(ConversionError::Failed {
                converter: self.kind,
                status,
                stderr: String::from_utf8_lossy(&stderr).trim().to_owned(),
            });
        }

        String::from_utf8(stdout).map_err(|source| ConversionError::InvalidUtf8 {
            converter: self.kind,
            source,
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join<T>(handle: JoinHandle<std::io::Result<T>>) -> std::io::Result<T> {
    handle
        .join()
        .unwrap_or_else(|_| Err(std::io::Error::other("converter pipe thread panicked")))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cat_round_trips_input() {
        let converter = CommandConverter::new(ConverterKind::SmartyPants, "cat");

        let output = converter.convert("\"quoted\" -- text\n").unwrap();

        assert_eq!(output, "\"quoted\" -- text\n");
    }

    #[test]
    fn test_args_are_passed() {
        let converter = CommandConverter::new(ConverterKind::Kramdown, "sh")
            .with_args(["-c", "tr a-z A-Z"]);

        let output = converter.convert("hello").unwrap();

        assert_eq!(output, "HELLO");
    }

    #[test]
    fn test_large_input_does_not_deadlock() {
        let converter = CommandConverter::new(ConverterKind::Markdown, "cat");
        let input = "line of text\n".repeat(100_000);

        let output = converter.convert(&input).unwrap();

        assert_eq!(output.len(), input.len());
    }

    #[test]
    fn test_nonzero_exit_is_failure() {
        let converter = CommandConverter::new(ConverterKind::Haml, "sh")
            .with_args(["-c", "echo 'Illegal nesting' >&2; exit 3"]);

        let err = converter.convert("%p\n  bad").unwrap_err();

        match err {
            ConversionError::Failed { converter, stderr, status } => {
                assert_eq!(converter, ConverterKind::Haml);
                assert_eq!(stderr, "Illegal nesting");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("Expected Failed, got {other:?}"),
        }
    }

    #[test]
    fn test_exit_without_reading_input_is_failure_not_io() {
        let converter = CommandConverter::new(ConverterKind::Haml, "false");

        let err = converter.convert(&"x".repeat(1 << 20)).unwrap_err();

        assert!(matches!(err, ConversionError::Failed { .. }), "{err:?}");
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let converter =
            CommandConverter::new(ConverterKind::SmartyPants, "/nonexistent/SmartyPants.pl");

        let err = converter.convert("text").unwrap_err();

        assert!(matches!(err, ConversionError::Spawn { .. }), "{err:?}");
        assert!(err.to_string().contains("/nonexistent/SmartyPants.pl"));
    }

    #[test]
    fn test_timeout_kills_process() {
        let converter = CommandConverter::new(ConverterKind::Kramdown, "sleep")
            .with_args(["5"])
            .with_timeout(Duration::from_millis(100));
        let started = Instant::now();

        let err = converter.convert("text").unwrap_err();

        assert!(matches!(err, ConversionError::Timeout { .. }), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_timeout_when_grandchild_holds_pipes() {
        let converter = CommandConverter::new(ConverterKind::SmartyPants, "sh")
            .with_args(["-c", "sleep 5 & echo started"])
            .with_timeout(Duration::from_millis(200));
        let started = Instant::now();

        let err = converter.convert("text").unwrap_err();

        assert!(matches!(err, ConversionError::Timeout { .. }), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_invalid_utf8_output() {
        let converter =
            CommandConverter::new(ConverterKind::Markdown, "sh").with_args(["-c", "printf '\\377'"]);

        let err = converter.convert("").unwrap_err();

        assert!(matches!(err, ConversionError::InvalidUtf8 { .. }), "{err:?}");
    }
}
