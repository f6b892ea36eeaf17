//! Bounded external command execution

use crate::error::{NetPulseError, Result};
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled for exit
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Run `program` with `args` and return its stdout
///
/// `timeout` bounds the whole call, including reading stdout: a background
/// process that inherited the pipe cannot hold it open past the deadline.
/// The child is killed and reaped on every early return. Spawn failures,
/// non-zero exits and timeouts are all errors; callers in the proxy cascade
/// treat every one of them as "no data".
pub(crate) fn output_with_timeout(
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<String> {
    let start = Instant::now();
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()?;

    // Drain stdout concurrently so a chatty child never blocks on a full pipe
    let (tx, rx) = mpsc::channel();
    if let Some(mut stdout) = child.stdout.take() {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = tx.send(stdout.read_to_end(&mut buf).map(|_| buf));
        });
    } else {
        let _ = tx.send(Ok(Vec::new()));
    }

    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() >= timeout {
                    reap(&mut child);
                    return Err(timed_out(program, timeout));
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                reap(&mut child);
                return Err(e.into());
            }
        }
    };

    if !status.success() {
        return Err(NetPulseError::CommandFailed(format!(
            "{} exited with {}",
            program, status
        )));
    }

    let remaining = timeout.saturating_sub(start.elapsed());
    let out = match rx.recv_timeout(remaining) {
        Ok(read) => read?,
        Err(RecvTimeoutError::Timeout) => return Err(timed_out(program, timeout)),
        Err(RecvTimeoutError::Disconnected) => {
            return Err(NetPulseError::Other(format!(
                "{} stdout reader panicked",
                program
            )))
        }
    };
    Ok(String::from_utf8_lossy(&out).into_owned())
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn timed_out(program: &str, timeout: Duration) -> NetPulseError {
    NetPulseError::CommandFailed(format!(
        "{} timed out after {} ms",
        program,
        timeout.as_millis()
    ))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_captures_stdout() {
        let out = output_with_timeout(
            "sh",
            &["-c", "printf 'HTTPEnable : 1\\nHTTPPort : 8080\\n'"],
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(out, "HTTPEnable : 1\nHTTPPort : 8080\n");
    }

    #[test]
    fn test_timeout_kills_child() {
        let start = Instant::now();
        let err = output_with_timeout("sleep", &["5"], Duration::from_millis(100)).unwrap_err();
        assert!(matches!(err, NetPulseError::CommandFailed(_)));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_deadline_covers_inherited_stdout() {
        // The shell exits at once but its background sleep keeps the pipe open
        let start = Instant::now();
        let err = output_with_timeout(
            "sh",
            &["-c", "sleep 3 & echo hi"],
            Duration::from_millis(500),
        )
        .unwrap_err();
        assert!(matches!(err, NetPulseError::CommandFailed(_)));
        assert!(start.elapsed() < Duration::from_millis(2000));
    }

    #[test]
    fn test_nonzero_exit_is_error() {
        let err =
            output_with_timeout("sh", &["-c", "exit 3"], Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, NetPulseError::CommandFailed(_)));
    }

    #[test]
    fn test_missing_program_is_error() {
        let err = output_with_timeout("netpulse-no-such-binary", &[], Duration::from_secs(1))
            .unwrap_err();
        assert!(matches!(err, NetPulseError::Io(_)));
    }
}
