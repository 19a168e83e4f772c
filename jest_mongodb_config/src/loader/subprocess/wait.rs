//! Bounded waiting on a child process with concurrently drained pipes.
//!
//! One deadline covers both the child's exit and the draining of its pipes.
//! A background process that inherits stdout or stderr can hold them open
//! after the child exits; once the deadline passes the readers are left
//! detached and the import reports a timeout.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::{LoadError, LoadResult};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

type Chunk = (Stream, Vec<u8>);

/// Point in time after which the import is abandoned. `None` when the
/// timeout is too large to represent.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Option<Instant>,
    timeout: Duration,
}

impl Deadline {
    fn after(timeout: Duration) -> Self {
        Self {
            at: Instant::now().checked_add(timeout),
            timeout,
        }
    }

    fn has_passed(self) -> bool {
        self.at.is_some_and(|at| Instant::now() >= at)
    }

    fn remaining(self) -> Option<Duration> {
        self.at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }
}

/// Runs `command` to completion, killing it once `timeout` elapses.
///
/// `path` is the configuration being imported and only feeds error reports.
pub(super) fn output_with_timeout(
    mut command: Command,
    timeout: Duration,
    path: &Path,
) -> LoadResult<Output> {
    let deadline = Deadline::after(timeout);
    let program = command.get_program().to_string_lossy().into_owned();
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = command
        .spawn()
        .map_err(|source| LoadError::Spawn { program, source })?;

    let (sender, chunks) = mpsc::channel();
    let mut readers = 0_usize;
    if let Some(pipe) = child.stdout.take() {
        spawn_pipe_reader(pipe, Stream::Stdout, sender.clone());
        readers += 1;
    }
    if let Some(pipe) = child.stderr.take() {
        spawn_pipe_reader(pipe, Stream::Stderr, sender.clone());
        readers += 1;
    }
    drop(sender);

    let status = wait_with_deadline(&mut child, deadline, path)?;
    let (stdout, stderr) = collect_output(&chunks, readers, deadline, path)?;
    Ok(Output {
        status,
        stdout,
        stderr,
    })
}

fn spawn_pipe_reader(mut pipe: impl Read + Send + 'static, stream: Stream, sender: Sender<Chunk>) {
    thread::spawn(move || {
        let mut buffer = Vec::new();
        if let Err(err) = pipe.read_to_end(&mut buffer) {
            tracing::debug!(error = %err, ?stream, "failed to drain configuration import pipe");
        }
        // The receiver is gone once the import has been abandoned.
        if sender.send((stream, buffer)).is_err() {
            tracing::debug!(?stream, "configuration import output arrived after the deadline");
        }
    });
}

fn collect_output(
    chunks: &Receiver<Chunk>,
    readers: usize,
    deadline: Deadline,
    path: &Path,
) -> LoadResult<(Vec<u8>, Vec<u8>)> {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    for _ in 0..readers {
        let received = match deadline.remaining() {
            Some(remaining) => chunks.recv_timeout(remaining),
            None => chunks.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok((Stream::Stdout, bytes)) => stdout = bytes,
            Ok((Stream::Stderr, bytes)) => stderr = bytes,
            Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    path = %path.display(),
                    timeout = ?deadline.timeout,
                    "configuration import exited but its output pipes stayed open"
                );
                return Err(timed_out(path, deadline));
            }
        }
    }
    Ok((stdout, stderr))
}

fn wait_with_deadline(child: &mut Child, deadline: Deadline, path: &Path) -> LoadResult<ExitStatus> {
    loop {
        if let Some(status) = child.try_wait().map_err(|source| wait_error(path, source))? {
            return Ok(status);
        }

        if deadline.has_passed() {
            return handle_timeout(child, deadline, path);
        }

        thread::sleep(POLL_INTERVAL);
    }
}

fn handle_timeout(child: &mut Child, deadline: Deadline, path: &Path) -> LoadResult<ExitStatus> {
    if let Some(status) = child.try_wait().map_err(|source| wait_error(path, source))? {
        return Ok(status);
    }
    tracing::warn!(
        path = %path.display(),
        pid = child.id(),
        timeout = ?deadline.timeout,
        "configuration import timed out; killing child process"
    );
    // The child may exit between the poll and the kill.
    if let Err(err) = child.kill() {
        tracing::debug!(error = %err, "failed to kill configuration import child");
    }
    if let Err(err) = child.wait() {
        tracing::debug!(error = %err, "failed to reap configuration import child");
    }
    Err(timed_out(path, deadline))
}

fn timed_out(path: &Path, deadline: Deadline) -> LoadError {
    LoadError::Timeout {
        path: path.to_path_buf(),
        timeout: deadline.timeout,
    }
}

fn wait_error(path: &Path, source: std::io::Error) -> LoadError {
    LoadError::Wait {
        path: path.to_path_buf(),
        source,
    }
}
