//! Blocking child process execution with a bounded stderr capture and an optional deadline.

use crate::ExtractorError;

use std::{
	ffi::OsString,
	io::Read,
	path::Path,
	process::{Child, Command, ExitStatus, Stdio},
	sync::{
		mpsc::{self, Receiver, RecvTimeoutError},
		Arc, Mutex, PoisonError,
	},
	thread,
	time::{Duration, Instant},
};
use tracing::{error, warn};

/// Keep only the last N bytes of stderr to avoid unbounded memory growth.
const MAX_STDERR_BYTES: usize = 64 * 1024;
const POLL_INTERVAL: Duration = Duration::from_millis(25);
/// How long stderr may stay open after the tool exited when no timeout is configured
const STDERR_GRACE: Duration = Duration::from_millis(500);

pub(crate) fn run(
	program: &Path,
	args: &[OsString],
	timeout: Option<Duration>,
) -> Result<(), ExtractorError> {
	let deadline = timeout.map(|timeout| Instant::now() + timeout);

	let mut child = Command::new(program)
		.args(args)
		.stdin(Stdio::null())
		.stdout(Stdio::null())
		.stderr(Stdio::piped())
		.spawn()
		.map_err(|source| ExtractorError::Spawn {
			program: program.to_path_buf(),
			source,
		})?;

	let stderr = StderrCapture::start(&mut child);

	let status = wait(&mut child, timeout, deadline)?;

	// A backgrounded grandchild can keep the pipe open long after the tool exited
	let stderr = stderr
		.map(|capture| {
			capture.collect(deadline.map_or(STDERR_GRACE, |deadline| {
				deadline
					.saturating_duration_since(Instant::now())
					.max(POLL_INTERVAL)
			}))
		})
		.unwrap_or_default();

	if status.success() {
		Ok(())
	} else {
		error!(code = ?status.code(), %stderr, "Frame extractor failed");
		Err(ExtractorError::Failed {
			code: status.code(),
			stderr,
		})
	}
}

/// Drains the child's stderr on its own thread so a chatty tool can't fill the pipe and stall.
/// The thread is detached whenever we stop waiting for it.
struct StderrCapture {
	buf: Arc<Mutex<Vec<u8>>>,
	done: Receiver<()>,
}

impl StderrCapture {
	fn start(child: &mut Child) -> Option<Self> {
		let mut stderr = child.stderr.take()?;
		let buf = Arc::new(Mutex::new(Vec::new()));
		let (tx, done) = mpsc::channel();

		let shared = Arc::clone(&buf);
		thread::spawn(move || {
			let mut chunk = [0_u8; 4096];
			while let Ok(read @ 1..) = stderr.read(&mut chunk) {
				let mut buf = shared.lock().unwrap_or_else(PoisonError::into_inner);
				buf.extend_from_slice(&chunk[..read]);
				if buf.len() > MAX_STDERR_BYTES {
					let excess = buf.len() - MAX_STDERR_BYTES;
					buf.drain(..excess);
				}
			}
			// The receiver is gone if we already gave up waiting
			let _ = tx.send(());
		});

		Some(Self { buf, done })
	}

	/// Whatever was read once the pipe closes or `wait_for` elapses, whichever comes first
	fn collect(self, wait_for: Duration) -> String {
		if let Err(RecvTimeoutError::Timeout) = self.done.recv_timeout(wait_for) {
			warn!(
				?wait_for,
				"Frame extractor's stderr is still held open, keeping what was read so far"
			);
		}

		let buf = self.buf.lock().unwrap_or_else(PoisonError::into_inner);
		String::from_utf8_lossy(&buf).trim().to_string()
	}
}

fn wait(
	child: &mut Child,
	timeout: Option<Duration>,
	deadline: Option<Instant>,
) -> Result<ExitStatus, ExtractorError> {
	let (Some(timeout), Some(deadline)) = (timeout, deadline) else {
		return child.wait().map_err(Into::into);
	};

	loop {
		if let Some(status) = child.try_wait()? {
			return Ok(status);
		}

		if Instant::now() >= deadline {
			warn!(?timeout, "Frame extractor timed out, killing it");
			if let Err(e) = child.kill() {
				error!(?e, "Failed to kill frame extractor");
			}
			// Reap it so we don't leave a zombie behind
			child.wait()?;
			return Err(ExtractorError::Timeout(timeout));
		}

		thread::sleep(POLL_INTERVAL);
	}
}
