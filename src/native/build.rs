//! Running the native toolchain.
//!
//! The build is a plain subprocess. Its stdout and stderr are drained on
//! background threads while the calling thread polls for exit, so a
//! [`CancelToken`] flipped from anywhere stops the build. On unix the child
//! leads its own process group and the whole group is killed, so compiler
//! processes it spawned go down with it. The build then fails with whatever
//! it printed so far.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{error, info};

use crate::error::{Error, Result};

/// Shared flag asking a running build to stop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Cancel on SIGINT or SIGTERM. The handler only raises a process-wide
    /// flag; a watcher thread forwards it to this token.
    #[cfg(unix)]
    pub fn cancel_on_interrupt(&self) {
        for signal in [libc::SIGINT, libc::SIGTERM] {
            // SAFETY: the handler does nothing but store to an atomic.
            unsafe {
                libc::signal(signal, interrupted as libc::sighandler_t);
            }
        }
        let token = self.clone();
        thread::spawn(move || {
            while !INTERRUPTED.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(50));
            }
            token.cancel();
        });
    }

    /// Signals aren't hooked here; cancel through [`CancelToken::cancel`].
    #[cfg(not(unix))]
    pub fn cancel_on_interrupt(&self) {}
}

#[cfg(unix)]
static INTERRUPTED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
extern "C" fn interrupted(_: libc::c_int) {
    INTERRUPTED.store(true, Ordering::SeqCst);
}

/// A `cargo build` of one directory.
#[derive(Debug, Clone)]
pub struct CargoBuild {
    program: String,
    args: Vec<String>,
    dir: PathBuf,
    poll: Duration,
}

impl CargoBuild {
    pub fn new(program: &str, dir: &Path) -> Self {
        Self {
            program: program.to_string(),
            args: vec!["build".to_string()],
            dir: dir.to_path_buf(),
            poll: Duration::from_millis(50),
        }
    }

    /// Replace the arguments passed to the program.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Run the build to completion or cancellation, returning its output.
    pub fn run(&self, token: &CancelToken) -> Result<String> {
        info!("Building rust project in {}", self.dir.display());
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .current_dir(&self.dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }
        let mut child = command
            .spawn()
            .map_err(|e| Error::BuildFailure {
                message: format!(
                    "Can't start '{}' in {}: {}",
                    self.program,
                    self.dir.display(),
                    e
                ),
                output: String::new(),
            })?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());
        loop {
            if token.is_cancelled() {
                stop(&mut child);
                return Err(Error::BuildFailure {
                    message: format!("Interrupted while building {}", self.dir.display()),
                    output: collect(stdout, stderr),
                });
            }
            match child.try_wait()? {
                Some(status) => {
                    let output = collect(stdout, stderr);
                    if status.success() {
                        return Ok(output);
                    }
                    error!("There was an error in compilation");
                    return Err(Error::BuildFailure {
                        message: format!(
                            "Failed to build cargo project with dest = {}",
                            self.dir.display()
                        ),
                        output,
                    });
                }
                None => thread::sleep(self.poll),
            }
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut bytes = Vec::new();
            let _ = pipe.read_to_end(&mut bytes);
            String::from_utf8_lossy(&bytes).into_owned()
        })
    })
}

fn collect(stdout: Option<JoinHandle<String>>, stderr: Option<JoinHandle<String>>) -> String {
    [stdout, stderr]
        .into_iter()
        .flatten()
        .filter_map(|handle| handle.join().ok())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn stop(child: &mut Child) {
    #[cfg(unix)]
    if let Ok(group) = libc::pid_t::try_from(child.id()) {
        // SAFETY: killpg only takes integers.
        unsafe {
            libc::killpg(group, libc::SIGKILL);
        }
    }
    let _ = child.kill();
    let _ = child.wait();
}
