//! # Bootstrap Module
//!
//! Process-level entry points. The framework core never touches the real
//! process; this module is the thin adapter that does: it assembles a
//! [`Console`] from the actual arguments, environment and stdin, hands it to
//! a configured [`Application`], flushes the resulting console to
//! stdout/stderr and exits with its exit code.
//!
//! ## Example
//!
//! ```rust,no_run
//! use armature::bootstrap;
//!
//! fn main() -> ! {
//!     bootstrap::init_tracing();
//!     bootstrap::run_cli(|app| {
//!         app // .command(...) / .service(...) / .map(...)
//!     })
//! }
//! ```

use std::io::{BufRead, IsTerminal, Write};

use tracing_subscriber::EnvFilter;

use crate::app::Application;
use crate::cli::Console;
use crate::os::OperatingSystem;

/// Install a `tracing` fmt subscriber honoring `RUST_LOG`.
///
/// Safe to call once at process start; repeated calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Build a console from the running process.
///
/// When stdin is not a terminal it is drained up front: every line is read
/// and queued as console input before dispatch starts, so a piped writer
/// must close its end (and the whole input must fit in memory) before any
/// command runs, even a command that never reads input. An interactive
/// console starts with no queued input.
#[must_use]
pub fn process_console() -> Console {
    let stdin = std::io::stdin();
    let interactive = stdin.is_terminal();
    let inputs: Vec<String> = if interactive {
        Vec::new()
    } else {
        stdin.lock().lines().map_while(Result::ok).collect()
    };
    Console::in_memory(std::env::args(), interactive, inputs, std::env::vars())
}

/// Configure and run a CLI application against the real process, then exit.
///
/// The application is seeded with the process environment variables; the
/// console's output and error chunks are flushed to stdout/stderr and the
/// console's exit code (0 when unset) becomes the process exit code. A run
/// failure prints a diagnostic to stderr and exits with code 1.
pub fn run_cli(configure: impl FnOnce(Application) -> Application) -> ! {
    let app = configure(Application::cli(
        OperatingSystem::native(),
        std::env::vars(),
    ));

    match app.run_cli(process_console()) {
        Ok(console) => {
            let mut stdout = std::io::stdout().lock();
            for chunk in console.outputs() {
                let _ = stdout.write_all(chunk.as_bytes());
            }
            let _ = stdout.flush();
            let mut stderr = std::io::stderr().lock();
            for chunk in console.errors() {
                let _ = stderr.write_all(chunk.as_bytes());
            }
            let _ = stderr.flush();
            std::process::exit(console.exit_code().unwrap_or(0))
        }
        Err(error) => {
            eprintln!("{error:#}");
            std::process::exit(1)
        }
    }
}
