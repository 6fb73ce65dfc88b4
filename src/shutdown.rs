// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Process signal handling.
//!
//! SIGINT, SIGTERM and SIGHUP are caught on a dedicated thread and turned into
//! a [`Shutdown`] request. Nothing is cleaned up on that thread: the menu's
//! line input and the controller's key listener both watch the request and
//! leave through their ordinary exit paths, so the active motion is stopped
//! and the session logged out exactly as for a normal exit.
//!
//! A second signal while the first is still being handled exits at once.

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

/// Exit status used when a repeated signal forces the process down.
#[cfg(unix)]
const FORCED_EXIT_CODE: i32 = 130;

/// A shared flag raised when the process has been asked to stop.
#[derive(Debug, Default)]
pub(crate) struct Shutdown {
    requested: AtomicBool,
}

impl Shutdown {
    pub(crate) fn requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Raises the flag, returning whether it was already raised.
    pub(crate) fn request(&self) -> bool {
        self.requested.swap(true, Ordering::SeqCst)
    }
}

/// Installs the signal handlers and returns the flag they raise.
///
/// # Errors
///
/// Returns an error if the handlers cannot be registered or the signal thread
/// cannot be started.
#[cfg(unix)]
pub(crate) fn install() -> io::Result<Arc<Shutdown>> {
    use signal_hook::{
        consts::{SIGHUP, SIGINT, SIGTERM},
        iterator::Signals,
    };

    let shutdown = Arc::new(Shutdown::default());
    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;

    let flag = Arc::clone(&shutdown);
    std::thread::Builder::new().name("signals".to_string()).spawn(move || {
        for signal in signals.forever() {
            if flag.request() {
                tracing::warn!(signal, "Signal received again, exiting immediately");
                std::process::exit(FORCED_EXIT_CODE);
            }
            tracing::info!(signal, "Shutdown requested");
        }
    })?;

    Ok(shutdown)
}

/// Signals are not caught on this platform, the flag is never raised.
#[cfg(not(unix))]
pub(crate) fn install() -> io::Result<Arc<Shutdown>> {
    Ok(Arc::new(Shutdown::default()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_reports_repeats() {
        let shutdown = Shutdown::default();
        assert!(!shutdown.requested());

        assert!(!shutdown.request());
        assert!(shutdown.requested());
        assert!(shutdown.request());
    }

    #[cfg(unix)]
    #[test]
    fn terminate_signal_raises_the_flag() {
        use std::time::{Duration, Instant};

        let shutdown = install().unwrap();
        signal_hook::low_level::raise(signal_hook::consts::SIGHUP).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        while !shutdown.requested() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        assert!(shutdown.requested());
    }
}
