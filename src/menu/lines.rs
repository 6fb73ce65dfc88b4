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

//! Line input that gives up once a shutdown is requested.
//!
//! A blocking read of standard input cannot be cancelled, so lines are read on
//! a helper thread and handed over through a channel. The helper only reads
//! when a line is asked for, it never holds a read open while the controller
//! owns the keyboard.
//!
//! After a shutdown request the feed reports end of input, which the menu
//! already treats as a request to log out and exit.

use std::{
    io::{self, BufRead, Read},
    sync::{
        Arc,
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    thread,
    time::Duration,
};

use crate::shutdown::Shutdown;

/// How often a waiting read checks for a shutdown request.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub(crate) struct LineFeed {
    requests: Sender<()>,
    lines: Receiver<io::Result<String>>,
    shutdown: Arc<Shutdown>,
    pending: bool,
    closed: bool,
    buf: Vec<u8>,
    pos: usize,
}

impl LineFeed {
    /// Feeds lines from standard input.
    pub(crate) fn stdin(shutdown: Arc<Shutdown>) -> io::Result<Self> {
        Self::spawn(move |line| io::stdin().read_line(line), shutdown)
    }

    /// Feeds lines produced by `read_line`, called on a helper thread once per
    /// requested line.
    pub(crate) fn spawn<F>(mut read_line: F, shutdown: Arc<Shutdown>) -> io::Result<Self>
    where
        F: FnMut(&mut String) -> io::Result<usize> + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<()>();
        let (line_tx, line_rx) = mpsc::channel();

        thread::Builder::new().name("menu-input".to_string()).spawn(move || {
            while request_rx.recv().is_ok() {
                let mut line = String::new();
                let res = read_line(&mut line).map(|_| line);
                if line_tx.send(res).is_err() {
                    break;
                }
            }
        })?;

        Ok(Self {
            requests: request_tx,
            lines: line_rx,
            shutdown,
            pending: false,
            closed: false,
            buf: Vec::new(),
            pos: 0,
        })
    }

    fn refill(&mut self) -> io::Result<()> {
        if !self.pending {
            if self.requests.send(()).is_err() {
                self.closed = true;
                return Ok(());
            }
            self.pending = true;
        }

        loop {
            if self.shutdown.requested() {
                tracing::debug!("Line input abandoned on shutdown");
                self.closed = true;
                return Ok(());
            }

            match self.lines.recv_timeout(POLL_INTERVAL) {
                Ok(res) => {
                    self.pending = false;
                    let line = res?;
                    self.closed = line.is_empty();
                    self.buf = line.into_bytes();
                    self.pos = 0;
                    return Ok(());
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    self.closed = true;
                    return Ok(());
                }
            }
        }
    }
}

impl Read for LineFeed {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(out.len());
        out[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for LineFeed {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.pos == self.buf.len() && !self.closed {
            self.refill()?;
        }
        Ok(&self.buf[self.pos..])
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.buf.len());
    }
}
