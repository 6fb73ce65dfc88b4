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

//! Remote call failures.

use thiserror::Error;

use crate::api::codes;

/// Why a remote call did not produce a payload.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum RemoteError {
    /// The server understood the request and declined it.
    #[error("API code {code} ({})", codes::describe(*code))]
    Rejected { code: i64 },

    #[error(transparent)]
    Transport(#[from] TransportFailure),
}

impl RemoteError {
    /// Short category used in one-line reports.
    pub(crate) fn category(&self) -> &'static str {
        match self {
            RemoteError::Rejected { .. } => "rejected",
            RemoteError::Transport(TransportFailure::Timeout) => "timeout",
            RemoteError::Transport(TransportFailure::Connection(_)) => "connection",
            RemoteError::Transport(TransportFailure::Status(_)) => "http",
            RemoteError::Transport(TransportFailure::Malformed(_)) => "malformed",
        }
    }
}

/// Failures below the API envelope: network, timeouts, bad responses.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub(crate) enum TransportFailure {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<&reqwest::Error> for TransportFailure {
    fn from(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportFailure::Timeout
        } else if let Some(status) = e.status() {
            TransportFailure::Status(status.as_u16())
        } else if e.is_decode() {
            TransportFailure::Malformed(e.to_string())
        } else {
            TransportFailure::Connection(e.to_string())
        }
    }
}

impl From<reqwest::Error> for TransportFailure {
    fn from(e: reqwest::Error) -> Self {
        TransportFailure::from(&e)
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(e: reqwest::Error) -> Self {
        RemoteError::Transport(e.into())
    }
}

/// Classifies a failed read of a response body.
impl From<std::io::Error> for TransportFailure {
    fn from(e: std::io::Error) -> Self {
        // Body reads wrap the client error in an `io::Error`.
        if let Some(inner) = e.get_ref().and_then(|inner| inner.downcast_ref::<reqwest::Error>()) {
            return TransportFailure::from(inner);
        }
        if e.kind() == std::io::ErrorKind::TimedOut {
            TransportFailure::Timeout
        } else {
            TransportFailure::Connection(e.to_string())
        }
    }
}
