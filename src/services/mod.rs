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

//! Request wrappers for the Surveillance Station APIs.
//!
//! Each function builds one [`ApiCommand`](crate::api::ApiCommand), executes
//! it and decodes the interesting part of the payload. None of them print;
//! presenting results is left to the menu.
//!
//! # Organization
//!
//! * [`camera`]: Camera list, capabilities, live paths, enable/disable.
//! * [`info`]: API discovery.
//! * [`ptz`]: Preset listing and the continuous move command.
//! * [`recording`]: Recording list and download.
//! * [`snapshot`]: Snapshot capture, storage, download and deletion.

pub(crate) mod camera;
pub(crate) mod info;
pub(crate) mod ptz;
pub(crate) mod recording;
pub(crate) mod snapshot;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::{Payload, RemoteError, TransportFailure};

/// Failure to download a file from the server.
#[derive(Debug, Error)]
pub(crate) enum DownloadError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("failed to write file: {0}")]
    Io(#[from] std::io::Error),
}

/// A download answered with a success envelope instead of file data.
pub(crate) fn unexpected_success(content_type: &str) -> DownloadError {
    let failure = TransportFailure::Malformed(format!("unexpected response of type {:?}", content_type));
    DownloadError::Remote(failure.into())
}

/// Decodes a whole payload.
pub(crate) fn decode<T: DeserializeOwned>(payload: Payload) -> Result<T, RemoteError> {
    serde_json::from_value(payload).map_err(|e| TransportFailure::Malformed(e.to_string()).into())
}

/// Decodes the list held in `field`, an absent field being an empty list.
pub(crate) fn decode_field<T: DeserializeOwned>(
    mut payload: Payload,
    field: &str,
) -> Result<Vec<T>, RemoteError> {
    match payload.get_mut(field).map(Payload::take) {
        None | Some(Payload::Null) => Ok(Vec::new()),
        Some(list) => decode(list),
    }
}
