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

//! Recording list and download.
//!
//! Recordings can be hundreds of megabytes, so downloads are streamed to disk
//! in fixed size chunks and progress is reported after every chunk. A download
//! that fails part way leaves no file behind.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Read, Write},
    path::Path,
};

use crate::{
    api::{
        ApiClient, ApiCommand, Endpoint, RemoteApi, RemoteError, Session, TransportFailure, client::parse_envelope,
    },
    model::Recording,
    services::{DownloadError, decode_field, snapshot::content_type, unexpected_success},
};

const RECORDING_API: &str = "SYNO.SurveillanceStation.Recording";

const LIST_LIMIT: i64 = 50;

const CHUNK_SIZE: usize = 1024 * 1024;

/// Lists the most recent recordings.
pub(crate) fn list(api: &impl RemoteApi, session: &Session) -> Result<Vec<Recording>, RemoteError> {
    let command = ApiCommand::new(Endpoint::Camera, RECORDING_API, "List", 6).param("limit", LIST_LIMIT);
    decode_field(api.execute(&command, session)?, "recordings")
}

fn is_video(content_type: &str) -> bool {
    content_type.contains("video") || content_type.contains("octet-stream")
}

/// Copies `reader` to `writer` chunk by chunk, calling `progress` with the
/// bytes copied so far and the expected total.
///
/// A failed read is a transport failure, a failed write an I/O error.
pub(crate) fn copy_with_progress(
    reader: &mut impl Read,
    writer: &mut impl Write,
    total: Option<u64>,
    mut progress: impl FnMut(u64, Option<u64>),
) -> Result<u64, DownloadError> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut copied = 0u64;
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(RemoteError::from(TransportFailure::from(e)).into()),
        };
        writer.write_all(&buf[..n])?;
        copied += n as u64;
        progress(copied, total);
    }
    writer.flush()?;
    Ok(copied)
}

/// Writes `reader` to a new file at `path`, removing the file again if the
/// copy fails.
fn save(
    reader: &mut impl Read,
    path: &Path,
    total: Option<u64>,
    progress: impl FnMut(u64, Option<u64>),
) -> Result<u64, DownloadError> {
    let file = File::create(path)?;
    let res = copy_with_progress(reader, &mut BufWriter::new(file), total, progress);

    if let Err(e) = &res {
        tracing::warn!(path = %path.display(), error = %e, "Download failed, removing partial file");
        if let Err(e) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial file");
        }
    }
    res
}

/// Streams a recording to `path`, returning the number of bytes written.
pub(crate) fn download(
    client: &ApiClient,
    session: &Session,
    recording_id: &str,
    path: &Path,
    progress: impl FnMut(u64, Option<u64>),
) -> Result<u64, DownloadError> {
    let command = ApiCommand::new(Endpoint::Camera, RECORDING_API, "Download", 6).param("id", recording_id);
    let file_name = path.file_name().and_then(|n| n.to_str());
    let mut response = client.fetch(&command, session, file_name)?;

    let content_type = content_type(response.headers());
    if !is_video(&content_type) {
        let body = response.bytes().map_err(RemoteError::from)?;
        parse_envelope(&body)?;
        return Err(unexpected_success(&content_type));
    }

    let total = response.content_length().filter(|len| *len > 0);
    let written = save(&mut response, path, total, progress)?;

    tracing::info!(recording_id, path = %path.display(), written, "Recording downloaded");
    Ok(written)
}
