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

//! Snapshot capture, storage, download and deletion.

use std::path::Path;

use serde::Deserialize;
use serde_json::json;

use crate::{
    api::{ApiClient, ApiCommand, Endpoint, RemoteApi, RemoteError, Session, client::parse_envelope},
    model::{SnapshotCapture, SnapshotInfo},
    services::{DownloadError, decode, unexpected_success},
};

const SNAPSHOT_API: &str = "SYNO.SurveillanceStation.SnapShot";

/// Bodies at least this large are treated as image data even without an
/// image content type.
const MIN_IMAGE_BYTES: usize = 1000;

#[derive(Deserialize, Default)]
#[serde(default)]
struct SnapshotList {
    total: i64,
    data: Vec<SnapshotInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedSnapshot {
    snapshot_id: i64,
}

/// Captures a snapshot without storing it on the server.
pub(crate) fn take(
    api: &impl RemoteApi,
    session: &Session,
    camera_id: i64,
    ds_id: i64,
) -> Result<SnapshotCapture, RemoteError> {
    let command = ApiCommand::new(Endpoint::Camera, SNAPSHOT_API, "TakeSnapshot", 1)
        .param("camId", camera_id)
        .param("dsId", ds_id)
        .param("blSave", false);
    decode(api.execute(&command, session)?)
}

fn save_form(capture: &SnapshotCapture) -> Vec<(&'static str, String)> {
    vec![
        ("camName", capture.cam_name.clone()),
        ("createdTm", capture.created_tm.to_string()),
        ("width", capture.width.to_string()),
        ("height", capture.height.to_string()),
        ("byteSize", capture.byte_size.to_string()),
        ("imageData", capture.image_data.clone()),
    ]
}

/// Stores a previously captured snapshot, returning its new id.
pub(crate) fn save(client: &ApiClient, session: &Session, capture: &SnapshotCapture) -> Result<i64, RemoteError> {
    let command = ApiCommand::new(Endpoint::Camera, SNAPSHOT_API, "Save", 1);
    let saved: SavedSnapshot = decode(client.post_form(&command, session, &save_form(capture))?)?;
    tracing::info!(snapshot_id = saved.snapshot_id, "Snapshot saved");
    Ok(saved.snapshot_id)
}

/// Lists the stored snapshots of a camera with the server's total count.
pub(crate) fn list(
    api: &impl RemoteApi,
    session: &Session,
    camera_id: i64,
) -> Result<(i64, Vec<SnapshotInfo>), RemoteError> {
    let command = ApiCommand::new(Endpoint::Camera, SNAPSHOT_API, "List", 1)
        .param("start", 0i64)
        .param("limit", 0i64)
        .param("from", 0i64)
        .param("to", 0i64)
        .param("blIncludeRecCnt", false)
        .param("blIncludeAuInfo", false)
        .param("camId", camera_id);
    let list: SnapshotList = match api.execute(&command, session)? {
        serde_json::Value::Null => SnapshotList::default(),
        payload => decode(payload)?,
    };
    Ok((list.total, list.data))
}

/// Decides whether a download response carries the image.
fn is_image(content_type: &str, body: &[u8]) -> bool {
    content_type.contains("image") || body.len() > MIN_IMAGE_BYTES
}

/// Writes a downloaded body to `path`, or decodes the error envelope the
/// server sends instead of an image.
fn store_image(content_type: &str, body: &[u8], path: &Path) -> Result<usize, DownloadError> {
    if !is_image(content_type, body) {
        parse_envelope(body)?;
        return Err(unexpected_success(content_type));
    }
    std::fs::write(path, body)?;
    Ok(body.len())
}

/// Downloads a stored snapshot to `path`, returning the number of bytes.
pub(crate) fn download(
    client: &ApiClient,
    session: &Session,
    snapshot_id: i64,
    path: &Path,
) -> Result<usize, DownloadError> {
    let command = ApiCommand::new(Endpoint::Camera, SNAPSHOT_API, "Download", 1).param("id", snapshot_id);
    let response = client.fetch(&command, session, None)?;

    let content_type = content_type(response.headers());
    let body = response.bytes().map_err(RemoteError::from)?;

    let written = store_image(&content_type, &body, path)?;
    tracing::info!(snapshot_id, path = %path.display(), written, "Snapshot downloaded");
    Ok(written)
}

pub(crate) fn content_type(headers: &reqwest::header::HeaderMap) -> String {
    headers
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

fn delete_list(ids: &[i64]) -> String {
    let objects: Vec<serde_json::Value> = ids.iter().map(|id| json!({ "id": format!("0:{}", id) })).collect();
    serde_json::Value::Array(objects).to_string()
}

/// Deletes stored snapshots by id.
pub(crate) fn delete(api: &impl RemoteApi, session: &Session, ids: &[i64]) -> Result<(), RemoteError> {
    let command = ApiCommand::new(Endpoint::Camera, SNAPSHOT_API, "Delete", 1).param("objList", delete_list(ids));
    api.execute(&command, session)?;
    tracing::info!(count = ids.len(), "Snapshots deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::ParamValue,
        services::tests::{Canned, session},
    };

    #[test]
    fn take_requests_unsaved_snapshot() {
        let api = Canned::ok(json!({
            "camName": "Gate", "createdTm": 1700000000, "width": 1920, "height": 1080,
            "byteSize": 12345, "imageData": "/9j/4AAQ"
        }));
        let capture = take(&api, &session(), 3, 0).unwrap();
        assert_eq!(capture.cam_name, "Gate");
        assert_eq!(capture.width, 1920);
        assert_eq!(api.last().get("blSave"), Some(&ParamValue::Bool(false)));
    }

    #[test]
    fn save_form_carries_capture_fields() {
        let capture = SnapshotCapture {
            cam_name: "Gate".into(),
            byte_size: 42,
            image_data: "abc".into(),
            ..SnapshotCapture::default()
        };
        let form = save_form(&capture);
        assert!(form.contains(&("byteSize", "42".to_string())));
        assert!(form.contains(&("imageData", "abc".to_string())));
    }

    #[test]
    fn list_reads_total_and_entries() {
        let api = Canned::ok(json!({
            "total": 2,
            "data": [{"id": 10, "fileName": "a.jpg", "camName": "Gate"}, {"id": 11, "fileName": "b.jpg"}]
        }));
        let (total, snaps) = list(&api, &session(), 3).unwrap();
        assert_eq!(total, 2);
        assert_eq!(snaps[1].file_name, "b.jpg");
    }

    #[test]
    fn delete_list_uses_prefixed_ids() {
        assert_eq!(delete_list(&[4, 9]), r#"[{"id":"0:4"},{"id":"0:9"}]"#);
    }

    #[test]
    fn image_body_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.jpg");
        let written = store_image("image/jpeg", b"\xff\xd8\xff", &path).unwrap();
        assert_eq!(written, 3);
        assert_eq!(std::fs::read(&path).unwrap(), b"\xff\xd8\xff");
    }

    #[test]
    fn large_body_is_treated_as_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.jpg");
        let body = vec![0u8; MIN_IMAGE_BYTES + 1];
        assert_eq!(store_image("application/octet-stream", &body, &path).unwrap(), body.len());
    }

    #[test]
    fn error_envelope_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snap.jpg");
        let body = br#"{"success": false, "error": {"code": 400}}"#;
        let err = store_image("application/json", body, &path).unwrap_err();
        assert!(matches!(
            err,
            DownloadError::Remote(RemoteError::Rejected { code: 400 })
        ));
        assert!(!path.exists());
    }
}
