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

//! Records returned by the Web API.
//!
//! Only the fields the client displays are decoded; everything else in the
//! response is ignored. Missing fields fall back to their defaults because
//! different server versions omit different members.

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Camera {
    pub id: i64,
    pub ds_id: i64,
    pub model: String,
    pub vendor: String,
    pub video_codec: serde_json::Value,
}

/// Support levels reported by `GetCapabilityByCamId`.
///
/// Each value is 0 for unsupported, 1 for step and 2 for continuous.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Capability {
    pub ptz_pan: i64,
    pub ptz_zoom: i64,
    pub audio_out: i64,
}

impl Capability {
    pub(crate) fn describe(level: i64) -> &'static str {
        match level {
            0 => "no",
            1 => "step",
            2 => "continuous",
            _ => "unknown",
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub(crate) struct Preset {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct LivePath {
    pub id: i64,
    pub rtsp_path: String,
    pub rtsp_over_http_path: String,
    pub mjpeg_http_path: String,
    pub mxpeg_http_path: String,
    pub multicst_path: String,
}

/// A snapshot taken but not yet saved on the server.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct SnapshotCapture {
    pub cam_name: String,
    pub created_tm: i64,
    pub width: i64,
    pub height: i64,
    pub byte_size: i64,
    /// Base64 encoded JPEG.
    pub image_data: String,
}

/// A snapshot stored on the server.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct SnapshotInfo {
    pub id: i64,
    pub file_name: String,
    pub cam_name: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct Recording {
    pub id: i64,
    pub camera_id: i64,
    pub start_time: i64,
    pub stop_time: i64,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn camera_decodes_camel_case() {
        let camera: Camera = serde_json::from_value(json!({
            "id": 3, "dsId": 0, "model": "VIGI C540", "vendor": "TP-Link", "videoCodec": 6,
            "status": 1
        }))
        .unwrap();
        assert_eq!(camera.id, 3);
        assert_eq!(camera.model, "VIGI C540");
        assert_eq!(camera.video_codec, json!(6));
    }

    #[test]
    fn live_path_keeps_server_spelling() {
        let path: LivePath = serde_json::from_value(json!({
            "id": 1, "rtspPath": "rtsp://a", "multicstPath": "rtsp://m"
        }))
        .unwrap();
        assert_eq!(path.multicst_path, "rtsp://m");
        assert_eq!(path.mjpeg_http_path, "");
    }

    #[test]
    fn capability_levels() {
        assert_eq!(Capability::describe(2), "continuous");
        assert_eq!(Capability::describe(9), "unknown");
    }
}
