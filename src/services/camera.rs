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

//! Camera queries and management.

use crate::{
    api::{ApiCommand, Endpoint, RemoteApi, RemoteError, Session},
    model::{Camera, Capability, LivePath},
    services::{decode, decode_field},
};

const CAMERA_API: &str = "SYNO.SurveillanceStation.Camera";

pub(crate) fn list_cameras(api: &impl RemoteApi, session: &Session) -> Result<Vec<Camera>, RemoteError> {
    let command = ApiCommand::new(Endpoint::Camera, CAMERA_API, "List", 9)
        .param("privCamType", 0i64)
        .param("camStm", 0i64)
        .param("basic", true);
    let payload = api.execute(&command, session)?;
    decode_field(payload, "cameras")
}

pub(crate) fn capability(
    api: &impl RemoteApi,
    session: &Session,
    camera_id: i64,
) -> Result<Capability, RemoteError> {
    let command =
        ApiCommand::new(Endpoint::Camera, CAMERA_API, "GetCapabilityByCamId", 8).param("cameraId", camera_id);
    decode(api.execute(&command, session)?)
}

/// Fetches the streaming paths of a camera, `None` if the server has none.
pub(crate) fn live_path(
    api: &impl RemoteApi,
    session: &Session,
    camera_id: i64,
) -> Result<Option<LivePath>, RemoteError> {
    let command = ApiCommand::new(Endpoint::Camera, CAMERA_API, "GetLiveViewPath", 9)
        .param("idList", camera_id.to_string());
    let paths: Vec<LivePath> = match api.execute(&command, session)? {
        serde_json::Value::Null => Vec::new(),
        payload => decode(payload)?,
    };
    Ok(paths.into_iter().next())
}

pub(crate) fn set_enabled(
    api: &impl RemoteApi,
    session: &Session,
    camera_id: i64,
    enabled: bool,
) -> Result<(), RemoteError> {
    let method = if enabled { "Enable" } else { "Disable" };
    let command = ApiCommand::new(Endpoint::Camera, CAMERA_API, method, 9).param("idList", camera_id.to_string());
    api.execute(&command, session)?;
    tracing::info!(camera_id, enabled, "Camera state changed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        api::ParamValue,
        services::tests::{Canned, session},
    };

    #[test]
    fn list_decodes_cameras() {
        let api = Canned::ok(json!({"cameras": [{"id": 1, "dsId": 0, "model": "C200"}], "total": 1}));
        let cameras = list_cameras(&api, &session()).unwrap();
        assert_eq!(cameras.len(), 1);
        assert_eq!(cameras[0].model, "C200");
        assert_eq!(api.last().get("basic"), Some(&ParamValue::Bool(true)));
    }

    #[test]
    fn live_path_takes_first_entry() {
        let api = Canned::ok(json!([{"id": 5, "rtspPath": "rtsp://nas/5"}]));
        let path = live_path(&api, &session(), 5).unwrap().unwrap();
        assert_eq!(path.rtsp_path, "rtsp://nas/5");
        assert_eq!(api.last().get("idList"), Some(&ParamValue::Text("5".into())));
    }

    #[test]
    fn live_path_empty_is_none() {
        let api = Canned::ok(json!([]));
        assert!(live_path(&api, &session(), 5).unwrap().is_none());
    }

    #[test]
    fn disable_uses_disable_method() {
        let api = Canned::ok(serde_json::Value::Null);
        set_enabled(&api, &session(), 2, false).unwrap();
        assert_eq!(api.last().method, "Disable");
    }

    #[test]
    fn rejection_propagates() {
        let api = Canned::err(RemoteError::Rejected { code: 105 });
        assert_eq!(
            capability(&api, &session(), 1).unwrap_err(),
            RemoteError::Rejected { code: 105 }
        );
    }
}
