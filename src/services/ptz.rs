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

//! Pan-tilt-zoom commands.

use crate::{
    api::{ApiCommand, Endpoint, RemoteApi, RemoteError, Session},
    controller::MotionIntent,
    model::Preset,
    services::decode_field,
};

const PTZ_API: &str = "SYNO.SurveillanceStation.PTZ";

/// Speed used for every continuous move.
pub(crate) const MOVE_SPEED: i64 = 3;

/// Builds the continuous `Move` command for a motion intent.
pub(crate) fn move_command(camera_id: i64, intent: MotionIntent) -> ApiCommand {
    ApiCommand::new(Endpoint::Camera, PTZ_API, "Move", 3)
        .param("cameraId", camera_id)
        .param("direction", intent.direction.wire_name())
        .param("speed", MOVE_SPEED)
        .param("moveType", intent.phase.wire_name())
}

/// Lists the presets stored for a camera.
pub(crate) fn list_presets(
    api: &impl RemoteApi,
    session: &Session,
    camera_id: i64,
) -> Result<Vec<Preset>, RemoteError> {
    let command = ApiCommand::new(Endpoint::Camera, PTZ_API, "ListPreset", 1).param("cameraId", camera_id);
    let payload = api.execute(&command, session)?;
    decode_field(payload, "presets")
}
