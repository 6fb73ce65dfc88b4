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

//! Delivery of motion intents to the remote actuator.

use crate::{
    api::{RemoteApi, RemoteError, Session},
    controller::state::MotionIntent,
    services::ptz,
};

/// Somewhere motion intents are sent.
pub(crate) trait MotionSink {
    fn send(&self, intent: MotionIntent) -> Result<(), RemoteError>;
}

/// Sends intents as PTZ `Move` commands for one camera, borrowing an already
/// authenticated session.
pub(crate) struct PtzMotion<A> {
    api: A,
    session: Session,
    camera_id: i64,
}

impl<A: RemoteApi> PtzMotion<A> {
    pub(crate) fn new(api: A, session: Session, camera_id: i64) -> Self {
        Self {
            api,
            session,
            camera_id,
        }
    }
}

impl<A: RemoteApi> MotionSink for PtzMotion<A> {
    fn send(&self, intent: MotionIntent) -> Result<(), RemoteError> {
        let command = ptz::move_command(self.camera_id, intent);
        self.api.execute(&command, &self.session)?;
        Ok(())
    }
}
