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

//! API discovery.

use crate::api::{ApiCommand, Endpoint, Payload, RemoteApi, RemoteError, Session};

/// The APIs this client depends on.
const QUERIED_APIS: [&str; 6] = [
    "SYNO.SurveillanceStation.Info",
    "SYNO.SurveillanceStation.PTZ",
    "SYNO.SurveillanceStation.Camera",
    "SYNO.SurveillanceStation.SnapShot",
    "SYNO.SurveillanceStation.Recording",
    "SYNO.SurveillanceStation.Auth",
];

/// Asks the server which versions and paths it offers for the APIs in use.
pub(crate) fn query_apis(api: &impl RemoteApi, session: &Session) -> Result<Payload, RemoteError> {
    let command =
        ApiCommand::new(Endpoint::Info, "SYNO.API.Info", "Query", 1).param("query", QUERIED_APIS.join(","));
    api.execute(&command, session)
}
