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

//! Session management.
//!
//! A [`Session`] is obtained once by [`login`] and attached to every later
//! call. It is only invalidated by [`logout`] or by the server, which the
//! client only notices through failure responses.

use std::fmt;

use serde::Deserialize;

use crate::api::{ApiClient, ApiCommand, Endpoint, RemoteError, TransportFailure};

const AUTH_API: &str = "SYNO.API.Auth";
const AUTH_VERSION: u32 = 7;
const SESSION_NAME: &str = "SurveillanceStation";

/// An opaque session token.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Session {
    sid: String,
}

impl Session {
    pub(crate) fn new(sid: impl Into<String>) -> Self {
        Self { sid: sid.into() }
    }

    pub(crate) fn token(&self) -> &str {
        &self.sid
    }
}

// Never leak the token into logs.
impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("sid", &"<redacted>").finish()
    }
}

#[derive(Deserialize)]
struct LoginData {
    sid: String,
}

pub(crate) fn login_command(account: &str, password: &str) -> ApiCommand {
    ApiCommand::new(Endpoint::Auth, AUTH_API, "login", AUTH_VERSION)
        .param("account", account)
        .param("passwd", password)
        .param("session", SESSION_NAME)
        .param("format", "sid")
}

pub(crate) fn logout_command() -> ApiCommand {
    ApiCommand::new(Endpoint::Auth, AUTH_API, "logout", AUTH_VERSION).param("session", SESSION_NAME)
}

/// Authenticates and returns a new session.
pub(crate) fn login(client: &ApiClient, account: &str, password: &str) -> Result<Session, RemoteError> {
    let payload = client.call(&login_command(account, password), None)?;
    let data: LoginData = serde_json::from_value(payload)
        .map_err(|e| TransportFailure::Malformed(format!("login response: {}", e)))?;

    tracing::info!(account, "Logged in");
    Ok(Session::new(data.sid))
}

/// Closes the session. The token must not be used afterwards.
pub(crate) fn logout(client: &ApiClient, session: Session) -> Result<(), RemoteError> {
    client.call(&logout_command(), Some(&session))?;
    tracing::info!("Logged out");
    Ok(())
}
