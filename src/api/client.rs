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

//! Blocking HTTP client for the Web API.
//!
//! Requests are plain `GET`s carrying the command as query parameters, the
//! only exception being snapshot uploads which are `POST`ed as a form. Every
//! JSON response is wrapped in an envelope:
//!
//! ```text
//! { "success": true,  "data": { ... } }
//! { "success": false, "error": { "code": 105 } }
//! ```
//!
//! Uploads and downloads go through a second client whose timeout is the
//! transfer timeout. The blocking client applies it to every wait on its own,
//! connecting and each read of the body alike, so a long transfer that keeps
//! making progress is never cut short.

use reqwest::blocking::{Client, Response};
use serde::Deserialize;

use crate::{
    api::{ApiCommand, Endpoint, Payload, RemoteApi, RemoteError, Session, TransportFailure},
    config::AppConfig,
};

/// A handle to the remote Web API.
///
/// Cloning is cheap, the underlying connection pool is shared.
#[derive(Clone, Debug)]
pub(crate) struct ApiClient {
    http: Client,
    base_url: String,
    auth_path: String,
    camera_path: String,
    info_path: String,
    transfer: Client,
}

#[derive(Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Payload>,
    #[serde(default)]
    error: Option<ErrorBody>,
}

#[derive(Deserialize)]
struct ErrorBody {
    code: i64,
}

impl ApiClient {
    /// Creates a client for the server described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub(crate) fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        let transfer = Client::builder()
            .connect_timeout(config.request_timeout())
            .timeout(config.transfer_timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            auth_path: config.auth_api_path.clone(),
            camera_path: config.camera_api_path.clone(),
            info_path: config.info_api_path.clone(),
            transfer,
        })
    }

    pub(crate) fn url(&self, endpoint: Endpoint) -> String {
        let path = match endpoint {
            Endpoint::Auth => &self.auth_path,
            Endpoint::Camera => &self.camera_path,
            Endpoint::Info => &self.info_path,
        };
        format!("{}{}", self.base_url, path)
    }

    /// Sends a command and unwraps the response envelope.
    ///
    /// `session` is `None` only for the login call itself.
    pub(crate) fn call(&self, command: &ApiCommand, session: Option<&Session>) -> Result<Payload, RemoteError> {
        tracing::debug!(command = %command.name(), "Sending request");

        let response = self
            .http
            .get(self.url(command.endpoint))
            .query(&command.query(session))
            .send()?
            .error_for_status()?;

        let body = response.bytes()?;
        parse_envelope(&body)
    }

    /// Sends a command with a form body over the transfer client.
    pub(crate) fn post_form(
        &self,
        command: &ApiCommand,
        session: &Session,
        form: &[(&str, String)],
    ) -> Result<Payload, RemoteError> {
        tracing::debug!(command = %command.name(), "Posting form");

        let response = self
            .transfer
            .post(self.url(command.endpoint))
            .query(&command.query(Some(session)))
            .form(form)
            .send()?
            .error_for_status()?;

        let body = response.bytes()?;
        parse_envelope(&body)
    }

    /// Sends a command whose response is a file rather than an envelope.
    ///
    /// The caller inspects the content type and reads the body; failures are
    /// still reported by the server as a JSON envelope, see
    /// [`parse_envelope`]. Reads of the body time out only when the server
    /// stalls for the whole transfer timeout. `file_name` is appended to the endpoint path, which
    /// some download methods use to name the file.
    pub(crate) fn fetch(
        &self,
        command: &ApiCommand,
        session: &Session,
        file_name: Option<&str>,
    ) -> Result<Response, RemoteError> {
        tracing::debug!(command = %command.name(), "Fetching file");

        let mut url = self.url(command.endpoint);
        if let Some(name) = file_name {
            url.push('/');
            url.push_str(name);
        }

        let response = self
            .transfer
            .get(url)
            .query(&command.query(Some(session)))
            .send()?
            .error_for_status()?;
        Ok(response)
    }
}

impl RemoteApi for ApiClient {
    fn execute(&self, command: &ApiCommand, session: &Session) -> Result<Payload, RemoteError> {
        self.call(command, Some(session))
    }
}

/// Decodes a response envelope into its payload or the remote error code.
pub(crate) fn parse_envelope(body: &[u8]) -> Result<Payload, RemoteError> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| TransportFailure::Malformed(e.to_string()))?;

    if envelope.success {
        return Ok(envelope.data.unwrap_or(Payload::Null));
    }

    match envelope.error {
        Some(error) => Err(RemoteError::Rejected { code: error.code }),
        None => Err(TransportFailure::Malformed("failure without an error code".to_string()).into()),
    }
}
