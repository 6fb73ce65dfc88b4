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

//! Surveillance Station Web API access.
//!
//! Every remote operation is described by an [`ApiCommand`] and executed
//! through the [`RemoteApi`] trait, which either yields the `data` member of a
//! successful response envelope or a classified [`RemoteError`].
//!
//! # Organization
//!
//! * [`client`]: The HTTP implementation built on `reqwest`.
//! * [`codes`]: Human readable descriptions of remote error codes.
//! * [`error`]: The remote error taxonomy.
//! * [`session`]: Login and logout of the session token.

pub(crate) mod client;
pub(crate) mod codes;
pub(crate) mod error;
pub(crate) mod session;

use std::fmt;

pub(crate) use client::ApiClient;
pub(crate) use error::{RemoteError, TransportFailure};
pub(crate) use session::Session;

/// The `data` member of a successful response.
pub(crate) type Payload = serde_json::Value;

/// The CGI endpoint a command is sent to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Endpoint {
    Auth,
    Camera,
    Info,
}

/// A single query parameter value.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ParamValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(text) => f.write_str(text),
            ParamValue::Int(value) => write!(f, "{}", value),
            ParamValue::Bool(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

/// A named remote command together with its parameters.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ApiCommand {
    pub(crate) endpoint: Endpoint,
    pub(crate) api: &'static str,
    pub(crate) method: &'static str,
    pub(crate) version: u32,
    pub(crate) params: Vec<(&'static str, ParamValue)>,
}

impl ApiCommand {
    pub(crate) fn new(endpoint: Endpoint, api: &'static str, method: &'static str, version: u32) -> Self {
        Self {
            endpoint,
            api,
            method,
            version,
            params: Vec::new(),
        }
    }

    /// Appends a parameter, builder style.
    pub(crate) fn param(mut self, key: &'static str, value: impl Into<ParamValue>) -> Self {
        self.params.push((key, value.into()));
        self
    }

    /// Looks up a parameter by key.
    pub(crate) fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// The command name used in reports, e.g. `SYNO.SurveillanceStation.PTZ.Move`.
    pub(crate) fn name(&self) -> String {
        format!("{}.{}", self.api, self.method)
    }

    /// Builds the full query string pairs, with the session id when given.
    pub(crate) fn query(&self, session: Option<&Session>) -> Vec<(String, String)> {
        let mut query = vec![
            ("api".to_string(), self.api.to_string()),
            ("method".to_string(), self.method.to_string()),
            ("version".to_string(), self.version.to_string()),
        ];
        if let Some(session) = session {
            query.push(("_sid".to_string(), session.token().to_string()));
        }
        query.extend(self.params.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        query
    }
}

/// Executes commands against the remote side within an authenticated session.
///
/// Implementations make exactly one attempt per call; there are no retries.
pub(crate) trait RemoteApi {
    fn execute(&self, command: &ApiCommand, session: &Session) -> Result<Payload, RemoteError>;
}

impl<T: RemoteApi + ?Sized> RemoteApi for &T {
    fn execute(&self, command: &ApiCommand, session: &Session) -> Result<Payload, RemoteError> {
        (**self).execute(command, session)
    }
}
