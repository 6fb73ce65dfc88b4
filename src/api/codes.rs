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

//! Descriptions for the error codes returned in failure envelopes.
//!
//! Codes below 400 are shared by every Web API. Codes from 400 upwards are
//! API specific, only the authentication ones are stable enough to name.

/// Describes a code common to all APIs.
pub(crate) fn describe(code: i64) -> &'static str {
    match code {
        100 => "unknown error",
        101 => "invalid parameter",
        102 => "requested API does not exist",
        103 => "requested method does not exist",
        104 => "requested version does not support the functionality",
        105 => "insufficient user privilege",
        106 => "session timeout",
        107 => "session interrupted by duplicate login",
        119 => "session id not found",
        _ => "unrecognized code",
    }
}

/// Describes a code returned by the authentication API.
pub(crate) fn describe_auth(code: i64) -> &'static str {
    match code {
        400 => "no such account or incorrect password",
        401 => "account disabled",
        402 => "permission denied",
        403 => "2-step verification code required",
        404 => "failed to authenticate 2-step verification code",
        _ => describe(code),
    }
}
