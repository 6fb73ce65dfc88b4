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

//! Input source abstraction.

use thiserror::Error;

use crate::controller::keymap::KeyIdentity;

/// Receives key transitions from an [`InputSource`].
pub(crate) trait KeyHandler {
    fn on_key_down(&mut self, key: KeyIdentity);

    /// Returns `false` to end the subscription.
    fn on_key_up(&mut self, key: KeyIdentity) -> bool;
}

/// How a subscription ended without error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ListenEnd {
    /// The handler asked to stop.
    Stopped,
    /// The user interrupted the process (Ctrl-C or a shutdown signal).
    Interrupted,
}

#[derive(Debug, Error)]
pub(crate) enum InputError {
    #[error("failed to prepare input device: {0}")]
    Setup(#[source] std::io::Error),

    #[error("failed to read input: {0}")]
    Read(#[source] std::io::Error),
}

/// A blocking source of key events.
pub(crate) trait InputSource {
    /// Delivers key events to `handler` until it returns `false` from
    /// [`KeyHandler::on_key_up`], the user interrupts, or the source fails.
    fn listen(&mut self, handler: &mut dyn KeyHandler) -> Result<ListenEnd, InputError>;
}
