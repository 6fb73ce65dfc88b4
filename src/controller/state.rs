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

//! Directional control state.
//!
//! The controller only ever tracks a single active direction. All transitions
//! go through [`ControllerState::begin`] and [`ControllerState::release`],
//! which decide whether a motion intent must be emitted.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, PoisonError},
};

/// One of the four movement directions of the pan-tilt head.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The name used by the remote `Move` method.
    pub(crate) fn wire_name(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Start,
    Stop,
}

impl Phase {
    /// The `moveType` value sent to the remote `Move` method.
    pub(crate) fn wire_name(self) -> &'static str {
        match self {
            Phase::Start => "Start",
            Phase::Stop => "Stop",
        }
    }
}

/// A request to start or stop moving in a given direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct MotionIntent {
    pub(crate) direction: Direction,
    pub(crate) phase: Phase,
}

impl MotionIntent {
    pub(crate) fn start(direction: Direction) -> Self {
        Self {
            direction,
            phase: Phase::Start,
        }
    }

    pub(crate) fn stop(direction: Direction) -> Self {
        Self {
            direction,
            phase: Phase::Stop,
        }
    }
}

impl fmt::Display for MotionIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.phase.wire_name(), self.direction)
    }
}

/// Which direction, if any, is currently commanded active.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(crate) struct ControllerState {
    active_direction: Option<Direction>,
}

impl ControllerState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn active_direction(&self) -> Option<Direction> {
        self.active_direction
    }

    /// Marks `direction` as active.
    ///
    /// Returns the Start intent to emit, or `None` when the direction is
    /// already active (held keys auto-repeat). A different direction simply
    /// replaces the active one, no Stop is produced for the old direction.
    pub(crate) fn begin(&mut self, direction: Direction) -> Option<MotionIntent> {
        if self.active_direction == Some(direction) {
            return None;
        }
        self.active_direction = Some(direction);
        Some(MotionIntent::start(direction))
    }

    /// Clears whatever direction is active, returning the Stop intent for it.
    pub(crate) fn release(&mut self) -> Option<MotionIntent> {
        self.active_direction.take().map(MotionIntent::stop)
    }
}

/// Locks the state, recovering it if a previous holder panicked.
///
/// The state is a single `Option`, so it can never be observed half-updated
/// and the release-on-exit path must keep working after a listener panic.
pub(crate) fn lock_state(state: &Mutex<ControllerState>) -> MutexGuard<'_, ControllerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_emits_start_for_new_direction() {
        let mut state = ControllerState::new();
        assert_eq!(state.begin(Direction::Up), Some(MotionIntent::start(Direction::Up)));
        assert_eq!(state.active_direction(), Some(Direction::Up));
    }

    #[test]
    fn begin_same_direction_is_suppressed() {
        let mut state = ControllerState::new();
        state.begin(Direction::Left);
        assert_eq!(state.begin(Direction::Left), None);
        assert_eq!(state.active_direction(), Some(Direction::Left));
    }

    #[test]
    fn begin_other_direction_overwrites_without_stop() {
        let mut state = ControllerState::new();
        state.begin(Direction::Up);
        assert_eq!(
            state.begin(Direction::Down),
            Some(MotionIntent::start(Direction::Down))
        );
        assert_eq!(state.active_direction(), Some(Direction::Down));
    }

    #[test]
    fn release_clears_and_is_idempotent() {
        let mut state = ControllerState::new();
        state.begin(Direction::Right);
        assert_eq!(state.release(), Some(MotionIntent::stop(Direction::Right)));
        assert_eq!(state.active_direction(), None);
        assert_eq!(state.release(), None);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let state = std::sync::Arc::new(Mutex::new(ControllerState::new()));
        let cloned = state.clone();
        let _ = std::thread::spawn(move || {
            let mut guard = cloned.lock().unwrap();
            guard.begin(Direction::Up);
            panic!("listener died");
        })
        .join();

        assert!(state.is_poisoned());
        assert_eq!(lock_state(&state).release(), Some(MotionIntent::stop(Direction::Up)));
    }

    #[test]
    fn wire_names() {
        assert_eq!(MotionIntent::start(Direction::Left).to_string(), "Start(left)");
        assert_eq!(Phase::Stop.wire_name(), "Stop");
    }
}
