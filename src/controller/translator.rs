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

//! Translation of key events into motion intents.
//!
//! The translator tracks whether anything is moving, not which key is held:
//! releasing any movement key stops the active direction, even if a
//! different key started it.
//!
//! Each transition is decided inside a single lock scope on the shared
//! [`ControllerState`]. The remote call is made after the lock is released,
//! so a slow server never blocks the state, but the state change always
//! happens before the call and is never rolled back on failure.

use std::sync::{Mutex, mpsc::Sender};

use crate::controller::{
    ControllerEvent, MotionReport,
    input::KeyHandler,
    keymap::{self, KeyAction, KeyIdentity},
    motion::MotionSink,
    state::{ControllerState, MotionIntent, lock_state},
};

/// Sends one intent and reports the outcome. Failures are logged and
/// reported, never propagated.
pub(crate) fn dispatch<S: MotionSink + ?Sized>(
    sink: &S,
    events: &Sender<ControllerEvent>,
    intent: MotionIntent,
    cleanup: bool,
) {
    let outcome = sink.send(intent);

    match &outcome {
        Ok(()) => tracing::info!(%intent, cleanup, "PTZ move sent"),
        Err(e) => tracing::warn!(%intent, cleanup, category = e.category(), error = %e, "PTZ move failed"),
    }

    // The receiver may already be gone while the screen is shutting down.
    let _ = events.send(ControllerEvent::Motion(MotionReport {
        intent,
        outcome,
        cleanup,
    }));
}

/// The [`KeyHandler`] driving the controller state.
pub(crate) struct InputTranslator<'a, S: ?Sized> {
    state: &'a Mutex<ControllerState>,
    sink: &'a S,
    events: &'a Sender<ControllerEvent>,
}

impl<'a, S: MotionSink + ?Sized> InputTranslator<'a, S> {
    pub(crate) fn new(state: &'a Mutex<ControllerState>, sink: &'a S, events: &'a Sender<ControllerEvent>) -> Self {
        Self { state, sink, events }
    }

    fn release_active(&self) {
        let intent = lock_state(self.state).release();
        if let Some(intent) = intent {
            dispatch(self.sink, self.events, intent, false);
        }
    }
}

impl<S: MotionSink + ?Sized> KeyHandler for InputTranslator<'_, S> {
    fn on_key_down(&mut self, key: KeyIdentity) {
        let Some(direction) = keymap::direction_for(key) else {
            return;
        };

        let intent = lock_state(self.state).begin(direction);
        if let Some(intent) = intent {
            dispatch(self.sink, self.events, intent, false);
        }
    }

    fn on_key_up(&mut self, key: KeyIdentity) -> bool {
        match keymap::resolve(key) {
            None => true,
            Some(KeyAction::Move(_)) => {
                self.release_active();
                true
            }
            Some(KeyAction::Exit) => {
                self.release_active();
                tracing::debug!("Exit key released");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::{
        api::RemoteError,
        controller::{
            keymap::NamedKey,
            state::Direction,
            tests::{Recorder, motions},
        },
    };

    const W: KeyIdentity = KeyIdentity::Char('w');
    const S: KeyIdentity = KeyIdentity::Char('s');
    const UP: KeyIdentity = KeyIdentity::Named(NamedKey::Up);
    const DOWN: KeyIdentity = KeyIdentity::Named(NamedKey::Down);
    const LEFT: KeyIdentity = KeyIdentity::Named(NamedKey::Left);
    const ESC: KeyIdentity = KeyIdentity::Named(NamedKey::Esc);

    fn start(d: Direction) -> MotionIntent {
        MotionIntent::start(d)
    }

    fn stop(d: Direction) -> MotionIntent {
        MotionIntent::stop(d)
    }

    #[test]
    fn repeated_key_down_emits_once() {
        let state = Mutex::new(ControllerState::new());
        let sink = Recorder::default();
        let (tx, _rx) = mpsc::channel();
        let mut translator = InputTranslator::new(&state, &sink, &tx);

        translator.on_key_down(W);
        translator.on_key_down(W);
        translator.on_key_down(UP);

        assert_eq!(sink.sent(), vec![start(Direction::Up)]);
    }

    #[test]
    fn releasing_other_key_stops_active_direction() {
        let state = Mutex::new(ControllerState::new());
        let sink = Recorder::default();
        let (tx, _rx) = mpsc::channel();
        let mut translator = InputTranslator::new(&state, &sink, &tx);

        translator.on_key_down(UP);
        assert!(translator.on_key_up(DOWN));

        assert_eq!(sink.sent(), vec![start(Direction::Up), stop(Direction::Up)]);
        assert_eq!(state.lock().unwrap().active_direction(), None);
    }

    #[test]
    fn key_up_with_nothing_active_is_silent() {
        let state = Mutex::new(ControllerState::new());
        let sink = Recorder::default();
        let (tx, _rx) = mpsc::channel();
        let mut translator = InputTranslator::new(&state, &sink, &tx);

        assert!(translator.on_key_up(W));
        assert!(sink.sent().is_empty());
    }

    #[test]
    fn exit_key_stops_then_ends() {
        let state = Mutex::new(ControllerState::new());
        let sink = Recorder::default();
        let (tx, _rx) = mpsc::channel();
        let mut translator = InputTranslator::new(&state, &sink, &tx);

        translator.on_key_down(LEFT);
        assert!(!translator.on_key_up(ESC));

        assert_eq!(sink.sent(), vec![start(Direction::Left), stop(Direction::Left)]);
    }

    #[test]
    fn exit_key_down_does_nothing() {
        let state = Mutex::new(ControllerState::new());
        let sink = Recorder::default();
        let (tx, _rx) = mpsc::channel();
        let mut translator = InputTranslator::new(&state, &sink, &tx);

        translator.on_key_down(ESC);
        assert!(sink.sent().is_empty());
    }

    #[test]
    fn failed_stop_still_clears_state() {
        let state = Mutex::new(ControllerState::new());
        let sink = Recorder::failing(RemoteError::Rejected { code: 400 });
        let (tx, rx) = mpsc::channel();
        let mut translator = InputTranslator::new(&state, &sink, &tx);

        translator.on_key_down(S);
        assert_eq!(state.lock().unwrap().active_direction(), Some(Direction::Down));
        translator.on_key_up(S);
        assert_eq!(state.lock().unwrap().active_direction(), None);

        drop(translator);
        drop(tx);
        let reports = motions(&rx);
        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.outcome.is_err() && !r.cleanup));
    }

    #[test]
    fn unbound_keys_change_nothing() {
        let state = Mutex::new(ControllerState::new());
        let sink = Recorder::default();
        let (tx, _rx) = mpsc::channel();
        let mut translator = InputTranslator::new(&state, &sink, &tx);

        translator.on_key_down(KeyIdentity::Char('x'));
        assert!(translator.on_key_up(KeyIdentity::Char('x')));
        translator.on_key_down(KeyIdentity::Named(NamedKey::Enter));
        assert!(translator.on_key_up(KeyIdentity::Named(NamedKey::Tab)));

        assert!(sink.sent().is_empty());
        assert_eq!(*state.lock().unwrap(), ControllerState::new());
    }

    #[test]
    fn mixed_sequence_emits_in_order() {
        let state = Mutex::new(ControllerState::new());
        let sink = Recorder::default();
        let (tx, _rx) = mpsc::channel();
        let mut translator = InputTranslator::new(&state, &sink, &tx);

        translator.on_key_down(W);
        translator.on_key_down(W);
        translator.on_key_up(W);
        translator.on_key_down(UP);
        translator.on_key_down(S);
        translator.on_key_up(UP);
        translator.on_key_up(S);
        let keep_going = translator.on_key_up(ESC);

        assert!(!keep_going);
        assert_eq!(
            sink.sent(),
            vec![
                start(Direction::Up),
                stop(Direction::Up),
                start(Direction::Up),
                start(Direction::Down),
                stop(Direction::Down),
            ]
        );
    }
}
