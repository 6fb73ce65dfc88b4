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

//! Terminal keyboard input via `crossterm`.
//!
//! Terminals that support the keyboard enhancement protocol report real key
//! release events. Everywhere else only presses (and auto-repeat presses)
//! arrive, so a release is synthesized once a held direction key has been
//! quiet for the configured release timeout.
//!
//! In raw mode Ctrl-C is delivered as an ordinary key event rather than a
//! signal, and is reported as an interrupt. Signals that still arrive, such
//! as SIGTERM or SIGHUP, are seen through the [`Shutdown`] flag, which is
//! checked at least every [`POLL_INTERVAL`].

use std::{
    io,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled, supports_keyboard_enhancement},
};

use crate::{
    controller::{
        input::{InputError, InputSource, KeyHandler, ListenEnd},
        keymap::{self, KeyIdentity, NamedKey},
    },
    shutdown::Shutdown,
};

/// Longest single wait for input.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A key transition read from the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Transition {
    Down(KeyIdentity),
    Up(KeyIdentity),
    Interrupt,
}

fn key_identity(code: KeyCode) -> KeyIdentity {
    match code {
        KeyCode::Char(c) => KeyIdentity::Char(c),
        KeyCode::Up => KeyIdentity::Named(NamedKey::Up),
        KeyCode::Down => KeyIdentity::Named(NamedKey::Down),
        KeyCode::Left => KeyIdentity::Named(NamedKey::Left),
        KeyCode::Right => KeyIdentity::Named(NamedKey::Right),
        KeyCode::Esc => KeyIdentity::Named(NamedKey::Esc),
        KeyCode::Enter => KeyIdentity::Named(NamedKey::Enter),
        KeyCode::Tab => KeyIdentity::Named(NamedKey::Tab),
        KeyCode::Backspace => KeyIdentity::Named(NamedKey::Backspace),
        KeyCode::F(n) => KeyIdentity::Named(NamedKey::Function(n)),
        _ => KeyIdentity::Named(NamedKey::Other),
    }
}

fn classify(key: KeyEvent) -> Transition {
    let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c' | 'C'));

    match key.kind {
        KeyEventKind::Release => Transition::Up(key_identity(key.code)),
        _ if ctrl_c => Transition::Interrupt,
        KeyEventKind::Press | KeyEventKind::Repeat => Transition::Down(key_identity(key.code)),
    }
}

/// Tracks the held direction key when the terminal cannot report releases.
#[derive(Debug)]
struct ReleaseTracker {
    timeout: Duration,
    held: Option<(KeyIdentity, Instant)>,
}

impl ReleaseTracker {
    fn new(timeout: Duration) -> Self {
        Self { timeout, held: None }
    }

    fn pressed(&mut self, key: KeyIdentity, now: Instant) {
        self.held = Some((key, now));
    }

    /// How long to wait for the next event before the held key expires.
    fn wait(&self, now: Instant) -> Option<Duration> {
        self.held
            .map(|(_, at)| (at + self.timeout).saturating_duration_since(now))
    }

    /// Takes the held key if it has been quiet for the whole timeout.
    fn expire(&mut self, now: Instant) -> Option<KeyIdentity> {
        match self.held {
            Some((key, at)) if now.saturating_duration_since(at) >= self.timeout => {
                self.held = None;
                Some(key)
            }
            _ => None,
        }
    }
}

/// Puts the terminal into raw mode and enables release reporting when
/// available. Everything it changed is undone on drop.
struct KeyboardGuard {
    owns_raw_mode: bool,
    enhanced: bool,
}

impl KeyboardGuard {
    fn acquire() -> io::Result<Self> {
        let owns_raw_mode = !is_raw_mode_enabled()?;
        if owns_raw_mode {
            enable_raw_mode()?;
        }

        let mut guard = Self {
            owns_raw_mode,
            enhanced: false,
        };

        if let Ok(true) = supports_keyboard_enhancement() {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                        | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
                )
            )?;
            guard.enhanced = true;
        }

        Ok(guard)
    }
}

impl Drop for KeyboardGuard {
    fn drop(&mut self) {
        if self.enhanced {
            let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        }
        if self.owns_raw_mode {
            let _ = disable_raw_mode();
        }
    }
}

/// Reads key events from the controlling terminal.
pub(crate) struct TerminalInput {
    release_timeout: Duration,
    shutdown: Arc<Shutdown>,
}

impl TerminalInput {
    pub(crate) fn new(release_timeout: Duration, shutdown: Arc<Shutdown>) -> Self {
        Self {
            release_timeout,
            shutdown,
        }
    }
}

fn read_event(wait: Duration) -> io::Result<Option<Event>> {
    if event::poll(wait)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Feeds events from `next_event` to `handler` until the exit key, an
/// interrupt or a shutdown request.
///
/// `next_event` waits at most the given time and returns `None` if nothing
/// arrived. Unless `enhanced`, only presses are reported: direction keys are
/// released by `tracker`, every other key acts on its press.
fn pump(
    handler: &mut dyn KeyHandler,
    enhanced: bool,
    tracker: &mut ReleaseTracker,
    shutdown: &Shutdown,
    mut next_event: impl FnMut(Duration) -> io::Result<Option<Event>>,
) -> Result<ListenEnd, InputError> {
    loop {
        if shutdown.requested() {
            tracing::info!("Shutdown requested, leaving keyboard input");
            return Ok(ListenEnd::Interrupted);
        }

        let wait = tracker
            .wait(Instant::now())
            .map_or(POLL_INTERVAL, |wait| wait.min(POLL_INTERVAL));

        let Some(event) = next_event(wait).map_err(InputError::Read)? else {
            if let Some(key) = tracker.expire(Instant::now()) {
                tracing::trace!(?key, "Synthesized key release");
                if !handler.on_key_up(key) {
                    return Ok(ListenEnd::Stopped);
                }
            }
            continue;
        };

        let Event::Key(key) = event else {
            continue;
        };

        match classify(key) {
            Transition::Interrupt => return Ok(ListenEnd::Interrupted),
            Transition::Up(key) => {
                if !handler.on_key_up(key) {
                    return Ok(ListenEnd::Stopped);
                }
            }
            Transition::Down(key) if enhanced => handler.on_key_down(key),
            Transition::Down(key) => {
                handler.on_key_down(key);
                if keymap::direction_for(key).is_some() {
                    tracker.pressed(key, Instant::now());
                } else if !handler.on_key_up(key) {
                    // No release will ever arrive, so act on the press.
                    return Ok(ListenEnd::Stopped);
                }
            }
        }
    }
}

impl InputSource for TerminalInput {
    fn listen(&mut self, handler: &mut dyn KeyHandler) -> Result<ListenEnd, InputError> {
        let guard = KeyboardGuard::acquire().map_err(InputError::Setup)?;
        tracing::info!(enhanced = guard.enhanced, "Listening for keyboard input");

        let mut tracker = ReleaseTracker::new(self.release_timeout);
        pump(handler, guard.enhanced, &mut tracker, &self.shutdown, read_event)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::VecDeque, thread};

    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new_with_kind(code, modifiers, KeyEventKind::Press)
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> Option<Event> {
        Some(Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind)))
    }

    const W: KeyIdentity = KeyIdentity::Char('w');
    const X: KeyIdentity = KeyIdentity::Char('x');
    const ESC: KeyIdentity = KeyIdentity::Named(NamedKey::Esc);

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Seen {
        Down(KeyIdentity),
        Up(KeyIdentity),
    }

    /// Records every transition and stops on the release of Esc.
    #[derive(Default)]
    struct Keys {
        seen: Vec<Seen>,
    }

    impl KeyHandler for Keys {
        fn on_key_down(&mut self, key: KeyIdentity) {
            self.seen.push(Seen::Down(key));
        }

        fn on_key_up(&mut self, key: KeyIdentity) -> bool {
            self.seen.push(Seen::Up(key));
            key != ESC
        }
    }

    /// Replays `events`, a `None` sitting out the whole wait.
    fn replay(events: Vec<Option<Event>>) -> impl FnMut(Duration) -> io::Result<Option<Event>> {
        let mut events = VecDeque::from(events);
        move |wait| match events.pop_front() {
            Some(Some(event)) => Ok(Some(event)),
            Some(None) => {
                thread::sleep(wait);
                Ok(None)
            }
            None => Err(io::Error::new(io::ErrorKind::UnexpectedEof, "no more events")),
        }
    }

    fn run(enhanced: bool, events: Vec<Option<Event>>) -> (Result<ListenEnd, InputError>, Vec<Seen>) {
        let mut keys = Keys::default();
        let mut tracker = ReleaseTracker::new(Duration::from_millis(20));
        let end = pump(&mut keys, enhanced, &mut tracker, &Shutdown::default(), replay(events));
        (end, keys.seen)
    }

    #[test]
    fn maps_key_codes() {
        assert_eq!(key_identity(KeyCode::Char('w')), KeyIdentity::Char('w'));
        assert_eq!(key_identity(KeyCode::Left), KeyIdentity::Named(NamedKey::Left));
        assert_eq!(key_identity(KeyCode::Esc), KeyIdentity::Named(NamedKey::Esc));
        assert_eq!(key_identity(KeyCode::F(5)), KeyIdentity::Named(NamedKey::Function(5)));
        assert_eq!(key_identity(KeyCode::Home), KeyIdentity::Named(NamedKey::Other));
    }

    #[test]
    fn classifies_event_kinds() {
        assert_eq!(
            classify(press(KeyCode::Up, KeyModifiers::NONE)),
            Transition::Down(KeyIdentity::Named(NamedKey::Up))
        );
        assert_eq!(
            classify(KeyEvent::new_with_kind(KeyCode::Char('a'), KeyModifiers::NONE, KeyEventKind::Repeat)),
            Transition::Down(KeyIdentity::Char('a'))
        );
        assert_eq!(
            classify(KeyEvent::new_with_kind(KeyCode::Char('a'), KeyModifiers::NONE, KeyEventKind::Release)),
            Transition::Up(KeyIdentity::Char('a'))
        );
    }

    #[test]
    fn ctrl_c_is_an_interrupt() {
        assert_eq!(classify(press(KeyCode::Char('c'), KeyModifiers::CONTROL)), Transition::Interrupt);
        assert_eq!(
            classify(press(KeyCode::Char('c'), KeyModifiers::NONE)),
            Transition::Down(KeyIdentity::Char('c'))
        );
    }

    #[test]
    fn held_key_expires_after_timeout() {
        let start = Instant::now();
        let mut tracker = ReleaseTracker::new(Duration::from_millis(600));
        assert_eq!(tracker.wait(start), None);

        tracker.pressed(KeyIdentity::Char('w'), start);
        assert_eq!(tracker.wait(start), Some(Duration::from_millis(600)));
        assert_eq!(tracker.expire(start + Duration::from_millis(599)), None);
        assert_eq!(tracker.expire(start + Duration::from_millis(600)), Some(KeyIdentity::Char('w')));
        assert_eq!(tracker.expire(start + Duration::from_secs(5)), None);
    }

    #[test]
    fn repeat_press_extends_the_hold() {
        let start = Instant::now();
        let mut tracker = ReleaseTracker::new(Duration::from_millis(600));

        tracker.pressed(KeyIdentity::Char('w'), start);
        tracker.pressed(KeyIdentity::Char('w'), start + Duration::from_millis(500));

        assert_eq!(tracker.expire(start + Duration::from_millis(700)), None);
        assert_eq!(tracker.wait(start + Duration::from_millis(700)), Some(Duration::from_millis(400)));
        assert_eq!(
            tracker.expire(start + Duration::from_millis(1100)),
            Some(KeyIdentity::Char('w'))
        );
    }

    #[test]
    fn esc_acts_on_press_without_release_reporting() {
        let (end, seen) = run(false, vec![key(KeyCode::Esc, KeyEventKind::Press)]);

        assert_eq!(end.unwrap(), ListenEnd::Stopped);
        assert_eq!(seen, vec![Seen::Down(ESC), Seen::Up(ESC)]);
    }

    #[test]
    fn quiet_direction_key_is_released() {
        let (end, seen) = run(
            false,
            vec![
                key(KeyCode::Char('w'), KeyEventKind::Press),
                key(KeyCode::Char('w'), KeyEventKind::Press),
                None,
                None,
                key(KeyCode::Esc, KeyEventKind::Press),
            ],
        );

        assert_eq!(end.unwrap(), ListenEnd::Stopped);
        assert_eq!(
            seen,
            vec![Seen::Down(W), Seen::Down(W), Seen::Up(W), Seen::Down(ESC), Seen::Up(ESC)]
        );
    }

    #[test]
    fn other_keys_release_on_press() {
        let (end, seen) = run(
            false,
            vec![
                key(KeyCode::Char('x'), KeyEventKind::Press),
                Some(Event::Resize(80, 24)),
                key(KeyCode::Esc, KeyEventKind::Press),
            ],
        );

        assert_eq!(end.unwrap(), ListenEnd::Stopped);
        assert_eq!(seen, vec![Seen::Down(X), Seen::Up(X), Seen::Down(ESC), Seen::Up(ESC)]);
    }

    #[test]
    fn enhanced_terminal_uses_real_releases() {
        let (end, seen) = run(
            true,
            vec![
                key(KeyCode::Char('w'), KeyEventKind::Press),
                key(KeyCode::Char('w'), KeyEventKind::Repeat),
                None,
                key(KeyCode::Char('w'), KeyEventKind::Release),
                key(KeyCode::Char('x'), KeyEventKind::Press),
                key(KeyCode::Esc, KeyEventKind::Press),
                key(KeyCode::Esc, KeyEventKind::Release),
            ],
        );

        assert_eq!(end.unwrap(), ListenEnd::Stopped);
        assert_eq!(
            seen,
            vec![
                Seen::Down(W),
                Seen::Down(W),
                Seen::Up(W),
                Seen::Down(X),
                Seen::Down(ESC),
                Seen::Up(ESC),
            ]
        );
    }

    #[test]
    fn ctrl_c_ends_with_interrupt() {
        let (end, seen) = run(
            false,
            vec![
                key(KeyCode::Char('w'), KeyEventKind::Press),
                Some(Event::Key(press(KeyCode::Char('c'), KeyModifiers::CONTROL))),
            ],
        );

        assert_eq!(end.unwrap(), ListenEnd::Interrupted);
        assert_eq!(seen, vec![Seen::Down(W)]);
    }

    #[test]
    fn shutdown_request_ends_with_interrupt() {
        let shutdown = Shutdown::default();
        let mut keys = Keys::default();
        let mut tracker = ReleaseTracker::new(Duration::from_secs(10));
        let mut calls = 0;

        let end = pump(&mut keys, false, &mut tracker, &shutdown, |_| {
            calls += 1;
            if calls == 1 {
                Ok(key(KeyCode::Up, KeyEventKind::Press))
            } else {
                shutdown.request();
                Ok(None)
            }
        });

        assert_eq!(end.unwrap(), ListenEnd::Interrupted);
        assert_eq!(keys.seen, vec![Seen::Down(KeyIdentity::Named(NamedKey::Up))]);
    }

    #[test]
    fn read_failure_is_an_error() {
        let (end, seen) = run(false, vec![key(KeyCode::Char('w'), KeyEventKind::Press)]);

        assert!(matches!(end, Err(InputError::Read(_))));
        assert_eq!(seen, vec![Seen::Down(W)]);
    }

    #[test]
    fn waits_are_bounded() {
        let mut tracker = ReleaseTracker::new(Duration::from_secs(10));
        let mut waits = Vec::new();
        let _ = pump(&mut Keys::default(), false, &mut tracker, &Shutdown::default(), |wait| {
            waits.push(wait);
            if waits.len() == 1 {
                Ok(key(KeyCode::Char('w'), KeyEventKind::Press))
            } else {
                Err(io::Error::other("done"))
            }
        });

        assert!(waits.iter().all(|wait| *wait <= POLL_INTERVAL));
        assert_eq!(waits.len(), 2);
    }

    #[test]
    fn new_key_replaces_the_held_one() {
        let start = Instant::now();
        let mut tracker = ReleaseTracker::new(Duration::from_millis(100));

        tracker.pressed(KeyIdentity::Char('w'), start);
        tracker.pressed(KeyIdentity::Char('d'), start + Duration::from_millis(50));

        assert_eq!(
            tracker.expire(start + Duration::from_millis(150)),
            Some(KeyIdentity::Char('d'))
        );
    }
}
