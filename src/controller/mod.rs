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

//! Interactive PTZ controller.
//!
//! Turns key down / key up events into continuous `Move` commands for a single
//! camera, keeping at most one direction active and making sure every started
//! motion is eventually stopped.
//!
//! # Lifecycle
//!
//! A [`Controller`] starts out idle. [`Controller::start`] moves it to running
//! by spawning a dedicated listener thread that blocks on the
//! [`InputSource`](input::InputSource) and drives the
//! [`InputTranslator`](translator::InputTranslator). The controller stops when
//! the exit key is released, the user interrupts, or the input source fails.
//! On every one of those paths, and also when the listener thread panics, a
//! final Stop is sent for whatever direction is still active.
//!
//! Outcomes of every motion command are published as [`ControllerEvent`]s so
//! the screen can show them while the controller runs.
//!
//! # Organization
//!
//! * [`state`]: The active direction and its transitions.
//! * [`keymap`]: Key identities and the binding table.
//! * [`translator`]: Key events to motion intents.
//! * [`motion`]: Delivery of intents to the camera.
//! * [`input`]: The input source abstraction.
//! * [`terminal_input`]: The `crossterm` input source.

pub(crate) mod input;
pub(crate) mod keymap;
pub(crate) mod motion;
pub(crate) mod state;
pub(crate) mod terminal_input;
pub(crate) mod translator;

use std::{
    io,
    sync::{Arc, Mutex, mpsc::Sender},
    thread::{self, JoinHandle},
};

pub(crate) use state::{Direction, MotionIntent, Phase};

use crate::{
    api::RemoteError,
    controller::{
        input::{InputSource, ListenEnd},
        motion::MotionSink,
        state::{ControllerState, lock_state},
        translator::{InputTranslator, dispatch},
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Lifecycle {
    Idle,
    Running,
    Stopped,
}

/// Why the controller stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ExitReason {
    ExitKey,
    Interrupted,
    InputFailure(String),
}

/// The outcome of one motion command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct MotionReport {
    pub(crate) intent: MotionIntent,
    pub(crate) outcome: Result<(), RemoteError>,
    /// Sent by the release-on-exit path rather than by a key.
    pub(crate) cleanup: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ControllerEvent {
    Started,
    Motion(MotionReport),
    Exited(ExitReason),
}

/// Sends a final Stop for the active direction when dropped.
///
/// Lives for the whole blocking listen call so that normal returns, input
/// errors and panics all pass through it.
struct ReleaseGuard<'a, S: MotionSink + ?Sized> {
    state: &'a Mutex<ControllerState>,
    sink: &'a S,
    events: &'a Sender<ControllerEvent>,
}

impl<S: MotionSink + ?Sized> Drop for ReleaseGuard<'_, S> {
    fn drop(&mut self) {
        let intent = lock_state(self.state).release();
        if let Some(intent) = intent {
            tracing::info!(%intent, "Releasing active motion on exit");
            dispatch(self.sink, self.events, intent, true);
        }
    }
}

/// An idle controller for one camera.
pub(crate) struct Controller<S> {
    sink: Arc<S>,
    state: Arc<Mutex<ControllerState>>,
    events: Sender<ControllerEvent>,
}

impl<S: MotionSink + Send + Sync + 'static> Controller<S> {
    pub(crate) fn new(sink: Arc<S>, events: Sender<ControllerEvent>) -> Self {
        Self {
            sink,
            state: Arc::new(Mutex::new(ControllerState::new())),
            events,
        }
    }

    /// Spawns the listener thread and returns immediately.
    ///
    /// The thread publishes [`ControllerEvent::Started`] before reading any
    /// input, so it always precedes the motion reports.
    ///
    /// # Errors
    ///
    /// Returns an error if the thread cannot be spawned, in which case no
    /// command has been sent.
    pub(crate) fn start<I>(self, mut input: I) -> io::Result<RunningController>
    where
        I: InputSource + Send + 'static,
    {
        let state = Arc::clone(&self.state);
        let sink = self.sink;
        let events = self.events.clone();

        let handle = thread::Builder::new().name("ptz-input".to_string()).spawn(move || {
            let _ = events.send(ControllerEvent::Started);

            let outcome = {
                let _guard = ReleaseGuard {
                    state: &state,
                    sink: &*sink,
                    events: &events,
                };
                let mut translator = InputTranslator::new(&state, &*sink, &events);
                input.listen(&mut translator)
            };

            let reason = match outcome {
                Ok(ListenEnd::Stopped) => ExitReason::ExitKey,
                Ok(ListenEnd::Interrupted) => ExitReason::Interrupted,
                Err(e) => {
                    tracing::error!(error = %e, "Input source failed");
                    ExitReason::InputFailure(e.to_string())
                }
            };
            let _ = events.send(ControllerEvent::Exited(reason.clone()));
            reason
        })?;

        tracing::info!("PTZ controller running");

        Ok(RunningController {
            handle,
            state: self.state,
            events: self.events,
        })
    }

    /// Runs the controller, blocking until it stops.
    pub(crate) fn run<I>(self, input: I) -> ExitReason
    where
        I: InputSource + Send + 'static,
    {
        match self.start(input) {
            Ok(running) => running.join(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to start input listener");
                ExitReason::InputFailure(e.to_string())
            }
        }
    }
}

/// A controller whose listener thread has been started.
pub(crate) struct RunningController {
    handle: JoinHandle<ExitReason>,
    state: Arc<Mutex<ControllerState>>,
    events: Sender<ControllerEvent>,
}

impl RunningController {
    pub(crate) fn lifecycle(&self) -> Lifecycle {
        if self.handle.is_finished() {
            Lifecycle::Stopped
        } else {
            Lifecycle::Running
        }
    }

    pub(crate) fn active_direction(&self) -> Option<Direction> {
        lock_state(&self.state).active_direction()
    }

    /// Waits for the listener thread to finish.
    pub(crate) fn join(self) -> ExitReason {
        let reason = match self.handle.join() {
            Ok(reason) => reason,
            Err(_) => {
                // The release guard has already run while unwinding.
                tracing::error!("Input listener panicked");
                let reason = ExitReason::InputFailure("input listener panicked".to_string());
                let _ = self.events.send(ControllerEvent::Exited(reason.clone()));
                reason
            }
        };
        tracing::info!(?reason, "PTZ controller stopped");
        reason
    }
}
