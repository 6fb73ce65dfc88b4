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

//! The full-screen PTZ controller.
//!
//! The screen owns the terminal while the controller runs. The controller's
//! listener thread reads the keyboard, and the main thread only drains
//! [`ControllerEvent`]s and redraws, so a slow remote call never freezes the
//! screen.
//!
//! The terminal follows a strict setup-run-teardown pattern so that it is
//! restored even when the controller fails.

mod render;
mod view;

use std::{
    io,
    sync::{
        Arc,
        mpsc::{self, Receiver, RecvTimeoutError},
    },
    time::Duration,
};

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{
    api::{ApiClient, Session},
    config::AppConfig,
    controller::{
        Controller, ControllerEvent, ExitReason, Lifecycle, motion::PtzMotion, terminal_input::TerminalInput,
    },
    model::Camera,
    shutdown::Shutdown,
    theme::Theme,
    ui::view::ControllerView,
};

/// Minimum redraw rate while waiting for controller events.
const TICK: Duration = Duration::from_millis(250);

type Screen = Terminal<CrosstermBackend<io::Stdout>>;

/// Runs the controller for `camera` until it exits, returning why it exited.
///
/// # Errors
///
/// Returns an error if the terminal cannot be prepared or the listener thread
/// cannot be started. In both cases no motion command has been sent.
pub(crate) fn run_controller(
    config: &AppConfig,
    client: &ApiClient,
    session: &Session,
    camera: &Camera,
    shutdown: &Arc<Shutdown>,
) -> Result<ExitReason> {
    let (event_tx, event_rx) = mpsc::channel();

    let sink = Arc::new(PtzMotion::new(client.clone(), session.clone(), camera.id));
    let controller = Controller::new(sink, event_tx);
    let input = TerminalInput::new(config.release_timeout(), Arc::clone(shutdown));

    let mut view = ControllerView::new(format!("Camera {} ({} {})", camera.id, camera.vendor, camera.model));

    let mut terminal = setup_terminal()?;
    let res = drive(&mut terminal, controller, input, event_rx, &mut view);
    restore_terminal(&mut terminal);

    res
}

/// Prepares the terminal: raw mode and the alternate screen.
fn setup_terminal() -> Result<Screen> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        disable_raw_mode().ok();
        return Err(e).context("Failed to enter alternate screen");
    }

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state. Best effort, as it also runs
/// after failures.
fn restore_terminal(terminal: &mut Screen) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}

fn drive(
    terminal: &mut Screen,
    controller: Controller<PtzMotion<ApiClient>>,
    input: TerminalInput,
    events: Receiver<ControllerEvent>,
    view: &mut ControllerView,
) -> Result<ExitReason> {
    let theme = Theme::default();

    let running = controller.start(input).context("Failed to start PTZ controller")?;

    loop {
        // A draw failure must not abandon a running controller.
        if let Err(e) = terminal.draw(|f| render::draw(f, view, &theme)) {
            tracing::warn!(error = %e, "Failed to draw controller screen");
        }

        match events.recv_timeout(TICK) {
            Ok(event) => {
                let exited = matches!(event, ControllerEvent::Exited(_));
                view.apply(event);
                if exited {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if running.lifecycle() == Lifecycle::Stopped {
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(running.join())
}
