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

//! The interactive menu.
//!
//! Logs in, asks for a camera and then runs menu items until the user exits
//! or the input is closed. The session is logged out on every exit path once
//! login has succeeded.
//!
//! A failing menu item is reported and the menu continues. Only a broken
//! terminal ends the session early.
//!
//! A shutdown signal ends the menu the same way closed input does, so the
//! logout still runs.

mod handlers;
mod lines;
mod prompt;

use std::{
    io::{self, BufRead, Write},
    sync::Arc,
};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::{
    api::{ApiClient, RemoteError, Session, codes, session},
    config::AppConfig,
    menu::{lines::LineFeed, prompt::Prompt},
    model::Camera,
    services::{DownloadError, camera},
    shutdown::Shutdown,
};

#[derive(Debug, Error)]
pub(crate) enum ActionError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("{0:#}")]
    Controller(anyhow::Error),

    #[error("terminal input failed: {0}")]
    Prompt(#[from] io::Error),
}

/// Whether the menu keeps running after an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MenuItem {
    ApiInfo,
    Capability,
    PtzControl,
    SnapshotCapture,
    SnapshotDelete,
    SnapshotDownload,
    RecordingList,
    RecordingDownload,
    PresetList,
    LivePath,
    EnableDisable,
    Exit,
}

impl MenuItem {
    const ALL: [MenuItem; 12] = [
        MenuItem::ApiInfo,
        MenuItem::Capability,
        MenuItem::PtzControl,
        MenuItem::SnapshotCapture,
        MenuItem::SnapshotDelete,
        MenuItem::SnapshotDownload,
        MenuItem::RecordingList,
        MenuItem::RecordingDownload,
        MenuItem::PresetList,
        MenuItem::LivePath,
        MenuItem::EnableDisable,
        MenuItem::Exit,
    ];

    fn key(self) -> &'static str {
        match self {
            MenuItem::ApiInfo => "1",
            MenuItem::Capability => "2",
            MenuItem::PtzControl => "3",
            MenuItem::SnapshotCapture => "4",
            MenuItem::SnapshotDelete => "5",
            MenuItem::SnapshotDownload => "6",
            MenuItem::RecordingList => "7",
            MenuItem::RecordingDownload => "8",
            MenuItem::PresetList => "9",
            MenuItem::LivePath => "10",
            MenuItem::EnableDisable => "11",
            MenuItem::Exit => "0",
        }
    }

    fn label(self) -> &'static str {
        match self {
            MenuItem::ApiInfo => "Get API Info",
            MenuItem::Capability => "Get Camera Capability",
            MenuItem::PtzControl => "Move Camera (PTZ)",
            MenuItem::SnapshotCapture => "Take Snapshot and Save",
            MenuItem::SnapshotDelete => "Delete Snapshot (by ID)",
            MenuItem::SnapshotDownload => "Download Snapshot (by ID)",
            MenuItem::RecordingList => "Show Recording List",
            MenuItem::RecordingDownload => "Download Recording (by ID)",
            MenuItem::PresetList => "Show List of PTZ Presets",
            MenuItem::LivePath => "Show RTSP live Info",
            MenuItem::EnableDisable => "Enable/Disable selected camera",
            MenuItem::Exit => "Logout and Exit",
        }
    }

    fn from_choice(choice: &str) -> Option<MenuItem> {
        Self::ALL.into_iter().find(|item| item.key() == choice)
    }
}

fn display_menu<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>) -> io::Result<()> {
    prompt.header("MAIN MENU")?;
    for item in MenuItem::ALL {
        prompt.say(format!("[{}] {}", item.key(), item.label()))?;
    }
    prompt.rule()
}

fn show_cameras<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, cameras: &[Camera]) -> io::Result<()> {
    prompt.info(format!("Cameras found: {}", cameras.len()))?;
    for cam in cameras {
        prompt.say(format!(
            "Camera: {:20} | Vendor: {:12} | ID: {:<4} | dsId: {}",
            cam.model, cam.vendor, cam.id, cam.ds_id
        ))?;
    }
    Ok(())
}

/// Asks until a listed camera id is entered, `None` if the input closes.
fn select_camera<R: BufRead, W: Write>(prompt: &mut Prompt<R, W>, cameras: &[Camera]) -> io::Result<Option<Camera>> {
    loop {
        let Some(answer) = prompt.ask("\nWhich camera do you want to use? (enter Camera ID): ")? else {
            prompt.info("Camera selection cancelled")?;
            return Ok(None);
        };

        let Ok(id) = answer.parse::<i64>() else {
            prompt.error("Invalid input. Please enter a valid integer.")?;
            continue;
        };

        match cameras.iter().find(|cam| cam.id == id) {
            Some(cam) => {
                prompt.success(format!("Camera selected: ID={}, dsId={}", cam.id, cam.ds_id))?;
                return Ok(Some(cam.clone()));
            }
            None => prompt.error(format!("Camera ID {} not found. Please try again.", id))?,
        }
    }
}

/// Describes a failed login using the authentication error codes.
fn login_failure(e: &RemoteError) -> String {
    match e {
        RemoteError::Rejected { code } => format!("Login failed with API code {} ({})", code, codes::describe_auth(*code)),
        other => format!("Login failed: {}", other),
    }
}

/// Runs the menu against the configured server.
///
/// # Errors
///
/// Returns an error if login fails or the terminal breaks. Failures of single
/// menu items are reported and do not end the menu.
pub(crate) fn run(config: &AppConfig, shutdown: &Arc<Shutdown>) -> Result<()> {
    let input = LineFeed::stdin(Arc::clone(shutdown)).context("Failed to start line input")?;
    let mut prompt = Prompt::new(input, io::stdout());

    prompt.header("SYNOLOGY SURVEILLANCE STATION API CLIENT")?;
    prompt.info("Connecting to Synology NAS...")?;

    let client = ApiClient::new(config).context("Failed to create HTTP client")?;
    let session = match session::login(&client, &config.username, &config.password) {
        Ok(session) => session,
        Err(e) => {
            let message = login_failure(&e);
            tracing::error!(error = %e, "Login failed");
            prompt.error(&message)?;
            anyhow::bail!(message);
        }
    };
    prompt.success("Logged in")?;

    let res = run_session(&mut prompt, config, &client, &session, shutdown);

    // Logout runs whatever happened above; its own failure is only reported.
    let _ = prompt.info("Disconnecting from NAS...");
    match session::logout(&client, session) {
        Ok(()) => {
            let _ = prompt.success("Logged out");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Logout failed");
            let _ = prompt.error(format!("Logout failed: {}", e));
        }
    }

    res
}

fn run_session<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    config: &AppConfig,
    client: &ApiClient,
    session: &Session,
    shutdown: &Arc<Shutdown>,
) -> Result<()> {
    let cameras = camera::list_cameras(client, session).context("Failed to list cameras")?;
    if cameras.is_empty() {
        prompt.error("No cameras available")?;
        return Ok(());
    }
    show_cameras(prompt, &cameras)?;

    let Some(camera) = select_camera(prompt, &cameras)? else {
        prompt.error("No camera selected. Exiting.")?;
        return Ok(());
    };
    tracing::info!(camera_id = camera.id, "Camera selected");

    loop {
        if shutdown.requested() {
            prompt.info("Program interrupted, exiting...")?;
            return Ok(());
        }

        display_menu(prompt)?;
        let Some(choice) = prompt.ask("Enter command: ")? else {
            if shutdown.requested() {
                prompt.info("Program interrupted, exiting...")?;
            } else {
                prompt.info("Input closed, exiting...")?;
            }
            return Ok(());
        };

        let Some(item) = MenuItem::from_choice(&choice) else {
            prompt.error("Invalid command. Please use 0-11")?;
            continue;
        };

        tracing::debug!(?item, "Menu item selected");
        let outcome = match item {
            MenuItem::ApiInfo => handlers::api_info(prompt, client, session).map(|_| Flow::Continue),
            MenuItem::Capability => {
                handlers::camera_capability(prompt, client, session, camera.id).map(|_| Flow::Continue)
            }
            MenuItem::PtzControl => handlers::ptz_control(prompt, config, client, session, &camera, shutdown),
            MenuItem::SnapshotCapture => {
                handlers::snapshot_capture(prompt, client, session, &camera).map(|_| Flow::Continue)
            }
            MenuItem::SnapshotDelete => {
                handlers::delete_snapshots(prompt, client, session, camera.id).map(|_| Flow::Continue)
            }
            MenuItem::SnapshotDownload => {
                handlers::download_snapshot(prompt, client, session, camera.id).map(|_| Flow::Continue)
            }
            MenuItem::RecordingList => handlers::recording_list(prompt, client, session).map(|_| Flow::Continue),
            MenuItem::RecordingDownload => {
                handlers::recording_download(prompt, client, session).map(|_| Flow::Continue)
            }
            MenuItem::PresetList => {
                handlers::preset_list(prompt, client, session, camera.id).map(|_| Flow::Continue)
            }
            MenuItem::LivePath => handlers::live_path(prompt, client, session, camera.id).map(|_| Flow::Continue),
            MenuItem::EnableDisable => {
                handlers::enable_disable(prompt, client, session, camera.id).map(|_| Flow::Continue)
            }
            MenuItem::Exit => {
                prompt.info("Exiting...")?;
                Ok(Flow::Quit)
            }
        };

        match outcome {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => return Ok(()),
            Err(ActionError::Prompt(e)) => return Err(e).context("Terminal input failed"),
            Err(e) => {
                tracing::warn!(?item, error = %e, "Menu item failed");
                prompt.error(&e)?;
            }
        }
    }
}
