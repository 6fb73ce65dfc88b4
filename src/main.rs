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

//! # Surveillance Station camera client.
//!
//! A terminal client for the Synology Surveillance Station Web API: camera
//! information, snapshots, recordings and live pan/tilt control from the
//! keyboard.
//!
//! ## Architecture
//!
//! * The **Menu** runs on the main thread, reading commands from stdin and
//!   calling the request services.
//! * The **Controller** takes over the terminal while a camera is being
//!   moved. A dedicated listener thread translates key presses and releases
//!   into `Move` commands, and the main thread redraws the screen from the
//!   events it publishes over a `std::sync::mpsc` channel.
//! * Every request goes through one authenticated session, opened at startup
//!   and closed on every exit path, including SIGINT, SIGTERM and SIGHUP.

mod api;
mod config;
mod controller;
mod logging;
mod menu;
mod model;
mod services;
mod shutdown;
mod theme;
mod ui;
mod util;

use anyhow::{Context, Result};

/// The entry point of the application.
///
/// Loads the configuration, installs logging and hands over to the menu.
fn main() -> Result<()> {
    let config = config::load_config().context("Failed to load configuration")?;

    let log_path = config.log_path();
    logging::init_logging(&config.log_level, &log_path).context("Failed to initialise logging")?;
    tracing::info!(base_url = %config.base_url(), log = %log_path.display(), "Starting");

    let shutdown = shutdown::install().context("Failed to install signal handlers")?;

    let res = menu::run(&config, &shutdown);
    if let Err(e) = &res {
        tracing::error!(error = %format!("{:#}", e), "Exiting with error");
    }
    res
}
