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

//! Menu item handlers.
//!
//! Handlers that only query the server take any [`RemoteApi`]. Those that
//! upload or download bodies need the concrete [`ApiClient`].

use std::{
    collections::BTreeMap,
    io::{BufRead, Write},
    path::PathBuf,
    sync::Arc,
};

use crate::{
    api::{ApiClient, RemoteApi, Session},
    config::AppConfig,
    controller::ExitReason,
    menu::{ActionError, Flow, prompt::Prompt},
    model::{Camera, Capability, SnapshotInfo},
    services::{camera, info, ptz, recording, snapshot},
    shutdown::Shutdown,
    ui,
    util::format::{format_bytes, format_progress, format_time},
};

pub(crate) fn api_info<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    api: &impl RemoteApi,
    session: &Session,
) -> Result<(), ActionError> {
    let apis = info::query_apis(api, session)?;
    let pretty = serde_json::to_string_pretty(&apis).unwrap_or_else(|_| apis.to_string());
    prompt.say(pretty)?;
    Ok(())
}

pub(crate) fn camera_capability<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    api: &impl RemoteApi,
    session: &Session,
    camera_id: i64,
) -> Result<(), ActionError> {
    let caps = camera::capability(api, session, camera_id)?;
    prompt.say("\nCamera Capabilities:")?;
    prompt.say(format!("  PTZ Pan Support:   {}", Capability::describe(caps.ptz_pan)))?;
    prompt.say(format!("  PTZ Zoom Support:  {}", Capability::describe(caps.ptz_zoom)))?;
    prompt.say(format!("  Audio Out Support: {}", Capability::describe(caps.audio_out)))?;
    Ok(())
}

pub(crate) fn ptz_control<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    config: &AppConfig,
    client: &ApiClient,
    session: &Session,
    camera: &Camera,
    shutdown: &Arc<Shutdown>,
) -> Result<Flow, ActionError> {
    prompt.info("Starting PTZ controller, hold a key to move and release to stop")?;

    let exit = ui::run_controller(config, client, session, camera, shutdown).map_err(ActionError::Controller)?;
    match exit {
        ExitReason::ExitKey => {
            prompt.info("Exiting PTZ controller")?;
            Ok(Flow::Continue)
        }
        ExitReason::Interrupted => {
            prompt.info("Program interrupted by user")?;
            Ok(Flow::Quit)
        }
        ExitReason::InputFailure(message) => {
            prompt.error(format!("PTZ controller stopped: {}", message))?;
            Ok(Flow::Continue)
        }
    }
}

pub(crate) fn snapshot_capture<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    client: &ApiClient,
    session: &Session,
    camera: &Camera,
) -> Result<(), ActionError> {
    prompt.info("Capturing snapshot...")?;
    let capture = snapshot::take(client, session, camera.id, camera.ds_id)?;

    prompt.say("\nSnapshot Preview:")?;
    prompt.say(format!("  Camera:     {}", capture.cam_name))?;
    prompt.say(format!("  Resolution: {}x{}", capture.width, capture.height))?;
    prompt.say(format!("  Size:       {}", format_bytes(capture.byte_size.max(0) as u64)))?;
    prompt.success("Snapshot captured successfully!")?;

    prompt.say("\nDo you want to save this snapshot to Synology?")?;
    prompt.say("[Y] Yes    [N] No")?;
    match prompt.ask("Choice: ")?.as_deref() {
        Some("Y" | "y") => {
            let snapshot_id = snapshot::save(client, session, &capture)?;
            prompt.success(format!("Snapshot saved with ID: {}", snapshot_id))?;
        }
        Some("N" | "n") => prompt.say("Snapshot not saved.")?,
        Some(_) => prompt.error("Invalid choice. Snapshot not saved.")?,
        None => {}
    }
    Ok(())
}

/// Lists the stored snapshots keyed by id, printing them as a table.
fn show_snapshots<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    api: &impl RemoteApi,
    session: &Session,
    camera_id: i64,
) -> Result<BTreeMap<i64, SnapshotInfo>, ActionError> {
    let (total, snapshots) = snapshot::list(api, session, camera_id)?;
    prompt.info(format!("Found {} total snapshots", total))?;

    if snapshots.is_empty() {
        return Ok(BTreeMap::new());
    }

    prompt.say("\nAvailable Snapshots:")?;
    for snap in &snapshots {
        prompt.say(format!("ID: {:<5} | {:^60} | Camera: {}", snap.id, snap.file_name, snap.cam_name))?;
    }
    Ok(snapshots.into_iter().map(|s| (s.id, s)).collect())
}

/// Reads a snapshot id from the list, `None` when the user quits.
fn ask_snapshot_id<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    question: &str,
    known: &BTreeMap<i64, SnapshotInfo>,
) -> Result<Option<i64>, ActionError> {
    loop {
        let Some(answer) = prompt.ask(question)? else {
            return Ok(None);
        };
        if answer.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        match answer.parse::<i64>() {
            Ok(id) if known.contains_key(&id) => return Ok(Some(id)),
            Ok(id) => prompt.error(format!("ID {} not found", id))?,
            Err(_) => prompt.error("Please enter a valid numeric ID")?,
        }
    }
}

pub(crate) fn delete_snapshots<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    api: &impl RemoteApi,
    session: &Session,
    camera_id: i64,
) -> Result<(), ActionError> {
    let known = show_snapshots(prompt, api, session, camera_id)?;
    if known.is_empty() {
        prompt.error("No snapshots found")?;
        return Ok(());
    }

    let mut marked: Vec<i64> = Vec::new();
    while let Some(id) = ask_snapshot_id(prompt, "\nSnapshot ID to delete (Q when finished): ", &known)? {
        if marked.contains(&id) {
            prompt.say(format!("ID {} already marked for deletion", id))?;
            continue;
        }
        marked.push(id);
        prompt.success(format!("Snapshot {} ({}) marked for deletion", id, known[&id].file_name))?;
    }

    if marked.is_empty() {
        prompt.info("No snapshots selected for deletion")?;
        return Ok(());
    }

    prompt.say(format!("\nAbout to delete {} snapshot(s):", marked.len()))?;
    for id in &marked {
        prompt.say(format!("{}: {}", id, known[id].file_name))?;
    }

    let confirmed = prompt
        .ask("\nConfirm deletion? (yes/no): ")?
        .is_some_and(|answer| answer.eq_ignore_ascii_case("yes"));
    if !confirmed {
        prompt.info("Deletion cancelled")?;
        return Ok(());
    }

    snapshot::delete(api, session, &marked)?;
    prompt.success(format!("Deleted {} snapshot(s)", marked.len()))?;
    Ok(())
}

/// Asks for a file name without extension, `None` if empty or cancelled.
fn ask_file_name<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    question: &str,
    extension: &str,
) -> Result<Option<PathBuf>, ActionError> {
    match prompt.ask(question)? {
        Some(name) if !name.is_empty() => Ok(Some(PathBuf::from(format!("{}.{}", name, extension)))),
        Some(_) => {
            prompt.error("Filename cannot be empty")?;
            Ok(None)
        }
        None => Ok(None),
    }
}

pub(crate) fn download_snapshot<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    client: &ApiClient,
    session: &Session,
    camera_id: i64,
) -> Result<(), ActionError> {
    let known = show_snapshots(prompt, client, session, camera_id)?;
    if known.is_empty() {
        return Ok(());
    }

    while let Some(id) = ask_snapshot_id(prompt, "\nSnapshot ID to download (Q to exit): ", &known)? {
        let Some(path) = ask_file_name(prompt, "Filename (without extension): ", "jpg")? else {
            continue;
        };

        match snapshot::download(client, session, id, &path) {
            Ok(written) => {
                prompt.success(format!("Image downloaded: {} ({})", path.display(), format_bytes(written as u64)))?;
                return Ok(());
            }
            Err(e) => prompt.error(format!("Snapshot download failed: {}", e))?,
        }
    }

    prompt.info("Exiting download menu")?;
    Ok(())
}

pub(crate) fn recording_list<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    api: &impl RemoteApi,
    session: &Session,
) -> Result<(), ActionError> {
    prompt.info("Fetching recording list (max 50)...")?;
    let recordings = recording::list(api, session)?;

    if recordings.is_empty() {
        prompt.info("No recordings found")?;
        return Ok(());
    }

    prompt.say("\nAvailable Recordings:")?;
    for rec in &recordings {
        let length = u64::try_from(rec.stop_time - rec.start_time).unwrap_or(0);
        prompt.say(format!(
            "ID: {:<10} | Camera ID: {:<5} | Length: {}",
            rec.id,
            rec.camera_id,
            format_time(length)
        ))?;
    }
    Ok(())
}

pub(crate) fn recording_download<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    client: &ApiClient,
    session: &Session,
) -> Result<(), ActionError> {
    let Some(recording_id) = prompt.ask("Enter recording ID: ")? else {
        return Ok(());
    };
    if recording_id.is_empty() {
        prompt.error("Recording ID cannot be empty")?;
        return Ok(());
    }
    let Some(path) = ask_file_name(prompt, "Save file as (without extension): ", "mp4")? else {
        return Ok(());
    };

    prompt.info(format!("Downloading recording {}...", recording_id))?;
    let written = recording::download(client, session, &recording_id, &path, |done, total| {
        // Progress output is cosmetic, a failed write is not worth aborting for.
        let _ = prompt.progress(format_progress(done, total));
    })?;

    prompt.say("")?;
    prompt.success(format!("Recording saved: {} ({})", path.display(), format_bytes(written)))?;
    Ok(())
}

pub(crate) fn preset_list<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    api: &impl RemoteApi,
    session: &Session,
    camera_id: i64,
) -> Result<(), ActionError> {
    let presets = ptz::list_presets(api, session, camera_id)?;

    if presets.is_empty() {
        prompt.info("No presets available for this camera")?;
        return Ok(());
    }

    prompt.say("\nAvailable PTZ Presets:")?;
    for preset in &presets {
        prompt.say(format!("ID: {:<5} | Name: {}", preset.id, preset.name))?;
    }
    Ok(())
}

pub(crate) fn live_path<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    api: &impl RemoteApi,
    session: &Session,
    camera_id: i64,
) -> Result<(), ActionError> {
    let Some(path) = camera::live_path(api, session, camera_id)? else {
        prompt.info("No live view path for this camera")?;
        return Ok(());
    };

    prompt.info(format!("Live paths for camera {}:", camera_id))?;
    prompt.say(format!("  RTSP Path:       {}", path.rtsp_path))?;
    prompt.say(format!("  RTSP over HTTP:  {}", path.rtsp_over_http_path))?;
    prompt.say(format!("  MJPEG HTTP:      {}", path.mjpeg_http_path))?;
    prompt.say(format!("  MXPEG HTTP:      {}", path.mxpeg_http_path))?;
    prompt.say(format!("  Multicast:       {}", path.multicst_path))?;
    Ok(())
}

pub(crate) fn enable_disable<R: BufRead, W: Write>(
    prompt: &mut Prompt<R, W>,
    api: &impl RemoteApi,
    session: &Session,
    camera_id: i64,
) -> Result<(), ActionError> {
    prompt.say(format!("Do you want to enable or disable camera: {}?", camera_id))?;
    prompt.say("[E]: Enable      [D]: Disable")?;

    let enabled = match prompt.ask("Choice: ")?.map(|c| c.to_ascii_uppercase()).as_deref() {
        Some("E") => true,
        Some("D") => false,
        Some(_) => {
            prompt.say("Invalid command.")?;
            return Ok(());
        }
        None => return Ok(()),
    };

    camera::set_enabled(api, session, camera_id, enabled)?;
    let state = if enabled { "enabled" } else { "disabled" };
    prompt.success(format!("Camera {} {}", camera_id, state))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        api::{ParamValue, RemoteError},
        menu::prompt::tests::{printed, scripted},
        services::tests::{Canned, session},
    };

    fn snapshot_list() -> serde_json::Value {
        json!({
            "total": 2,
            "data": [
                {"id": 4, "fileName": "front-1.jpg", "camName": "Front"},
                {"id": 9, "fileName": "front-2.jpg", "camName": "Front"}
            ]
        })
    }

    #[test]
    fn capability_is_described() {
        let api = Canned::ok(json!({"ptzPan": 2, "ptzZoom": 0, "audioOut": 1}));
        let mut prompt = scripted(&[]);

        camera_capability(&mut prompt, &api, &session(), 3).unwrap();

        let out = printed(&prompt);
        assert!(out.contains("PTZ Pan Support:   continuous"));
        assert!(out.contains("PTZ Zoom Support:  no"));
        assert!(out.contains("Audio Out Support: step"));
    }

    #[test]
    fn delete_collects_ids_then_confirms() {
        let api = Canned::ok(snapshot_list());
        let mut prompt = scripted(&["4", "abc", "7", "4", "9", "q", "yes"]);

        delete_snapshots(&mut prompt, &api, &session(), 3).unwrap();

        let out = printed(&prompt);
        assert!(out.contains("Please enter a valid numeric ID"));
        assert!(out.contains("ID 7 not found"));
        assert!(out.contains("ID 4 already marked for deletion"));
        assert!(out.contains("About to delete 2 snapshot(s):"));

        let command = api.last();
        assert_eq!(command.method, "Delete");
        assert_eq!(
            command.get("objList"),
            Some(&ParamValue::Text(r#"[{"id":"0:4"},{"id":"0:9"}]"#.into()))
        );
    }

    #[test]
    fn delete_can_be_cancelled() {
        let api = Canned::ok(snapshot_list());
        let mut prompt = scripted(&["4", "q", "no"]);

        delete_snapshots(&mut prompt, &api, &session(), 3).unwrap();

        assert!(printed(&prompt).contains("Deletion cancelled"));
        assert_eq!(api.last().method, "List");
    }

    #[test]
    fn delete_stops_on_closed_input() {
        let api = Canned::ok(snapshot_list());
        let mut prompt = scripted(&["4"]);

        delete_snapshots(&mut prompt, &api, &session(), 3).unwrap();

        assert!(printed(&prompt).contains("Deletion cancelled"));
        assert_eq!(api.last().method, "List");
    }

    #[test]
    fn enable_disable_accepts_lower_case() {
        let api = Canned::ok(serde_json::Value::Null);
        let mut prompt = scripted(&["d"]);

        enable_disable(&mut prompt, &api, &session(), 5).unwrap();

        assert_eq!(api.last().method, "Disable");
        assert_eq!(api.last().get("idList"), Some(&ParamValue::Text("5".into())));
        assert!(printed(&prompt).contains("Camera 5 disabled"));
    }

    #[test]
    fn enable_disable_rejects_other_input() {
        let api = Canned::ok(serde_json::Value::Null);
        let mut prompt = scripted(&["x"]);

        enable_disable(&mut prompt, &api, &session(), 5).unwrap();

        assert!(printed(&prompt).contains("Invalid command."));
        assert!(api.commands.borrow().is_empty());
    }

    #[test]
    fn recordings_show_length() {
        let api = Canned::ok(json!({"recordings": [
            {"id": 31, "cameraId": 2, "startTime": 1000, "stopTime": 1125}
        ]}));
        let mut prompt = scripted(&[]);

        recording_list(&mut prompt, &api, &session()).unwrap();

        assert!(printed(&prompt).contains("Length: 02:05"));
    }

    #[test]
    fn remote_errors_are_returned() {
        let api = Canned::err(RemoteError::Rejected { code: 105 });
        let mut prompt = scripted(&[]);

        let err = preset_list(&mut prompt, &api, &session(), 3).unwrap_err();
        assert!(matches!(err, ActionError::Remote(RemoteError::Rejected { code: 105 })));
    }

    #[test]
    fn missing_live_path_is_reported() {
        let api = Canned::ok(serde_json::Value::Null);
        let mut prompt = scripted(&[]);

        live_path(&mut prompt, &api, &session(), 3).unwrap();

        assert!(printed(&prompt).contains("No live view path"));
    }
}
