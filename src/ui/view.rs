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

//! Screen state for the controller, built from [`ControllerEvent`]s.

use std::collections::VecDeque;

use crate::controller::{ControllerEvent, Direction, ExitReason, Lifecycle, MotionReport, Phase};

/// Number of motion reports kept on screen.
pub(crate) const HISTORY_LEN: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct HistoryLine {
    pub(crate) text: String,
    pub(crate) failed: bool,
}

impl From<&MotionReport> for HistoryLine {
    fn from(report: &MotionReport) -> Self {
        let prefix = if report.cleanup { "[exit] " } else { "" };
        match &report.outcome {
            Ok(()) => Self {
                text: format!("{}{} ok", prefix, report.intent),
                failed: false,
            },
            Err(e) => Self {
                text: format!("{}{} failed ({}): {}", prefix, report.intent, e.category(), e),
                failed: true,
            },
        }
    }
}

pub(crate) struct ControllerView {
    pub(crate) camera_label: String,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) active: Option<Direction>,
    pub(crate) history: VecDeque<HistoryLine>,
    pub(crate) failures: usize,
    pub(crate) exit: Option<ExitReason>,
}

impl ControllerView {
    pub(crate) fn new(camera_label: impl Into<String>) -> Self {
        Self {
            camera_label: camera_label.into(),
            lifecycle: Lifecycle::Idle,
            active: None,
            history: VecDeque::with_capacity(HISTORY_LEN),
            failures: 0,
            exit: None,
        }
    }

    /// Applies one controller event.
    ///
    /// The active direction follows the intents, not their outcomes, matching
    /// the controller which never rolls back a transition on failure.
    pub(crate) fn apply(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::Started => self.lifecycle = Lifecycle::Running,
            ControllerEvent::Motion(report) => {
                match report.intent.phase {
                    Phase::Start => self.active = Some(report.intent.direction),
                    Phase::Stop => self.active = None,
                }
                if report.outcome.is_err() {
                    self.failures += 1;
                }
                if self.history.len() == HISTORY_LEN {
                    self.history.pop_front();
                }
                self.history.push_back(HistoryLine::from(&report));
            }
            ControllerEvent::Exited(reason) => {
                self.lifecycle = Lifecycle::Stopped;
                self.exit = Some(reason);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::RemoteError, controller::MotionIntent};

    fn report(intent: MotionIntent, ok: bool, cleanup: bool) -> ControllerEvent {
        ControllerEvent::Motion(MotionReport {
            intent,
            outcome: if ok { Ok(()) } else { Err(RemoteError::Rejected { code: 105 }) },
            cleanup,
        })
    }

    #[test]
    fn follows_lifecycle() {
        let mut view = ControllerView::new("Camera 1");
        assert_eq!(view.lifecycle, Lifecycle::Idle);

        view.apply(ControllerEvent::Started);
        assert_eq!(view.lifecycle, Lifecycle::Running);

        view.apply(ControllerEvent::Exited(ExitReason::ExitKey));
        assert_eq!(view.lifecycle, Lifecycle::Stopped);
        assert_eq!(view.exit, Some(ExitReason::ExitKey));
    }

    #[test]
    fn tracks_active_direction_even_on_failure() {
        let mut view = ControllerView::new("Camera 1");

        view.apply(report(MotionIntent::start(Direction::Left), false, false));
        assert_eq!(view.active, Some(Direction::Left));
        assert_eq!(view.failures, 1);

        view.apply(report(MotionIntent::stop(Direction::Left), true, true));
        assert_eq!(view.active, None);

        let last = view.history.back().unwrap();
        assert_eq!(last.text, "[exit] Stop(left) ok");
        assert!(!last.failed);
        assert!(view.history[0].failed);
        assert!(view.history[0].text.starts_with("Start(left) failed (rejected): API code 105"));
    }

    #[test]
    fn history_is_bounded() {
        let mut view = ControllerView::new("Camera 1");
        for _ in 0..HISTORY_LEN + 3 {
            view.apply(report(MotionIntent::start(Direction::Up), true, false));
            view.apply(report(MotionIntent::stop(Direction::Up), true, false));
        }
        assert_eq!(view.history.len(), HISTORY_LEN);
    }
}
