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

//! Colours used by the controller screen.

use ratatui::style::Color;

#[derive(Clone, Copy)]
pub(crate) struct Theme {
    pub(crate) accent_colour: Color,
    pub(crate) border_colour: Color,
    pub(crate) idle_pad_colour: Color,
    pub(crate) active_pad_colour: Color,
    pub(crate) ok_colour: Color,
    pub(crate) error_colour: Color,
    pub(crate) muted_colour: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    pub(crate) const fn default_theme() -> Self {
        Self {
            accent_colour: Color::Rgb(250, 189, 47),
            border_colour: Color::Rgb(102, 102, 102),
            idle_pad_colour: Color::Rgb(50, 30, 60),
            active_pad_colour: Color::Rgb(250, 189, 47),
            ok_colour: Color::Rgb(152, 195, 121),
            error_colour: Color::Rgb(224, 108, 117),
            muted_colour: Color::Rgb(162, 161, 166),
        }
    }
}
