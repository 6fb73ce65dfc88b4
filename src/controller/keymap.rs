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

//! Key bindings for the PTZ controller.
//!
//! Both the key-down and key-up paths resolve keys through [`resolve`], so
//! the letter and arrow aliases can never disagree.

use crate::controller::state::Direction;

/// Keys that are not characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum NamedKey {
    Up,
    Down,
    Left,
    Right,
    Esc,
    Enter,
    Tab,
    Backspace,
    Function(u8),
    Other,
}

/// The identity of a physical key, independent of the input backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyIdentity {
    Char(char),
    Named(NamedKey),
}

/// What a key means to the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyAction {
    Move(Direction),
    Exit,
}

/// Resolves a key to its controller action, `None` for unbound keys.
pub(crate) fn resolve(key: KeyIdentity) -> Option<KeyAction> {
    let action = match key {
        KeyIdentity::Char(c) => match c.to_ascii_lowercase() {
            'w' => KeyAction::Move(Direction::Up),
            's' => KeyAction::Move(Direction::Down),
            'a' => KeyAction::Move(Direction::Left),
            'd' => KeyAction::Move(Direction::Right),
            _ => return None,
        },
        KeyIdentity::Named(NamedKey::Up) => KeyAction::Move(Direction::Up),
        KeyIdentity::Named(NamedKey::Down) => KeyAction::Move(Direction::Down),
        KeyIdentity::Named(NamedKey::Left) => KeyAction::Move(Direction::Left),
        KeyIdentity::Named(NamedKey::Right) => KeyAction::Move(Direction::Right),
        KeyIdentity::Named(NamedKey::Esc) => KeyAction::Exit,
        KeyIdentity::Named(_) => return None,
    };
    Some(action)
}

/// Resolves a key to a direction, ignoring the exit key.
pub(crate) fn direction_for(key: KeyIdentity) -> Option<Direction> {
    match resolve(key)? {
        KeyAction::Move(direction) => Some(direction),
        KeyAction::Exit => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_arrows_share_directions() {
        let pairs = [
            ('w', NamedKey::Up, Direction::Up),
            ('s', NamedKey::Down, Direction::Down),
            ('a', NamedKey::Left, Direction::Left),
            ('d', NamedKey::Right, Direction::Right),
        ];
        for (letter, arrow, direction) in pairs {
            assert_eq!(direction_for(KeyIdentity::Char(letter)), Some(direction));
            assert_eq!(direction_for(KeyIdentity::Named(arrow)), Some(direction));
        }
    }

    #[test]
    fn letters_are_case_insensitive() {
        assert_eq!(
            resolve(KeyIdentity::Char('W')),
            Some(KeyAction::Move(Direction::Up))
        );
    }

    #[test]
    fn escape_is_exit() {
        assert_eq!(resolve(KeyIdentity::Named(NamedKey::Esc)), Some(KeyAction::Exit));
        assert_eq!(direction_for(KeyIdentity::Named(NamedKey::Esc)), None);
    }

    #[test]
    fn unbound_keys_resolve_to_nothing() {
        assert_eq!(resolve(KeyIdentity::Char('q')), None);
        assert_eq!(resolve(KeyIdentity::Char(' ')), None);
        assert_eq!(resolve(KeyIdentity::Named(NamedKey::Enter)), None);
        assert_eq!(resolve(KeyIdentity::Named(NamedKey::Function(1))), None);
    }
}
