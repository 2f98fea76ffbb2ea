//! Keyboard bindings and input handling.
//!
//! Centralizes all keyboard shortcuts and key mapping logic.

use nannou::prelude::*;

/// Actions that can be triggered by key presses
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // App-level
    Quit,
    ShowHelp,

    // Device search mode navigation
    SearchCancel,
    SearchMoveUp,
    SearchMoveDown,
    SearchBackspace,
    SearchConfirm,
    SearchInput(char),

    // Scene picker mode navigation
    PickerShow,
    PickerHide,
    PickerMoveUp,
    PickerMoveDown,
    PickerSelect,

    // Normal mode
    StartSearch,
    CycleScene,
    SelectScene(usize),
    TogglePlayback,
    SeekForward,
    SeekBackward,
    CyclePreset,
    SavePreset,
    ToggleGrid,
    ToggleWireframe,
    ToggleDebug,
}

/// Convert a Key to a character (alphanumeric and filename chars)
pub fn key_to_char(key: Key, shift: bool) -> Option<char> {
    let c = match key {
        Key::A => 'a',
        Key::B => 'b',
        Key::C => 'c',
        Key::D => 'd',
        Key::E => 'e',
        Key::F => 'f',
        Key::G => 'g',
        Key::H => 'h',
        Key::I => 'i',
        Key::J => 'j',
        Key::K => 'k',
        Key::L => 'l',
        Key::M => 'm',
        Key::N => 'n',
        Key::O => 'o',
        Key::P => 'p',
        Key::Q => 'q',
        Key::R => 'r',
        Key::S => 's',
        Key::T => 't',
        Key::U => 'u',
        Key::V => 'v',
        Key::W => 'w',
        Key::X => 'x',
        Key::Y => 'y',
        Key::Z => 'z',
        Key::Key0 => '0',
        Key::Key1 => '1',
        Key::Key2 => '2',
        Key::Key3 => '3',
        Key::Key4 => '4',
        Key::Key5 => '5',
        Key::Key6 => '6',
        Key::Key7 => '7',
        Key::Key8 => '8',
        Key::Key9 => '9',
        Key::Minus => '-',
        Key::Period => '.',
        Key::Underline => '_',
        Key::Space => ' ',
        _ => return None,
    };

    Some(if shift && c.is_alphabetic() {
        c.to_ascii_uppercase()
    } else {
        c
    })
}

fn digit(key: Key) -> Option<usize> {
    match key {
        Key::Key1 => Some(0),
        Key::Key2 => Some(1),
        Key::Key3 => Some(2),
        Key::Key4 => Some(3),
        Key::Key5 => Some(4),
        Key::Key6 => Some(5),
        Key::Key7 => Some(6),
        Key::Key8 => Some(7),
        Key::Key9 => Some(8),
        _ => None,
    }
}

/// Parse a key into an action based on current mode
pub fn parse_key(key: Key, shift: bool, search_active: bool, picker_active: bool) -> Option<Action> {
    // Search mode captures everything first (it needs free typing)
    if search_active {
        return match key {
            Key::Escape => Some(Action::SearchCancel),
            Key::Up => Some(Action::SearchMoveUp),
            Key::Down => Some(Action::SearchMoveDown),
            Key::Back => Some(Action::SearchBackspace),
            Key::Return => Some(Action::SearchConfirm),
            _ => key_to_char(key, shift).map(Action::SearchInput),
        };
    }

    // Global quit key
    if key == Key::Q {
        return Some(Action::Quit);
    }

    // Help toggle
    if key == Key::H {
        return Some(Action::ShowHelp);
    }

    // Scene picker mode bindings
    if picker_active {
        return match key {
            Key::Escape => Some(Action::PickerHide),
            Key::Up => Some(Action::PickerMoveUp),
            Key::Down => Some(Action::PickerMoveDown),
            Key::Return => Some(Action::PickerSelect),
            _ => None,
        };
    }

    // Normal mode bindings
    if let Some(idx) = digit(key) {
        return Some(Action::SelectScene(idx));
    }

    match key {
        Key::Slash => Some(Action::StartSearch),
        Key::Tab => Some(Action::CycleScene),
        Key::Space => Some(Action::TogglePlayback),
        Key::Right => Some(Action::SeekForward),
        Key::Left => Some(Action::SeekBackward),
        Key::P => Some(Action::CyclePreset),
        Key::S if shift => Some(Action::SavePreset),
        Key::G => Some(Action::ToggleGrid),
        Key::W => Some(Action::ToggleWireframe),
        Key::D => Some(Action::ToggleDebug),
        Key::Up | Key::Down => Some(Action::PickerShow),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_select_scenes_in_normal_mode() {
        assert_eq!(
            parse_key(Key::Key1, false, false, false),
            Some(Action::SelectScene(0))
        );
        assert_eq!(
            parse_key(Key::Key9, false, false, false),
            Some(Action::SelectScene(8))
        );
    }

    #[test]
    fn search_mode_captures_typing() {
        assert_eq!(
            parse_key(Key::Q, false, true, false),
            Some(Action::SearchInput('q'))
        );
        assert_eq!(
            parse_key(Key::Return, false, true, false),
            Some(Action::SearchConfirm)
        );
        assert_eq!(
            parse_key(Key::Escape, false, true, false),
            Some(Action::SearchCancel)
        );
    }

    #[test]
    fn quit_works_outside_search() {
        assert_eq!(parse_key(Key::Q, false, false, false), Some(Action::Quit));
        assert_eq!(parse_key(Key::Q, false, false, true), Some(Action::Quit));
    }

    #[test]
    fn picker_navigation_overrides_normal_keys() {
        assert_eq!(
            parse_key(Key::Up, false, false, true),
            Some(Action::PickerMoveUp)
        );
        assert_eq!(
            parse_key(Key::Return, false, false, true),
            Some(Action::PickerSelect)
        );
        // Digits do nothing while the picker is open
        assert_eq!(parse_key(Key::Key1, false, false, true), None);
    }

    #[test]
    fn shift_s_saves_a_preset() {
        assert_eq!(
            parse_key(Key::S, true, false, false),
            Some(Action::SavePreset)
        );
        assert_eq!(parse_key(Key::S, false, false, false), None);
    }
}
