//! Input normalisation
//!
//! Keyboard, mouse, pointer and touch all collapse into `InputEvent`s
//! here, so nothing downstream ever looks at a browser event shape.

/// Source-agnostic commands consumed by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    AscendStart,
    AscendEnd,
    /// Start-screen interaction
    Start,
    /// Discard the current session and return to the start screen
    Reset,
    /// Toggle the demo autopilot
    ToggleDemo,
}

/// Key transition direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Down,
    Up,
}

/// Map a `KeyboardEvent.key` value. Auto-repeat downs are dropped.
pub fn from_key(key: &str, state: KeyState, repeat: bool) -> Option<InputEvent> {
    if repeat && state == KeyState::Down {
        return None;
    }
    match (key, state) {
        ("ArrowUp" | "w" | "W" | " ", KeyState::Down) => Some(InputEvent::AscendStart),
        ("ArrowUp" | "w" | "W" | " ", KeyState::Up) => Some(InputEvent::AscendEnd),
        ("Enter", KeyState::Down) => Some(InputEvent::Start),
        ("r" | "R", KeyState::Down) => Some(InputEvent::Reset),
        ("i" | "I", KeyState::Down) => Some(InputEvent::ToggleDemo),
        _ => None,
    }
}

/// Mouse, pointer and touch presses all mean "ascend while held"
pub fn from_press(pressed: bool) -> InputEvent {
    if pressed {
        InputEvent::AscendStart
    } else {
        InputEvent::AscendEnd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascend_keys() {
        for key in ["ArrowUp", "w", "W", " "] {
            assert_eq!(from_key(key, KeyState::Down, false), Some(InputEvent::AscendStart));
            assert_eq!(from_key(key, KeyState::Up, false), Some(InputEvent::AscendEnd));
        }
    }

    #[test]
    fn test_repeat_is_ignored() {
        assert_eq!(from_key("ArrowUp", KeyState::Down, true), None);
        assert_eq!(from_key("ArrowUp", KeyState::Up, true), Some(InputEvent::AscendEnd));
    }

    #[test]
    fn test_commands_and_unknown_keys() {
        assert_eq!(from_key("Enter", KeyState::Down, false), Some(InputEvent::Start));
        assert_eq!(from_key("R", KeyState::Down, false), Some(InputEvent::Reset));
        assert_eq!(from_key("i", KeyState::Down, false), Some(InputEvent::ToggleDemo));
        assert_eq!(from_key("Enter", KeyState::Up, false), None);
        assert_eq!(from_key("ArrowDown", KeyState::Down, false), None);
    }

    #[test]
    fn test_press_mapping() {
        assert_eq!(from_press(true), InputEvent::AscendStart);
        assert_eq!(from_press(false), InputEvent::AscendEnd);
    }
}
