/// Keyboard key identifier.
///
/// Only the keys the watch host maps onto hardware buttons are named.
/// Everything else arrives as `Key::Unknown(u32)` with the platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Space,
    ArrowUp,
    ArrowDown,
    Q,

    /// Platform-dependent key not represented here.
    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Physical buttons of the watch, emulated from the keyboard.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Button {
    Back,
    Up,
    Select,
    Down,
}

impl Key {
    /// Maps a key to the watch button it emulates, if any.
    pub fn button(self) -> Option<Button> {
        match self {
            Key::Escape | Key::Q => Some(Button::Back),
            Key::ArrowUp => Some(Button::Up),
            Key::Enter | Key::Space => Some(Button::Select),
            Key::ArrowDown => Some(Button::Down),
            Key::Unknown(_) => None,
        }
    }
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    /// Window focus change.
    Focused(bool),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_and_q_are_back() {
        assert_eq!(Key::Escape.button(), Some(Button::Back));
        assert_eq!(Key::Q.button(), Some(Button::Back));
    }

    #[test]
    fn unknown_keys_have_no_button() {
        assert_eq!(Key::Unknown(42).button(), None);
    }
}
