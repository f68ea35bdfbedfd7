#![forbid(unsafe_code)]

//! Key bindings: shortcut matching and shortcut display text.
//!
//! A [`KeyBinding`] is stored normalized: letters are lowercase and an
//! uppercase letter implies [`Modifiers::SHIFT`]. Terminals disagree on
//! whether `Ctrl+Shift+P` arrives as `P`, `p`+SHIFT, or `P`+SHIFT, so
//! incoming events are normalized the same way before comparison.

use std::fmt;

use crate::event::{KeyCode, KeyEvent, Modifiers};

/// Modifiers that take part in matching. `SUPER` is too unreliable across
/// terminals to distinguish bindings.
const MATCHED_MODIFIERS: Modifiers = Modifiers::CTRL
    .union(Modifiers::ALT)
    .union(Modifiers::SHIFT);

/// A keyboard shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    code: KeyCode,
    modifiers: Modifiers,
}

impl KeyBinding {
    /// Create a binding from a key code and modifiers.
    #[must_use]
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        let (code, modifiers) = normalize(code, modifiers);
        Self { code, modifiers }
    }

    /// `Ctrl+<c>`.
    #[must_use]
    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::CTRL)
    }

    /// The normalized key code.
    #[must_use]
    pub const fn code(&self) -> KeyCode {
        self.code
    }

    /// The normalized modifiers.
    #[must_use]
    pub const fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether `event` triggers this binding.
    #[must_use]
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let (code, modifiers) = normalize(event.code, event.modifiers);
        code == self.code && modifiers == self.modifiers
    }
}

fn normalize(code: KeyCode, modifiers: Modifiers) -> (KeyCode, Modifiers) {
    let mut modifiers = modifiers & MATCHED_MODIFIERS;
    let code = match code {
        KeyCode::Char(c) if c.is_ascii_uppercase() => {
            modifiers |= Modifiers::SHIFT;
            KeyCode::Char(c.to_ascii_lowercase())
        }
        KeyCode::BackTab => {
            modifiers |= Modifiers::SHIFT;
            KeyCode::Tab
        }
        other => other,
    };
    (code, modifiers)
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CTRL, "Ctrl+"),
            (Modifiers::ALT, "Alt+"),
            (Modifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                f.write_str(name)?;
            }
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::Enter => f.write_str("Enter"),
            KeyCode::Escape => f.write_str("Esc"),
            KeyCode::Backspace => f.write_str("Backspace"),
            KeyCode::Tab | KeyCode::BackTab => f.write_str("Tab"),
            KeyCode::Delete => f.write_str("Del"),
            KeyCode::Home => f.write_str("Home"),
            KeyCode::End => f.write_str("End"),
            KeyCode::PageUp => f.write_str("PgUp"),
            KeyCode::PageDown => f.write_str("PgDown"),
            KeyCode::Up => f.write_str("Up"),
            KeyCode::Down => f.write_str("Down"),
            KeyCode::Left => f.write_str("Left"),
            KeyCode::Right => f.write_str("Right"),
            KeyCode::F(n) => write!(f, "F{n}"),
        }
    }
}
