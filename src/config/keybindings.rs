//! Keybinding configuration for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::tui::event::Action;

/// Configuration for all keybindings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub move_left: Vec<String>,
    pub move_right: Vec<String>,
    pub next_rover: Vec<String>,
    pub prev_rover: Vec<String>,
    pub edit_sol: Vec<String>,
    pub open_photo: Vec<String>,
    pub close: Vec<String>,
    pub load_more: Vec<String>,
    pub retry: Vec<String>,
    pub reload: Vec<String>,
    pub open_in_browser: Vec<String>,
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: keys(&["q", "Ctrl+c"]),
            move_up: keys(&["k", "Up"]),
            move_down: keys(&["j", "Down"]),
            move_left: keys(&["h", "Left"]),
            move_right: keys(&["l", "Right"]),
            next_rover: keys(&["Tab"]),
            prev_rover: keys(&["BackTab", "Shift+Tab"]),
            edit_sol: keys(&["e", "/"]),
            open_photo: keys(&["Enter"]),
            close: keys(&["Esc"]),
            load_more: keys(&["n", "PageDown"]),
            retry: keys(&["r"]),
            reload: keys(&["R"]),
            open_in_browser: keys(&["o"]),
        }
    }
}

impl KeybindingConfig {
    /// Get the action for a key event. Earlier entries win on conflicts.
    pub fn get_action(&self, key: &KeyEvent) -> Action {
        let table: [(&[String], Action); 14] = [
            (self.quit.as_slice(), Action::Quit),
            (self.move_up.as_slice(), Action::MoveUp),
            (self.move_down.as_slice(), Action::MoveDown),
            (self.move_left.as_slice(), Action::MoveLeft),
            (self.move_right.as_slice(), Action::MoveRight),
            (self.next_rover.as_slice(), Action::NextRover),
            (self.prev_rover.as_slice(), Action::PrevRover),
            (self.edit_sol.as_slice(), Action::EditSol),
            (self.open_photo.as_slice(), Action::OpenPhoto),
            (self.close.as_slice(), Action::Close),
            (self.load_more.as_slice(), Action::LoadMore),
            (self.retry.as_slice(), Action::Retry),
            (self.reload.as_slice(), Action::Reload),
            (self.open_in_browser.as_slice(), Action::OpenInBrowser),
        ];

        table
            .iter()
            .find(|(bindings, _)| matches_any(key, bindings))
            .map(|(_, action)| *action)
            .unwrap_or(Action::None)
    }
}

fn matches_any(key: &KeyEvent, bindings: &[String]) -> bool {
    bindings
        .iter()
        .filter_map(|b| parse_key_string(b).ok())
        .any(|b| b.matches(key))
}

/// A parsed key binding with code and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Check if this binding matches a key event. Shift is ignored when the
    /// binding doesn't ask for it, since terminals report `R` as Shift+R.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == (key.modifiers & !KeyModifiers::SHIFT))
    }
}

/// Parse a key string such as `"j"`, `"PageDown"` or `"Ctrl+Shift+a"`.
pub fn parse_key_string(s: &str) -> Result<KeyBinding, String> {
    let s = s.trim();
    // A lone "+" is a key, not a separator.
    let (mods, key_part) = match s.rsplit_once('+') {
        Some((mods, key)) if !key.is_empty() => (Some(mods), key),
        _ => (None, s),
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in mods.into_iter().flat_map(|m| m.split('+')) {
        modifiers |= match part.to_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "shift" => KeyModifiers::SHIFT,
            "alt" => KeyModifiers::ALT,
            _ => return Err(format!("Unknown modifier: {}", part)),
        };
    }

    Ok(KeyBinding {
        code: parse_key_code(key_part)?,
        modifiers,
    })
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    let lower = s.to_lowercase();
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
        if (1..=12).contains(&n) {
            return Ok(KeyCode::F(n));
        }
    }

    match lower.as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        "backtab" => Ok(KeyCode::BackTab),
        "backspace" | "bs" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdn" => Ok(KeyCode::PageDown),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "space" => Ok(KeyCode::Char(' ')),
        _ => Err(format!("Unknown key: {}", s)),
    }
}
