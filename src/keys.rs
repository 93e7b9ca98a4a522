//! Key bindings for the reviews screen.

use bubbletea_rs::KeyMsg;
use crossterm::event::KeyCode;

/// A set of keys that trigger one action, with help text.
#[derive(Debug, Clone)]
pub struct Binding {
    /// Keys that trigger the binding.
    pub keys: Vec<KeyCode>,
    /// Short key label, e.g. "↓/j".
    pub help: String,
    /// What the binding does.
    pub description: String,
}

impl Binding {
    /// Creates a binding with no help text.
    pub fn new(keys: Vec<KeyCode>) -> Self {
        Self {
            keys,
            help: String::new(),
            description: String::new(),
        }
    }

    /// Sets the key label and description.
    pub fn with_help(mut self, help: impl Into<String>, description: impl Into<String>) -> Self {
        self.help = help.into();
        self.description = description.into();
        self
    }

    /// True if `msg` is one of this binding's keys.
    pub fn matches(&self, msg: &KeyMsg) -> bool {
        self.keys.contains(&msg.key)
    }
}

/// Every binding the reviews screen reacts to.
#[derive(Debug, Clone)]
pub struct ReviewsKeyMap {
    /// Select the previous row.
    pub up: Binding,
    /// Select the next row.
    pub down: Binding,
    /// Scroll up one screen.
    pub page_up: Binding,
    /// Scroll down one screen.
    pub page_down: Binding,
    /// Show the full text of the selected review.
    pub expand: Binding,
    /// Manual refresh.
    pub refresh: Binding,
}

impl Default for ReviewsKeyMap {
    fn default() -> Self {
        Self {
            up: Binding::new(vec![KeyCode::Up, KeyCode::Char('k')]).with_help("↑/k", "up"),
            down: Binding::new(vec![KeyCode::Down, KeyCode::Char('j')]).with_help("↓/j", "down"),
            page_up: Binding::new(vec![KeyCode::PageUp, KeyCode::Char('b')])
                .with_help("pgup/b", "page up"),
            page_down: Binding::new(vec![KeyCode::PageDown, KeyCode::Char('f')])
                .with_help("pgdn/f", "page down"),
            expand: Binding::new(vec![KeyCode::Enter, KeyCode::Char(' ')])
                .with_help("enter", "show more"),
            refresh: Binding::new(vec![KeyCode::Char('r')]).with_help("r", "refresh"),
        }
    }
}

impl ReviewsKeyMap {
    /// Bindings in help order.
    pub fn bindings(&self) -> Vec<&Binding> {
        vec![
            &self.up,
            &self.down,
            &self.page_up,
            &self.page_down,
            &self.expand,
            &self.refresh,
        ]
    }

    /// One-line help, e.g. `↑/k up • ↓/j down`.
    pub fn short_help(&self) -> String {
        self.bindings()
            .iter()
            .map(|b| format!("{} {}", b.help, b.description))
            .collect::<Vec<_>>()
            .join(" • ")
    }
}
