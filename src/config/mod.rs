//! Editor configuration
//!
//! Line-oriented `key=value` file with `#` comments, looked up under
//! `$XDG_CONFIG_HOME/aesop/config` (falling back to
//! `$HOME/.config/aesop/config`). Unknown keys and malformed values
//! are logged and skipped; a missing file yields the defaults.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub tab_width: usize,
    pub expand_tabs: bool,
    pub line_numbers: bool,
    pub relative_line_numbers: bool,
    pub syntax_highlighting: bool,
    pub highlight_current_line: bool,
    pub search_case_sensitive: bool,
    pub search_wrap_around: bool,
    pub auto_pair_brackets: bool,
    /// Undo-tree depth bound; 0 = unbounded
    pub max_undo_history: usize,
    /// Selection-set size cap; 0 = unbounded
    pub max_cursors: usize,
    pub theme_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tab_width: 4,
            expand_tabs: true,
            line_numbers: true,
            relative_line_numbers: false,
            syntax_highlighting: true,
            highlight_current_line: false,
            search_case_sensitive: false,
            search_wrap_around: true,
            auto_pair_brackets: false,
            max_undo_history: 1000,
            max_cursors: 16,
            theme_name: String::from("dark"),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Parse config text over the defaults
    pub fn parse(text: &str) -> Self {
        let mut config = Config::default();
        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                tracing::warn!(line = lineno + 1, "config line has no '='");
                continue;
            };
            let key = key.trim();
            let value = value.trim();
            if !config.apply(key, value) {
                tracing::warn!(line = lineno + 1, key, value, "ignored config entry");
            }
        }
        config
    }

    fn apply(&mut self, key: &str, value: &str) -> bool {
        match key {
            "tab_width" => match value.parse::<usize>() {
                Ok(n) if n > 0 => {
                    self.tab_width = n;
                    true
                }
                _ => false,
            },
            "max_undo_history" => match value.parse::<usize>() {
                Ok(n) => {
                    self.max_undo_history = n;
                    true
                }
                _ => false,
            },
            "max_cursors" => match value.parse::<usize>() {
                Ok(n) => {
                    self.max_cursors = n;
                    true
                }
                _ => false,
            },
            "theme_name" => {
                self.theme_name = value.to_string();
                true
            }
            _ => {
                let Some(flag) = parse_bool(value) else {
                    return false;
                };
                match key {
                    "expand_tabs" => self.expand_tabs = flag,
                    "line_numbers" => self.line_numbers = flag,
                    "relative_line_numbers" => self.relative_line_numbers = flag,
                    "syntax_highlighting" => self.syntax_highlighting = flag,
                    "highlight_current_line" => self.highlight_current_line = flag,
                    "search_case_sensitive" => self.search_case_sensitive = flag,
                    "search_wrap_around" => self.search_wrap_around = flag,
                    "auto_pair_brackets" => self.auto_pair_brackets = flag,
                    _ => return false,
                }
                true
            }
        }
    }

    /// Config file location per XDG conventions
    pub fn path() -> Option<PathBuf> {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            if !xdg.is_empty() {
                return Some(PathBuf::from(xdg).join("aesop").join("config"));
            }
        }
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config").join("aesop").join("config"))
    }

    /// Load from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Config::path() else {
            return Config::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                tracing::info!(path = %path.display(), "loaded config");
                Config::parse(&text)
            }
            Err(_) => Config::default(),
        }
    }
}
