//! Editor mode definitions

use crate::constants::modes;

/// Editor operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Normal mode (command dispatch)
    #[default]
    Normal,
    /// Insert mode (literal text entry)
    Insert,
    /// Select mode (motions extend the selection)
    Select,
    /// Command mode (`:` command line)
    Command,
}

impl Mode {
    /// Status-line name
    pub fn name(&self) -> &'static str {
        match self {
            Mode::Normal => modes::NORMAL,
            Mode::Insert => modes::INSERT,
            Mode::Select => modes::SELECT,
            Mode::Command => modes::COMMAND,
        }
    }
}
