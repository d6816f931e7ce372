//! Global constants for the Aesop editor

pub mod ui {
    /// Display text for buffers with no file path
    pub const NO_NAME: &str = "[No Name]";

    /// Column separator between the gutter and buffer text
    pub const GUTTER_PAD: usize = 1;
}

pub mod errors {
    pub const MSG_UNSAVED_CHANGES: &str = "No write since last change";
    pub const MSG_NO_FILE_NAME: &str = "No file name";
}

pub mod history {
    pub const INSERT_LABEL: &str = "insert";
    pub const ALREADY_OLDEST: &str = "Already at oldest change";
    pub const ALREADY_NEWEST: &str = "Already at newest change";
}

pub mod modes {
    pub const NORMAL: &str = "NORMAL";
    pub const INSERT: &str = "INSERT";
    pub const SELECT: &str = "SELECT";
    pub const COMMAND: &str = "COMMAND";
}

pub mod limits {
    /// Largest file the editor will load, in bytes (100 MiB)
    pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;
}

pub mod timing {
    /// Sleep between event-loop iterations, bounding idle CPU
    pub const LOOP_SLEEP_MS: u64 = 5;
}
