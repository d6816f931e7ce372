//! Text buffer: a named document wrapping a rope
//!
//! The buffer owns its rope and its filepath and tracks the
//! modified/readonly flags plus creation/modification timestamps.
//! All positions cross this boundary as `(line, col)` pairs; byte
//! offsets are derived through the rope's conversions.

pub mod manager;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::{limits, ui};
use crate::error::{Error, Result};
use crate::rope::Rope;
use crate::selection::Position;

pub type BufferId = u64;

pub struct Buffer {
    pub id: BufferId,
    filepath: Option<PathBuf>,
    modified: bool,
    pub readonly: bool,
    created_ms: u64,
    modified_ms: u64,
    /// Monotonic edit counter for change detection
    revision: u64,
    rope: Rope,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl Buffer {
    /// Create an empty, unnamed buffer
    pub fn new(id: BufferId) -> Self {
        let now = now_ms();
        Buffer {
            id,
            filepath: None,
            modified: false,
            readonly: false,
            created_ms: now,
            modified_ms: now,
            revision: 0,
            rope: Rope::new(),
        }
    }

    /// Open `path` into a new buffer
    ///
    /// A nonexistent path yields an empty buffer that will be created
    /// on first save. Files over 100 MiB are refused; contents must be
    /// valid UTF-8.
    pub fn open_file(id: BufferId, path: &Path) -> Result<Self> {
        let mut buffer = Buffer::new(id);
        buffer.filepath = Some(path.to_path_buf());

        if !path.exists() {
            return Ok(buffer);
        }

        let meta = std::fs::metadata(path)?;
        if meta.len() > limits::MAX_FILE_SIZE {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{}: file exceeds 100 MiB", path.display()),
            )));
        }

        let bytes = std::fs::read(path)?;
        let text = String::from_utf8(bytes).map_err(|_| Error::NotUtf8 {
            path: path.to_path_buf(),
        })?;
        buffer.rope = Rope::from_str(&text);
        buffer.readonly = meta.permissions().readonly();
        Ok(buffer)
    }

    /// Buffer display name: filepath tail or `[No Name]`
    pub fn name(&self) -> String {
        self.filepath
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| ui::NO_NAME.to_string())
    }

    pub fn filepath(&self) -> Option<&Path> {
        self.filepath.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn created_ms(&self) -> u64 {
        self.created_ms
    }

    pub fn modified_ms(&self) -> u64 {
        self.modified_ms
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Write the rope's exact bytes to the buffer's filepath
    pub fn save(&mut self) -> Result<()> {
        let path = self.filepath.clone().ok_or(Error::NoFilepath)?;
        let mut file = std::fs::File::create(&path)?;
        self.rope.write_to(&mut file)?;
        file.flush()?;
        self.modified = false;
        self.modified_ms = now_ms();
        tracing::info!(path = %path.display(), bytes = self.rope.len(), "saved");
        Ok(())
    }

    /// Replace the owned filepath, then save
    pub fn save_as(&mut self, path: &Path) -> Result<()> {
        self.filepath = Some(path.to_path_buf());
        self.readonly = false;
        self.save()
    }

    /// Insert `text` at a `(line, col)` position
    pub fn insert(&mut self, pos: Position, text: &str) -> Result<()> {
        let byte = self.rope.line_col_to_byte(pos.line, pos.col);
        self.insert_at_byte(byte, text)
    }

    pub fn insert_at_byte(&mut self, byte: usize, text: &str) -> Result<()> {
        self.rope.insert(byte, text)?;
        self.touch();
        Ok(())
    }

    /// Delete the text between two positions
    pub fn delete(&mut self, start: Position, end: Position) -> Result<()> {
        let sb = self.rope.line_col_to_byte(start.line, start.col);
        let eb = self.rope.line_col_to_byte(end.line, end.col);
        self.delete_bytes(sb.min(eb), sb.max(eb))
    }

    pub fn delete_bytes(&mut self, start: usize, end: usize) -> Result<()> {
        self.rope.delete(start, end)?;
        self.touch();
        Ok(())
    }

    /// Replace the rope wholesale (undo/redo snapshot restore)
    pub fn restore_snapshot(&mut self, rope: Rope) {
        self.rope = rope;
        self.touch();
    }

    fn touch(&mut self) {
        self.modified = true;
        self.modified_ms = now_ms();
        self.revision += 1;
    }
}
