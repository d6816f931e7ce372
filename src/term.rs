//! Terminal acquisition and raw-mode control
//!
//! ## term/ Invariants
//!
//! - Raw mode is entered before any input processing begins.
//! - The saved termios state is restored on drop, which runs on normal
//!   exit and during panic unwinding alike.
//! - Reads block for at most VTIME (300 ms); the event loop is never
//!   parked indefinitely.
//! - This module never touches editor internals; it moves bytes.

use std::io;

use crate::error::{Error, Result};

/// Terminal dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub rows: u16,
    pub cols: u16,
}

/// Raw-mode terminal over stdin/stdout
///
/// Construction verifies stdin is a TTY, saves the current termios
/// state, and switches to raw mode: canonical processing, echo,
/// signals, CR translation, flow control, and parity stripping off;
/// output post-processing stays on so `\n` still produces a proper
/// line terminator. `VMIN=0`/`VTIME=3` turns reads into 300 ms polls.
pub struct Terminal {
    saved: libc::termios,
}

impl Terminal {
    pub fn acquire() -> Result<Self> {
        if unsafe { libc::isatty(libc::STDIN_FILENO) } == 0 {
            return Err(Error::NotATerminal);
        }

        let mut saved: libc::termios = unsafe { std::mem::zeroed() };
        if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &mut saved) } != 0 {
            return Err(Error::Io(io::Error::last_os_error()));
        }

        let mut raw = saved;
        raw.c_iflag &= !(libc::ICRNL | libc::IXON | libc::INPCK | libc::ISTRIP | libc::BRKINT);
        raw.c_oflag |= libc::OPOST;
        raw.c_cflag |= libc::CS8;
        raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN);
        raw.c_cc[libc::VMIN] = 0;
        raw.c_cc[libc::VTIME] = 3;

        if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &raw) } != 0 {
            return Err(Error::Io(io::Error::last_os_error()));
        }

        tracing::debug!("entered raw mode");
        Ok(Terminal { saved })
    }

    /// Current terminal size via ioctl, with a conservative fallback
    /// when the kernel reports zeros
    pub fn size(&self) -> Size {
        let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
        let ok =
            unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) } == 0;
        if !ok || ws.ws_row == 0 || ws.ws_col == 0 {
            return Size { rows: 24, cols: 80 };
        }
        Size {
            rows: ws.ws_row,
            cols: ws.ws_col,
        }
    }

    /// Read whatever input is pending, blocking at most VTIME.
    /// Returns 0 on timeout; EINTR (a signal such as window resize)
    /// also reads as "no data this round".
    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let n = unsafe {
            libc::read(
                libc::STDIN_FILENO,
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
            )
        };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(0);
            }
            return Err(Error::Io(err));
        }
        Ok(n as usize)
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // Restore the exact saved state; failure here is unreportable
        unsafe {
            libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, &self.saved);
        }
        tracing::debug!("restored terminal state");
    }
}
