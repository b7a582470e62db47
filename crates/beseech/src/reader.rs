//! Line readers over an abstract byte source.
//!
//! The engine never talks to a terminal API directly: it consumes bytes
//! from an [`InputSource`] and writes to a sink, so tests and scripted use
//! can substitute in-memory streams.

use std::io::{self, Read, Write};
use std::process;

use crate::error::Error;

/// Byte-level input collaborator.
///
/// `set_raw` failures are ignored by callers so the engine stays usable
/// when the stream is a pipe rather than a terminal.
pub trait InputSource: Send {
    /// Next byte, or `None` on end of stream.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    /// Toggle unbuffered per-character delivery without echo.
    fn set_raw(&mut self, enabled: bool) -> io::Result<()>;

    fn pause(&mut self) {}

    fn resume(&mut self) {}
}

/// Locked process stdin with crossterm raw-mode toggling.
#[derive(Debug, Default)]
pub struct StdinSource;

impl InputSource for StdinSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    fn set_raw(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            crossterm::terminal::enable_raw_mode()
        } else {
            crossterm::terminal::disable_raw_mode()
        }
    }
}

/// In-memory byte source for tests and scripted input. Raw-mode toggles are
/// recorded but otherwise no-ops.
#[derive(Debug, Default)]
pub struct MemorySource {
    data: Vec<u8>,
    position: usize,
    raw: bool,
}

impl MemorySource {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        MemorySource {
            data: data.into(),
            position: 0,
            raw: false,
        }
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }
}

impl InputSource for MemorySource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        match self.data.get(self.position) {
            Some(byte) => {
                self.position += 1;
                Ok(Some(*byte))
            }
            None => Ok(None),
        }
    }

    fn set_raw(&mut self, enabled: bool) -> io::Result<()> {
        self.raw = enabled;
        Ok(())
    }
}

/// Reads logical lines, visible or masked, from a boxed source.
pub struct Reader {
    source: Box<dyn InputSource>,
    /// A masked read terminated by `\r` leaves a `\n` in the stream; the
    /// next read swallows it.
    swallow_lf: bool,
}

impl Reader {
    pub fn new(source: Box<dyn InputSource>) -> Self {
        Reader {
            source,
            swallow_lf: false,
        }
    }

    pub fn pause(&mut self) {
        self.source.pause();
    }

    pub fn resume(&mut self) {
        self.source.resume();
    }

    /// One visible line: bytes up to `\n` with `\r`s dropped, trimmed.
    /// The source is paused again after the line is yielded.
    pub fn read_line(&mut self) -> Result<String, Error> {
        self.source.resume();
        let mut buf: Vec<u8> = Vec::new();
        loop {
            let byte = match self.source.read_byte() {
                Ok(Some(byte)) => byte,
                Ok(None) => {
                    self.source.pause();
                    if buf.is_empty() {
                        return Err(Error::Eof);
                    }
                    break;
                }
                Err(err) => {
                    self.source.pause();
                    return Err(err.into());
                }
            };
            if self.swallow_lf {
                self.swallow_lf = false;
                if byte == b'\n' {
                    continue;
                }
            }
            match byte {
                b'\n' => break,
                b'\r' => {}
                other => buf.push(other),
            }
        }
        self.source.pause();
        Ok(String::from_utf8_lossy(&buf).trim().to_string())
    }

    /// One masked line: raw-mode character-at-a-time accumulation with no
    /// echo. Backspace/DEL removes the last character; Ctrl-C or NUL
    /// terminates the process with status 1; `\n`, `\r`, and EOT finalize.
    pub fn read_line_hidden(&mut self, output: &mut dyn Write) -> Result<String, Error> {
        let _ = self.source.set_raw(true);
        self.source.resume();
        let mut buf = String::new();
        let mut pending: Vec<u8> = Vec::new();
        loop {
            let byte = match self.source.read_byte() {
                Ok(Some(byte)) => byte,
                Ok(None) => {
                    let _ = self.source.set_raw(false);
                    self.source.pause();
                    return Err(Error::Eof);
                }
                Err(err) => {
                    let _ = self.source.set_raw(false);
                    self.source.pause();
                    return Err(err.into());
                }
            };
            match byte {
                b'\n' | 0x04 => break,
                b'\r' => {
                    self.swallow_lf = true;
                    break;
                }
                0x03 | 0x00 => {
                    let _ = writeln!(output);
                    let _ = self.source.set_raw(false);
                    process::exit(1);
                }
                0x08 | 0x7f => {
                    buf.pop();
                    pending.clear();
                }
                other => {
                    pending.push(other);
                    if let Ok(chunk) = std::str::from_utf8(&pending) {
                        buf.push_str(chunk);
                        pending.clear();
                    } else if pending.len() >= 4 {
                        buf.push(char::REPLACEMENT_CHARACTER);
                        pending.clear();
                    }
                }
            }
        }
        let _ = self.source.set_raw(false);
        writeln!(output)?;
        self.source.pause();
        Ok(buf.trim().to_string())
    }
}
