//! NBF text writer.
//!
//! Renders a [`BootScript`] as the line-oriented network boot format read by
//! the host loader. Every line is `XX_YY_EEEEEEEE_DDDDDDDD` in lower-case hex:
//! destination x, destination y, EPA and data.
//!
//! - A write is rendered as is.
//! - An unfreeze is a write of `0` to the freeze CSR of the tile.
//! - A fence is `ff_ff_00000000_00000000`.
//! - The finish sentinel is `ff_ff_ffffffff_ffffffff`.

use std::io::{self, Write};

use crate::boot::{BootCommand, BootScript};
use crate::common::constants::NBF_RESERVED_CORD;
use crate::tile::csr;

/// EPA field of the fence sentinel.
const FENCE_EPA: u64 = 0;
/// EPA field of the finish sentinel.
const FINISH_EPA: u64 = 0xffff_ffff;
/// Data field of the finish sentinel.
const FINISH_DATA: u32 = 0xffff_ffff;

/// Formats one NBF line (without the newline).
pub fn format_line(x: u32, y: u32, epa: u64, data: u32) -> String {
    format!("{x:02x}_{y:02x}_{epa:08x}_{data:08x}")
}

/// Formats one command as an NBF line (without the newline).
pub fn format_command(command: &BootCommand) -> String {
    match *command {
        BootCommand::Write { loc, value } => format_line(loc.x(), loc.y(), loc.epa, value),
        BootCommand::Unfreeze(coord) => format_line(coord.x, coord.y, csr::FREEZE, 0),
        BootCommand::Fence => format_line(NBF_RESERVED_CORD, NBF_RESERVED_CORD, FENCE_EPA, 0),
        BootCommand::Finish => {
            format_line(NBF_RESERVED_CORD, NBF_RESERVED_CORD, FINISH_EPA, FINISH_DATA)
        }
    }
}

/// Streams NBF lines to any [`Write`] sink.
#[derive(Debug)]
pub struct NbfWriter<W: Write> {
    out: W,
    lines: usize,
}

impl<W: Write> NbfWriter<W> {
    /// Wraps a sink.
    pub const fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    /// Writes one command.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors of the sink.
    pub fn write_command(&mut self, command: &BootCommand) -> io::Result<()> {
        writeln!(self.out, "{}", format_command(command))?;
        self.lines += 1;
        Ok(())
    }

    /// Writes every command of a script and flushes the sink.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors of the sink.
    pub fn write_script(&mut self, script: &BootScript) -> io::Result<()> {
        for command in script.commands() {
            self.write_command(command)?;
        }
        self.out.flush()
    }

    /// Number of lines written so far.
    pub const fn lines(&self) -> usize {
        self.lines
    }

    /// Returns the sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Renders a whole script to a string, one line per command.
pub fn render(script: &BootScript) -> String {
    let mut text = String::with_capacity(script.len() * 24);
    for command in script.commands() {
        text.push_str(&format_command(command));
        text.push('\n');
    }
    text
}
