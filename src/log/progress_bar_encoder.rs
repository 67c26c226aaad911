//! Log lines written while the rounds progress bar is drawn would otherwise leave the tail of
//! the bar on screen.

use log::Record;
use log4rs::encode::{Encode, Write};

/// Wraps an encoder and clears the current terminal line before every record.
#[derive(Debug)]
pub struct ClearLineEncoder {
    inner: Box<dyn Encode>,
}

impl ClearLineEncoder {
    pub fn new(inner: Box<dyn Encode>) -> Self {
        Self { inner }
    }
}

impl Encode for ClearLineEncoder {
    fn encode(&self, w: &mut dyn Write, record: &Record) -> anyhow::Result<()> {
        // Erase the whole line, then return the cursor to column 0.
        w.write_all(b"\x1B[2K\r")?;
        self.inner.encode(w, record)
    }
}
