//! JSON-lines render driver
//!
//! Writes every display update as one `UpdateEnvelope` object per line, for
//! an external render layer reading our stdout.

use chrono::{DateTime, Local};
use countdown_api::{DisplayUpdate, UpdateEnvelope};
use countdown_host_api::{RenderDriver, RenderError, RenderResult};
use std::io::Write;

pub struct JsonRenderer<W: Write> {
    out: W,
    /// Timestamp stamped on envelopes; the instant of the tick in progress
    tick_time: DateTime<Local>,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            tick_time: countdown_util::now(),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderDriver for JsonRenderer<W> {
    fn begin_tick(&mut self, now: DateTime<Local>) {
        self.tick_time = now;
    }

    fn apply(&mut self, update: &DisplayUpdate) -> RenderResult<()> {
        let envelope = UpdateEnvelope::new(self.tick_time, update.clone());
        let line =
            serde_json::to_string(&envelope).map_err(|e| RenderError::Encode(e.to_string()))?;
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    fn end_tick(&mut self, _now: DateTime<Local>) -> RenderResult<()> {
        self.out.flush()?;
        Ok(())
    }
}
