use std::io::{self, Write};
use std::sync::Mutex;

use harvester_core::render_bar;

use crate::{ProgressEvent, Stage};

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);

    /// Called once a stage stops reporting, whether or not it reached its total.
    fn finish(&self, _stage: Stage) {}
}

/// Helper so pipeline code does not have to build events by hand.
pub(crate) fn report(
    sink: &dyn ProgressSink,
    stage: Stage,
    label: &str,
    current: usize,
    total: usize,
) {
    if total == 0 {
        return;
    }
    sink.emit(ProgressEvent {
        stage,
        label: label.to_string(),
        current,
        total,
    });
}

struct BarState<W> {
    out: W,
    /// Width of the bar currently on screen; zero once the line is ended.
    open_width: usize,
}

/// Draws a bar on a terminal, rewriting the line until the stage finishes.
pub struct TerminalProgress<W = io::Stdout> {
    state: Mutex<BarState<W>>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write + Send> TerminalProgress<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            state: Mutex::new(BarState { out, open_width: 0 }),
        }
    }

    pub fn into_inner(self) -> W {
        match self.state.into_inner() {
            Ok(state) => state.out,
            Err(poisoned) => poisoned.into_inner().out,
        }
    }
}

impl<W: Write + Send> ProgressSink for TerminalProgress<W> {
    fn emit(&self, event: ProgressEvent) {
        let Some(line) = render_bar(event.current, event.total, &event.label) else {
            return;
        };
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        let width = line.text.chars().count();
        // Blank out whatever a longer previous bar left behind.
        let padding = state.open_width.saturating_sub(width);
        let _ = write!(state.out, "\r{}{:padding$}", line.text, "");
        if line.complete {
            let _ = writeln!(state.out);
            state.open_width = 0;
        } else {
            state.open_width = width;
        }
        let _ = state.out.flush();
    }

    fn finish(&self, _stage: Stage) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.open_width > 0 {
            let _ = writeln!(state.out);
            let _ = state.out.flush();
            state.open_width = 0;
        }
    }
}

/// Discards every event; used with `--quiet`.
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn emit(&self, _event: ProgressEvent) {}
}
