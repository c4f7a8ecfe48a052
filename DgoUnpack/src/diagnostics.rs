//! Per-block decode diagnostics
//!
//! The container reader reports what it does with every block to a
//! [`DiagnosticsSink`]. Sinks only observe; they cannot change the outcome of
//! a decode. A sink is borrowed mutably for one decode, so parallel decodes
//! each use their own sink and merge afterwards.

use std::fmt;

/// Something that happened while decoding one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    /// Header validated
    HeaderParsed {
        declared_output_size: u32,
        initial_block_size: u32,
    },
    /// Stored sector copied to the output
    BlockCopied {
        index: usize,
        offset: usize,
        size: usize,
    },
    /// Compressed block decoded into the output
    BlockDecompressed {
        index: usize,
        offset: usize,
        compressed_size: usize,
        produced: usize,
    },
    /// Block stream finished
    EndOfStream { blocks: usize, trailing_bytes: usize },
    /// Decode aborted
    Failed { message: String },
}

impl fmt::Display for DecodeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeaderParsed {
                declared_output_size,
                initial_block_size,
            } => write!(
                f,
                "Decompressed filesize: {declared_output_size:08X} - First block_size: {initial_block_size:08X}"
            ),
            Self::BlockCopied { index, offset, size } => {
                write!(f, "Block {index} @ {offset:08X}: copied {size} byte sector")
            }
            Self::BlockDecompressed {
                index,
                offset,
                compressed_size,
                produced,
            } => write!(
                f,
                "Block {index} @ {offset:08X}: decompressed {compressed_size} byte sector into {produced} bytes"
            ),
            Self::EndOfStream {
                blocks,
                trailing_bytes: 0,
            } => write!(f, "End of stream after {blocks} blocks"),
            Self::EndOfStream {
                blocks,
                trailing_bytes,
            } => write!(
                f,
                "End of stream after {blocks} blocks ({trailing_bytes} trailing bytes ignored)"
            ),
            Self::Failed { message } => write!(f, "Decode error: {message}"),
        }
    }
}

/// Receiver for [`DecodeEvent`]s.
pub trait DiagnosticsSink {
    fn record(&mut self, event: DecodeEvent);
}

impl<S: DiagnosticsSink + ?Sized> DiagnosticsSink for &mut S {
    fn record(&mut self, event: DecodeEvent) {
        (**self).record(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&mut self, _event: DecodeEvent) {}
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&mut self, event: DecodeEvent) {
        match &event {
            DecodeEvent::BlockCopied { .. } | DecodeEvent::BlockDecompressed { .. } => {
                tracing::trace!("{event}");
            }
            DecodeEvent::Failed { .. } => tracing::warn!("{event}"),
            _ => tracing::debug!("{event}"),
        }
    }
}

/// Collects events in order for one decode.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<DecodeEvent>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[DecodeEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Render every event as one line each.
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.events.iter().map(ToString::to_string)
    }

    pub fn into_events(self) -> Vec<DecodeEvent> {
        self.events
    }
}

impl DiagnosticsSink for EventLog {
    fn record(&mut self, event: DecodeEvent) {
        self.events.push(event);
    }
}
