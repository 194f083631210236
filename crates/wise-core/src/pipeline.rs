//! Composable history-processing pipeline.
//!
//! A pipeline is a chain of stages, each one wrapping the next: the
//! [`HistorySupplier`] feeds raw history entries into the outermost
//! [`Sink`], filters and transformers pass items along, and a terminal
//! taker consumes them. Every stage reports one of three outcomes per
//! item — continue, stop, or error — so cancellation is explicit control
//! flow rather than an overloaded error path.
//!
//! Stages run strictly sequentially: a later history page is never
//! fetched before the current page has fully drained through the chain,
//! which preserves the descending-position ordering guarantee.

pub mod stages;
pub mod supplier;

pub use stages::{
    DecodeStage, FilterDecision, FilterStage, Limiter, PositionCutoffFilter, PositionFilterMode,
    TakerSink, TransformStage,
};
pub use supplier::HistorySupplier;

use crate::error::Result;

/// What a sink tells its upstream after consuming one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Keep the stream going.
    Continue,
    /// Terminate the stream; no more items will be accepted.
    Stop,
}

impl Control {
    /// Whether this outcome terminates the stream.
    #[must_use]
    pub fn is_stop(&self) -> bool {
        matches!(self, Control::Stop)
    }
}

/// A pipeline stage or terminal consumer.
///
/// `feed` returns `Ok(Continue)` to request more items, `Ok(Stop)` to
/// terminate the stream early, or `Err` to abort the whole chain.
pub trait Sink<T>: Send {
    /// Consume one item.
    fn feed(&mut self, item: T) -> Result<Control>;
}
