//! Pipeline stages: filters, transformers, limiters and takers.
//!
//! Stages compose at compile time, each owning the next sink in the
//! chain (iterator-adapter style). The concrete domain stages —
//! [`PositionCutoffFilter`] and [`DecodeStage`] — cover the two uses
//! every history walk needs: cursor cutoffs and protocol decoding.

use std::marker::PhantomData;
use std::sync::Arc;

use crate::error::Result;
use crate::ledger::{HistoryEntry, OperationPosition, Positioned};
use crate::pipeline::{Control, Sink};
use crate::protocol::{DecodedOperation, Protocol};

// ============================================================================
// Generic stages
// ============================================================================

/// Verdict of a filter for one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterDecision {
    /// Pass the item downstream.
    Keep,
    /// Discard the item and keep the stream going.
    Drop,
    /// Discard the item and terminate the stream (irrecoverable cutoff).
    Stop,
}

/// Filter stage: keep/drop items by predicate, with optional early
/// termination.
pub struct FilterStage<F, S> {
    predicate: F,
    next: S,
}

impl<F, S> FilterStage<F, S> {
    /// Wrap `next` behind `predicate`.
    #[must_use]
    pub fn new(predicate: F, next: S) -> Self {
        Self { predicate, next }
    }
}

impl<T, F, S> Sink<T> for FilterStage<F, S>
where
    F: FnMut(&T) -> Result<FilterDecision> + Send,
    S: Sink<T>,
{
    fn feed(&mut self, item: T) -> Result<Control> {
        match (self.predicate)(&item)? {
            FilterDecision::Keep => self.next.feed(item),
            FilterDecision::Drop => Ok(Control::Continue),
            FilterDecision::Stop => Ok(Control::Stop),
        }
    }
}

/// Transformer stage: maps one item to zero or more downstream items.
///
/// If the downstream stops mid-burst, the remaining items of that burst
/// are discarded and the stop propagates.
pub struct TransformStage<I, F, S> {
    transform: F,
    next: S,
    _marker: PhantomData<fn(I)>,
}

impl<I, F, S> TransformStage<I, F, S> {
    /// Wrap `next` behind the mapping `transform`.
    #[must_use]
    pub fn new(transform: F, next: S) -> Self {
        Self {
            transform,
            next,
            _marker: PhantomData,
        }
    }
}

impl<I, O, F, S> Sink<I> for TransformStage<I, F, S>
where
    I: Send,
    F: FnMut(I) -> Result<Vec<O>> + Send,
    S: Sink<O>,
{
    fn feed(&mut self, item: I) -> Result<Control> {
        for out in (self.transform)(item)? {
            if self.next.feed(out)?.is_stop() {
                return Ok(Control::Stop);
            }
        }
        Ok(Control::Continue)
    }
}

/// Limiter stage: passes through up to `n` items, then signals
/// termination immediately after the n-th.
pub struct Limiter<S> {
    remaining: usize,
    next: S,
}

impl<S> Limiter<S> {
    /// Pass at most `n` items to `next`.
    #[must_use]
    pub fn new(n: usize, next: S) -> Self {
        Self { remaining: n, next }
    }
}

impl<T, S> Sink<T> for Limiter<S>
where
    T: Send,
    S: Sink<T>,
{
    fn feed(&mut self, item: T) -> Result<Control> {
        if self.remaining == 0 {
            return Ok(Control::Stop);
        }
        self.remaining -= 1;
        let control = self.next.feed(item)?;
        if self.remaining == 0 {
            return Ok(Control::Stop);
        }
        Ok(control)
    }
}

/// Terminal consumer adapting a closure.
///
/// The closure's [`Control`] return decides whether the pipeline keeps
/// running; any error it returns aborts the whole chain.
pub struct TakerSink<F> {
    take: F,
}

impl<F> TakerSink<F> {
    /// Build a taker from a consuming closure.
    #[must_use]
    pub fn new(take: F) -> Self {
        Self { take }
    }
}

impl<T, F> Sink<T> for TakerSink<F>
where
    F: FnMut(T) -> Result<Control> + Send,
{
    fn feed(&mut self, item: T) -> Result<Control> {
        (self.take)(item)
    }
}

// ============================================================================
// Domain stages
// ============================================================================

/// Compare mode for [`PositionCutoffFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFilterMode {
    /// Keep only items strictly below the cutoff; newer items are
    /// dropped. The stream keeps going (the cutoff bounds the newest
    /// accepted item, not the walk).
    Below,
    /// Keep items strictly above the cutoff and terminate the stream at
    /// the first item at or below it. In a descending stream everything
    /// after that point is older, so the walk can stop.
    Above,
}

/// Position-based cutoff filter over any positioned item.
pub struct PositionCutoffFilter<S> {
    mode: PositionFilterMode,
    cutoff: OperationPosition,
    next: S,
}

impl<S> PositionCutoffFilter<S> {
    /// Filter around `cutoff` with the given compare `mode`.
    #[must_use]
    pub fn new(mode: PositionFilterMode, cutoff: OperationPosition, next: S) -> Self {
        Self { mode, cutoff, next }
    }
}

impl<T, S> Sink<T> for PositionCutoffFilter<S>
where
    T: Positioned + Send,
    S: Sink<T>,
{
    fn feed(&mut self, item: T) -> Result<Control> {
        let position = item.position();
        match self.mode {
            PositionFilterMode::Below => {
                if position < self.cutoff {
                    self.next.feed(item)
                } else {
                    Ok(Control::Continue)
                }
            }
            PositionFilterMode::Above => {
                if position > self.cutoff {
                    self.next.feed(item)
                } else {
                    Ok(Control::Stop)
                }
            }
        }
    }
}

/// Decode stage: raw history entries to typed protocol operations.
///
/// Transactions that carry no recognized protocol envelope produce
/// nothing and the stream keeps going; one transaction may produce
/// several operations.
pub struct DecodeStage<S> {
    protocol: Arc<Protocol>,
    next: S,
}

impl<S> DecodeStage<S> {
    /// Decode through `protocol` into `next`.
    #[must_use]
    pub fn new(protocol: Arc<Protocol>, next: S) -> Self {
        Self { protocol, next }
    }
}

impl<S> Sink<HistoryEntry> for DecodeStage<S>
where
    S: Sink<DecodedOperation>,
{
    fn feed(&mut self, entry: HistoryEntry) -> Result<Control> {
        for op in self.protocol.decode(&entry.transaction) {
            if self.next.feed(op)?.is_stop() {
                return Ok(Control::Stop);
            }
        }
        Ok(Control::Continue)
    }
}
