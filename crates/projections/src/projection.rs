//! Core projection trait and the fold primitive.

use event_store::{Event, EventEnvelope, EventQuery};

/// A read-model built by folding an ordered slice of the event log.
///
/// `handle` is applied left to right, starting from `seed`. Every
/// implementation ends its match with a catch-all arm returning the
/// accumulator unchanged, so event kinds a view has no interest in pass
/// through without effect.
pub trait Projection: Send + Sync {
    /// The type of events this projection folds.
    type Event: Event;

    /// The read-model produced by the fold.
    type Output;

    /// Returns the name of this projection.
    fn name(&self) -> &'static str;

    /// Returns the slice of the log this projection folds over.
    fn query(&self) -> EventQuery;

    /// Returns the initial accumulator.
    fn seed(&self) -> Self::Output;

    /// Folds one event into the accumulator.
    fn handle(&self, acc: Self::Output, event: &Self::Event) -> Self::Output;
}

/// Folds the given envelopes, in order, into the projection's read-model.
pub fn fold<'a, P>(
    projection: &P,
    envelopes: impl IntoIterator<Item = &'a EventEnvelope<P::Event>>,
) -> P::Output
where
    P: Projection + ?Sized,
    P::Event: 'a,
{
    envelopes
        .into_iter()
        .fold(projection.seed(), |acc, envelope| {
            projection.handle(acc, &envelope.event)
        })
}
