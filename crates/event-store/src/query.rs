use crate::{AggregateCategory, AggregateId, Event, EventEnvelope, Sequence};

/// Builder for constructing event queries.
///
/// Allows filtering events by aggregate ID, aggregate category, event type
/// and log position. Results always come back in append order.
#[derive(Debug, Clone, Default)]
pub struct EventQuery {
    /// Filter by aggregate ID.
    pub aggregate_id: Option<AggregateId>,

    /// Filter by aggregate category.
    pub category: Option<AggregateCategory>,

    /// Filter by event types (any of these types).
    pub event_types: Option<Vec<&'static str>>,

    /// Filter by minimum sequence (inclusive).
    pub from_sequence: Option<Sequence>,

    /// Maximum number of events to return.
    pub limit: Option<usize>,

    /// Number of events to skip.
    pub offset: Option<usize>,
}

impl EventQuery {
    /// Creates a new empty query matching every event.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for a specific aggregate.
    pub fn for_aggregate(aggregate_id: AggregateId) -> Self {
        Self {
            aggregate_id: Some(aggregate_id),
            ..Default::default()
        }
    }

    /// Creates a query for every aggregate of a category.
    pub fn for_category(category: AggregateCategory) -> Self {
        Self {
            category: Some(category),
            ..Default::default()
        }
    }

    /// Filters by aggregate ID.
    pub fn aggregate_id(mut self, id: AggregateId) -> Self {
        self.aggregate_id = Some(id);
        self
    }

    /// Filters by aggregate category.
    pub fn category(mut self, category: AggregateCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Filters by event type.
    pub fn event_type(mut self, event_type: &'static str) -> Self {
        self.event_types = Some(vec![event_type]);
        self
    }

    /// Filters by multiple event types (any of these).
    pub fn event_types(mut self, event_types: Vec<&'static str>) -> Self {
        self.event_types = Some(event_types);
        self
    }

    /// Filters to events starting from this sequence (inclusive).
    pub fn from_sequence(mut self, sequence: Sequence) -> Self {
        self.from_sequence = Some(sequence);
        self
    }

    /// Limits the number of events returned.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skips this many events before returning results.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Returns true if the envelope passes every filter of this query.
    ///
    /// Offset and limit are not considered here; they apply to the
    /// filtered sequence as a whole.
    pub fn matches<E: Event>(&self, envelope: &EventEnvelope<E>) -> bool {
        let aggregate_id = envelope.aggregate_id();
        if let Some(ref id) = self.aggregate_id
            && aggregate_id != id
        {
            return false;
        }
        if let Some(category) = self.category
            && aggregate_id.category() != category
        {
            return false;
        }
        if let Some(ref types) = self.event_types
            && !types.contains(&envelope.event_type())
        {
            return false;
        }
        if let Some(from) = self.from_sequence
            && envelope.sequence < from
        {
            return false;
        }
        true
    }
}
