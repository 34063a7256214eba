//! Bounded sample history for graphs and diagnostics
//!
//! Two histories are kept side by side: the raw samples as produced or
//! received, and the same samples after a [`SampleFilter`] has run. The
//! default filter is the identity, so both sequences match until a caller
//! installs a real one.

use std::collections::VecDeque;

use crate::types::TelemetrySample;

/// Number of samples each history retains.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Fixed-capacity FIFO of samples, oldest first.
#[derive(Debug, Clone)]
pub struct SampleHistory<T = TelemetrySample> {
    samples: VecDeque<T>,
    capacity: usize,
}

impl<T: Clone> SampleHistory<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// A history holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { samples: VecDeque::with_capacity(capacity + 1), capacity }
    }

    /// Append a sample, evicting the oldest one when full.
    pub fn push(&mut self, sample: T) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Copy of the retained samples in arrival order.
    pub fn snapshot(&self) -> Vec<T> {
        self.samples.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

impl<T: Clone> Default for SampleHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Signal-processing hook applied to each sample before it is stored as filtered.
pub trait SampleFilter: Send {
    fn apply(&mut self, sample: &TelemetrySample) -> TelemetrySample;
}

/// Pass-through filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFilter;

impl SampleFilter for IdentityFilter {
    fn apply(&mut self, sample: &TelemetrySample) -> TelemetrySample {
        *sample
    }
}

impl<F> SampleFilter for F
where
    F: FnMut(&TelemetrySample) -> TelemetrySample + Send,
{
    fn apply(&mut self, sample: &TelemetrySample) -> TelemetrySample {
        self(sample)
    }
}

/// Raw and filtered histories fed from one stream of samples.
pub struct TelemetryHistory {
    raw: SampleHistory,
    filtered: SampleHistory,
    filter: Box<dyn SampleFilter>,
}

impl TelemetryHistory {
    pub fn new() -> Self {
        Self::with_filter(IdentityFilter)
    }

    pub fn with_filter(filter: impl SampleFilter + 'static) -> Self {
        Self { raw: SampleHistory::new(), filtered: SampleHistory::new(), filter: Box::new(filter) }
    }

    pub fn set_filter(&mut self, filter: impl SampleFilter + 'static) {
        self.filter = Box::new(filter);
    }

    /// Store `sample` as raw, run the filter and store its output.
    ///
    /// Returns the filtered sample.
    pub fn record(&mut self, sample: TelemetrySample) -> TelemetrySample {
        self.raw.push(sample);
        let filtered = self.filter.apply(&sample);
        self.filtered.push(filtered);
        filtered
    }

    pub fn raw(&self) -> &SampleHistory {
        &self.raw
    }

    pub fn filtered(&self) -> &SampleHistory {
        &self.filtered
    }

    pub fn clear(&mut self) {
        self.raw.clear();
        self.filtered.clear();
    }
}

impl Default for TelemetryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TelemetryHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelemetryHistory")
            .field("raw", &self.raw.len())
            .field("filtered", &self.filtered.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_with_id;

    #[test]
    fn overflow_keeps_most_recent_in_arrival_order() {
        let mut history = SampleHistory::new();
        for id in 1..=(DEFAULT_HISTORY_CAPACITY as i32 + 1) {
            history.push(sample_with_id(id));
        }

        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), DEFAULT_HISTORY_CAPACITY);
        let ids: Vec<i32> = snapshot.iter().map(|s| s.packet_id).collect();
        let expected: Vec<i32> = (2..=(DEFAULT_HISTORY_CAPACITY as i32 + 1)).collect();
        assert_eq!(ids, expected);
        assert_eq!(history.latest().map(|s| s.packet_id), Some(101));
    }

    #[test]
    fn partial_history_is_not_padded() {
        let mut history: SampleHistory<u32> = SampleHistory::with_capacity(4);
        history.push(1);
        history.push(2);
        assert_eq!(history.snapshot(), vec![1, 2]);

        for n in 3..=9 {
            history.push(n);
        }
        assert_eq!(history.snapshot(), vec![6, 7, 8, 9]);
        assert_eq!(history.capacity(), 4);
    }

    #[test]
    fn zero_capacity_is_raised_to_one() {
        let mut history: SampleHistory<u8> = SampleHistory::with_capacity(0);
        history.push(1);
        history.push(2);
        assert_eq!(history.snapshot(), vec![2]);
    }

    #[test]
    fn identity_filter_mirrors_raw() {
        let mut history = TelemetryHistory::new();
        for id in 0..5 {
            let out = history.record(sample_with_id(id));
            assert_eq!(out.packet_id, id);
        }
        assert_eq!(history.raw().snapshot(), history.filtered().snapshot());
    }

    #[test]
    fn custom_filter_only_affects_filtered_history() {
        let mut history = TelemetryHistory::with_filter(|s: &TelemetrySample| TelemetrySample {
            pitch: s.pitch * 0.5,
            ..*s
        });

        let out = history.record(TelemetrySample { packet_id: 1, pitch: 40.0, ..Default::default() });

        assert_eq!(out.pitch, 20.0);
        assert_eq!(history.raw().latest().unwrap().pitch, 40.0);
        assert_eq!(history.filtered().latest().unwrap().pitch, 20.0);
    }
}
