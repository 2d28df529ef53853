use std::collections::{HashMap, VecDeque};
use log::{debug, info};
use crate::drivers::ScopeError;
use crate::types::PointFrame;
pub const DEFAULT_MAX_SAMPLES: usize = 10_000;
/// One auxiliary data column tracked over time.
#[derive(Clone, Debug)]
pub struct Channel {
    id: usize,
    pub label: String,
    pub scale: f64,
    values: VecDeque<f64>,
}
impl Channel {
    fn new(id: usize, backfill: usize, capacity: usize) -> Self {
        let mut values = VecDeque::with_capacity(capacity);
        values.extend(std::iter::repeat(f64::NAN).take(backfill));
        Self {
            id,
            label: default_label(id),
            scale: 1.0,
            values,
        }
    }
    pub fn id(&self) -> usize {
        self.id
    }
    pub fn values(&self) -> &VecDeque<f64> {
        &self.values
    }
    pub fn latest(&self) -> Option<f64> {
        self.values.back().copied()
    }
}
/// Column header shown for a channel until it is renamed.
pub fn default_label(id: usize) -> String {
    format!("D{}", id + 1)
}
/// Rolling per-channel history sharing one timestamp axis.
///
/// Every channel buffer always has the same length as the timestamp buffer;
/// missing values are stored as NaN.
pub struct TimeSeriesStore {
    timestamps: VecDeque<f64>,
    channels: Vec<Channel>, // channel id -> channel
    max_samples: usize,
}
impl TimeSeriesStore {
    pub fn new(max_samples: usize) -> Result<Self, ScopeError> {
        if max_samples == 0 {
            return Err(ScopeError::InvalidCapacity);
        }
        Ok(Self {
            timestamps: VecDeque::with_capacity(max_samples.min(DEFAULT_MAX_SAMPLES) + 1),
            channels: Vec::new(),
            max_samples,
        })
    }
    pub fn max_samples(&self) -> usize {
        self.max_samples
    }
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
    pub fn timestamps(&self) -> &VecDeque<f64> {
        &self.timestamps
    }
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }
    pub fn channel(&self, id: usize) -> Option<&Channel> {
        self.channels.get(id)
    }
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
    /// Appends one sample row and returns the timestamp it was stored under.
    ///
    /// `now` is the arrival time in seconds, used when the frame carries no
    /// device timestamp.
    pub fn append(&mut self, frame: &PointFrame, now: f64) -> f64 {
        let timestamp = match frame.ts_ms {
            Some(ms) if ms != 0 => ms as f64 / 1000.0,
            _ => now,
        };
        let previous_len = self.timestamps.len();
        self.timestamps.push_back(timestamp);
        for (column, token) in frame.extra.iter().enumerate() {
            let value = token.trim().parse::<f64>().unwrap_or(f64::NAN);
            if column == self.channels.len() {
                info!("new channel {} at row {}", default_label(column), previous_len);
                let capacity = self.max_samples.min(DEFAULT_MAX_SAMPLES) + 1;
                self.channels
                    .push(Channel::new(column, previous_len, capacity));
            }
            self.channels[column].values.push_back(value);
        }
        for channel in self.channels.iter_mut().skip(frame.extra.len()) {
            channel.values.push_back(f64::NAN);
        }
        self.trim();
        timestamp
    }
    /// Changes the cap and trims immediately if the history is now too long.
    pub fn set_max_samples(&mut self, max_samples: usize) -> Result<(), ScopeError> {
        if max_samples == 0 {
            return Err(ScopeError::InvalidCapacity);
        }
        self.max_samples = max_samples;
        self.trim();
        Ok(())
    }
    pub fn set_label(&mut self, id: usize, label: impl Into<String>) -> bool {
        match self.channels.get_mut(id) {
            Some(channel) => {
                channel.label = label.into();
                true
            }
            None => false,
        }
    }
    pub fn set_scale(&mut self, id: usize, scale: f64) -> bool {
        match self.channels.get_mut(id) {
            Some(channel) => {
                channel.scale = scale;
                true
            }
            None => false,
        }
    }
    pub fn scales(&self) -> HashMap<usize, f64> {
        self.channels.iter().map(|c| (c.id, c.scale)).collect()
    }
    /// Last value of every channel, in id order.
    pub fn latest(&self) -> Vec<f64> {
        self.channels
            .iter()
            .map(|c| c.latest().unwrap_or(f64::NAN))
            .collect()
    }
    /// Drops all samples but keeps channel records (labels and scales).
    pub fn clear(&mut self) {
        self.timestamps.clear();
        for channel in &mut self.channels {
            channel.values.clear();
        }
    }
    fn trim(&mut self) {
        let len = self.timestamps.len();
        if len <= self.max_samples {
            return;
        }
        let cutoff = len - self.max_samples;
        self.timestamps.drain(..cutoff);
        for channel in &mut self.channels {
            channel.values.drain(..cutoff);
        }
        if cutoff > 1 {
            debug!("trimmed {cutoff} rows to keep {} samples", self.max_samples);
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    fn frame(extra: &[&str]) -> PointFrame {
        PointFrame::new(
            vec![(0.0, 0.0)],
            extra.iter().map(|s| s.to_string()).collect(),
        )
    }
    fn assert_aligned(store: &TimeSeriesStore) {
        for channel in store.channels() {
            assert_eq!(channel.values().len(), store.len(), "channel {}", channel.id());
        }
    }
    #[test]
    fn rejects_zero_capacity() {
        assert!(matches!(
            TimeSeriesStore::new(0),
            Err(ScopeError::InvalidCapacity)
        ));
    }
    #[test]
    fn uses_device_timestamp_when_present() {
        let mut store = TimeSeriesStore::new(8).unwrap();
        assert_eq!(store.append(&frame(&[]).with_timestamp_ms(2500), 99.0), 2.5);
        assert_eq!(store.append(&frame(&[]).with_timestamp_ms(0), 99.0), 99.0);
        assert_eq!(store.append(&frame(&[]), 100.0), 100.0);
        assert_eq!(store.timestamps().iter().copied().collect::<Vec<_>>(), [2.5, 99.0, 100.0]);
    }
    #[test]
    fn non_numeric_tokens_become_nan() {
        let mut store = TimeSeriesStore::new(8).unwrap();
        store.append(&frame(&["1.5", "abc"]), 0.0);
        assert_eq!(store.channel(0).unwrap().latest(), Some(1.5));
        assert!(store.channel(1).unwrap().latest().unwrap().is_nan());
    }
    #[test]
    fn pads_missing_columns_and_backfills_new_ones() {
        let mut store = TimeSeriesStore::new(8).unwrap();
        store.append(&frame(&["1", "2"]), 0.0);
        store.append(&frame(&["3"]), 1.0);
        store.append(&frame(&["4", "5", "6"]), 2.0);
        assert_aligned(&store);
        let ch1: Vec<f64> = store.channel(1).unwrap().values().iter().copied().collect();
        assert_eq!(ch1[0], 2.0);
        assert!(ch1[1].is_nan());
        assert_eq!(ch1[2], 5.0);
        let ch2: Vec<f64> = store.channel(2).unwrap().values().iter().copied().collect();
        assert!(ch2[0].is_nan() && ch2[1].is_nan());
        assert_eq!(ch2[2], 6.0);
        assert_eq!(store.channel(2).unwrap().label, "D3");
    }
    #[test]
    fn overflow_keeps_most_recent_rows_in_every_buffer() {
        let max = 50;
        let n = 137;
        let mut store = TimeSeriesStore::new(max).unwrap();
        for i in 0..n {
            let columns = if i % 3 == 0 { 1 } else { 2 };
            let tokens: Vec<String> = (0..columns).map(|c| format!("{}", i * 10 + c)).collect();
            let refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
            store.append(&frame(&refs), i as f64);
        }
        assert_eq!(store.len(), max);
        assert_aligned(&store);
        let expected: Vec<f64> = ((n - max)..n).map(|i| i as f64).collect();
        assert_eq!(store.timestamps().iter().copied().collect::<Vec<_>>(), expected);
        let ch0: Vec<f64> = store.channel(0).unwrap().values().iter().copied().collect();
        let expected0: Vec<f64> = ((n - max)..n).map(|i| (i * 10) as f64).collect();
        assert_eq!(ch0, expected0);
    }
    #[test]
    fn shrinking_capacity_uses_one_cutoff() {
        let mut store = TimeSeriesStore::new(10).unwrap();
        for i in 0..10 {
            store.append(&frame(&["1", "2"]), i as f64);
        }
        store.append(&frame(&["7"]), 10.0);
        store.set_max_samples(4).unwrap();
        assert_eq!(store.len(), 4);
        assert_aligned(&store);
        assert_eq!(store.timestamps().front(), Some(&7.0));
        assert!(store.channel(1).unwrap().latest().unwrap().is_nan());
        assert!(store.set_max_samples(0).is_err());
    }
    #[test]
    fn labels_and_scales_live_on_the_channel() {
        let mut store = TimeSeriesStore::new(4).unwrap();
        assert!(!store.set_label(0, "temp"));
        store.append(&frame(&["1", "2"]), 0.0);
        assert!(store.set_label(0, "temp"));
        assert!(store.set_scale(1, 0.5));
        assert_eq!(store.channel(0).unwrap().label, "temp");
        assert_eq!(store.scales().get(&1), Some(&0.5));
        assert_eq!(store.scales().get(&0), Some(&1.0));
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.channel(0).unwrap().label, "temp");
        assert_aligned(&store);
    }
    #[test]
    fn latest_row_reports_last_values() {
        let mut store = TimeSeriesStore::new(4).unwrap();
        store.append(&frame(&["1", "2"]), 0.0);
        store.append(&frame(&["3"]), 1.0);
        let row = store.latest();
        assert_eq!(row[0], 3.0);
        assert!(row[1].is_nan());
    }
}
