use std::collections::{BTreeMap, BTreeSet, HashMap};
use crate::drivers::{ScopeError, TimeSeriesStore};
pub const DEFAULT_WINDOW_SECONDS: f64 = 10.0;
/// Trailing slice of the store, ready to hand to a plot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WindowSlice {
    /// Index into the store's timestamp buffer where the slice begins.
    pub start: usize,
    pub timestamps: Vec<f64>,
    pub series: BTreeMap<usize, Vec<f64>>, // channel id -> scaled values
}
impl WindowSlice {
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
    pub fn span_seconds(&self) -> f64 {
        match (self.timestamps.first(), self.timestamps.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}
/// Samples within `width` seconds of the newest timestamp.
///
/// The start index is found by binary search, so the timestamp buffer is
/// assumed non-decreasing. Selected ids the store has never seen get an empty
/// series; missing scales default to 1.0.
pub fn window(
    store: &TimeSeriesStore,
    width: f64,
    selected: &BTreeSet<usize>,
    scales: &HashMap<usize, f64>,
) -> WindowSlice {
    let timestamps = store.timestamps();
    let Some(&t_end) = timestamps.back() else {
        return WindowSlice::default();
    };
    let t_start = t_end - width;
    let start = timestamps.partition_point(|&t| t < t_start);
    let series = selected
        .iter()
        .map(|&id| {
            let values = match store.channel(id) {
                Some(channel) => {
                    let scale = scales.get(&id).copied().unwrap_or(1.0);
                    channel.values().range(start..).map(|v| v * scale).collect()
                }
                None => Vec::new(),
            };
            (id, values)
        })
        .collect();
    WindowSlice {
        start,
        timestamps: timestamps.range(start..).copied().collect(),
        series,
    }
}
/// Consumer-side window state: width, channel selection and the last result.
#[derive(Debug)]
pub struct WindowView {
    width: f64,
    selected: BTreeSet<usize>,
    latest: WindowSlice,
    dirty: bool,
}
impl WindowView {
    pub fn new(width: f64) -> Result<Self, ScopeError> {
        validate_width(width)?;
        Ok(Self {
            width,
            selected: BTreeSet::new(),
            latest: WindowSlice::default(),
            dirty: false,
        })
    }
    pub fn width(&self) -> f64 {
        self.width
    }
    pub fn set_width(&mut self, width: f64) -> Result<(), ScopeError> {
        validate_width(width)?;
        self.width = width;
        self.dirty = true;
        Ok(())
    }
    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }
    pub fn is_selected(&self, id: usize) -> bool {
        self.selected.contains(&id)
    }
    pub fn select(&mut self, id: usize) {
        self.dirty |= self.selected.insert(id);
    }
    pub fn deselect(&mut self, id: usize) {
        self.dirty |= self.selected.remove(&id);
    }
    /// Flips selection of `id` and returns the new state.
    pub fn toggle(&mut self, id: usize) -> bool {
        if self.is_selected(id) {
            self.deselect(id);
            false
        } else {
            self.select(id);
            true
        }
    }
    /// Selection or width changed since the last recompute.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
    /// Recomputes with the scales recorded on each channel.
    pub fn recompute(&mut self, store: &TimeSeriesStore) -> &WindowSlice {
        self.latest = window(store, self.width, &self.selected, &store.scales());
        self.dirty = false;
        &self.latest
    }
    pub fn latest(&self) -> &WindowSlice {
        &self.latest
    }
}
fn validate_width(width: f64) -> Result<(), ScopeError> {
    if width.is_finite() && width > 0.0 {
        Ok(())
    } else {
        Err(ScopeError::InvalidWindow(width))
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PointFrame;
    use rand::Rng;
    fn store_with(times: &[f64], columns: usize) -> TimeSeriesStore {
        let mut store = TimeSeriesStore::new(10_000).unwrap();
        for (i, &t) in times.iter().enumerate() {
            let extra = (0..columns).map(|c| format!("{}", i * 10 + c)).collect();
            store.append(&PointFrame::new(vec![(0.0, 0.0)], extra), t);
        }
        store
    }
    fn bits(values: &[f64]) -> Vec<u64> {
        values.iter().map(|v| v.to_bits()).collect()
    }
    #[test]
    fn empty_store_gives_empty_window() {
        let store = TimeSeriesStore::new(4).unwrap();
        let slice = window(&store, 10.0, &BTreeSet::from([0]), &HashMap::new());
        assert!(slice.is_empty());
        assert!(slice.series.is_empty());
    }
    #[test]
    fn keeps_samples_inside_trailing_window() {
        let store = store_with(&[0.0, 1.0, 2.0, 5.0, 7.5, 12.0], 1);
        let slice = window(&store, 10.0, &BTreeSet::from([0]), &HashMap::new());
        assert_eq!(slice.start, 2);
        assert_eq!(slice.timestamps, vec![2.0, 5.0, 7.5, 12.0]);
        assert_eq!(slice.series[&0], vec![20.0, 30.0, 40.0, 50.0]);
        assert_eq!(slice.span_seconds(), 10.0);
    }
    #[test]
    fn applies_scale_and_skips_unselected() {
        let store = store_with(&[0.0, 1.0], 2);
        let scales = HashMap::from([(1, 0.5)]);
        let slice = window(&store, 10.0, &BTreeSet::from([1, 7]), &scales);
        assert_eq!(slice.series.len(), 2);
        assert_eq!(slice.series[&1], vec![0.5, 5.5]);
        assert!(slice.series[&7].is_empty());
        assert!(!slice.series.contains_key(&0));
    }
    #[test]
    fn start_index_is_first_at_or_after_cutoff() {
        let mut rng = rand::thread_rng();
        for _ in 0..200 {
            let len = rng.gen_range(1..300);
            let mut t = rng.gen_range(-50.0..50.0);
            let times: Vec<f64> = (0..len)
                .map(|_| {
                    // repeated timestamps are allowed
                    if rng.gen_bool(0.8) {
                        t += rng.gen_range(0.0..0.5);
                    }
                    t
                })
                .collect();
            let store = store_with(&times, 0);
            let width = rng.gen_range(0.01..30.0);
            let slice = window(&store, width, &BTreeSet::new(), &HashMap::new());
            let cutoff = times[len - 1] - width;
            let i = slice.start;
            assert!(times[i] >= cutoff);
            assert!(i == 0 || times[i - 1] < cutoff);
            assert_eq!(slice.timestamps.len(), len - i);
        }
    }
    #[test]
    fn view_uses_channel_scales_and_recompute_is_idempotent() {
        let mut store = store_with(&[0.0, 3.0, 6.0, 9.0, 12.0], 2);
        store.set_scale(0, 2.0);
        // a NaN pad in the window
        store.append(&PointFrame::new(vec![(0.0, 0.0)], vec![]), 13.0);
        let mut view = WindowView::new(10.0).unwrap();
        assert!(view.toggle(0));
        view.select(1);
        assert!(view.is_dirty());
        let first = view.recompute(&store).clone();
        assert!(!view.is_dirty());
        let second = view.recompute(&store).clone();
        assert_eq!(first.start, second.start);
        assert_eq!(first.timestamps, second.timestamps);
        for (id, values) in &first.series {
            assert_eq!(bits(values), bits(&second.series[id]));
        }
        assert_eq!(first.series[&0][0], 20.0);
        assert!(first.series[&0].last().unwrap().is_nan());
    }
    #[test]
    fn rejects_bad_widths() {
        assert!(WindowView::new(0.0).is_err());
        assert!(WindowView::new(f64::NAN).is_err());
        let mut view = WindowView::new(5.0).unwrap();
        assert!(view.set_width(-1.0).is_err());
        view.set_width(2.0).unwrap();
        assert_eq!(view.width(), 2.0);
        assert!(view.is_dirty());
    }
}
