use log::{debug, info};
use crate::config::ScopeConfig;
use crate::drivers::queue::FrameReceiver;
use crate::drivers::{ScopeError, TimeSeriesStore, WindowSlice, WindowView};
use crate::types::{Frame, PointFrame};
/// Presentation-side receiver of drained queue items.
pub trait FrameSink {
    /// Device text and `#` parser diagnostics.
    fn on_raw(&mut self, text: &str);
    fn on_frame(&mut self, frame: &PointFrame);
}
/// Sink that forwards everything to the `log` facade.
#[derive(Debug, Default)]
pub struct LogSink;
impl FrameSink for LogSink {
    fn on_raw(&mut self, text: &str) {
        info!("{text}");
    }
    fn on_frame(&mut self, frame: &PointFrame) {
        debug!(
            "frame: {} point(s), {} column(s) {:?}",
            frame.coords.len(),
            frame.column_count(),
            frame.extra
        );
    }
}
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub raw_lines: usize,
    pub frames: usize,
    /// The reader is gone and the queue is empty.
    pub source_closed: bool,
}
/// Consumer side: drains the queue once per tick and keeps the window fresh.
pub struct TelemetryPipeline {
    queue: FrameReceiver,
    store: TimeSeriesStore,
    view: WindowView,
    last_frame: Option<PointFrame>,
    stale: bool,
    closed: bool,
}
impl TelemetryPipeline {
    pub fn new(queue: FrameReceiver, config: &ScopeConfig) -> Result<Self, ScopeError> {
        config.validate()?;
        Ok(Self {
            queue,
            store: TimeSeriesStore::new(config.max_samples)?,
            view: WindowView::new(config.window_seconds)?,
            last_frame: None,
            stale: false,
            closed: false,
        })
    }
    /// One drain-and-recompute cycle. Never blocks.
    ///
    /// `now` is the arrival time in seconds for frames without a device timestamp.
    pub fn tick(&mut self, now: f64, sink: &mut dyn FrameSink) -> TickReport {
        let drained = self.queue.drain();
        let mut report = TickReport::default();
        for frame in drained.frames {
            match frame {
                Frame::RawLine(text) => {
                    sink.on_raw(&text);
                    report.raw_lines += 1;
                }
                Frame::Point(frame) => {
                    sink.on_frame(&frame);
                    self.store.append(&frame, now);
                    self.last_frame = Some(frame);
                    report.frames += 1;
                }
            }
        }
        if drained.disconnected && !self.closed {
            info!("byte source closed, no further frames");
            self.closed = true;
        }
        report.source_closed = self.closed;
        if report.frames > 0 || self.stale || self.view.is_dirty() {
            self.view.recompute(&self.store);
            self.stale = false;
        }
        report
    }
    pub fn store(&self) -> &TimeSeriesStore {
        &self.store
    }
    pub fn view(&self) -> &WindowView {
        &self.view
    }
    pub fn view_mut(&mut self) -> &mut WindowView {
        &mut self.view
    }
    pub fn window(&self) -> &WindowSlice {
        self.view.latest()
    }
    /// Most recent structured frame, for live point tables.
    pub fn last_frame(&self) -> Option<&PointFrame> {
        self.last_frame.as_ref()
    }
    pub fn is_closed(&self) -> bool {
        self.closed
    }
    pub fn set_label(&mut self, id: usize, label: impl Into<String>) -> bool {
        self.store.set_label(id, label)
    }
    pub fn set_scale(&mut self, id: usize, scale: f64) -> bool {
        let changed = self.store.set_scale(id, scale);
        self.stale |= changed;
        changed
    }
    pub fn set_max_samples(&mut self, max_samples: usize) -> Result<(), ScopeError> {
        self.store.set_max_samples(max_samples)?;
        self.stale = true;
        Ok(())
    }
}
