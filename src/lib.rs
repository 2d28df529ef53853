//! Reader and time-series buffers for the `P,x,y,...[,D,...]` serial
//! telemetry line protocol.
//!
//! A [`StreamReader`] thread turns bytes into [`Frame`]s and pushes them on a
//! [`FrameQueue`](drivers::queue); a [`TelemetryPipeline`] drains the queue on
//! a fixed tick, keeps per-channel history in a [`TimeSeriesStore`] and
//! maintains a trailing [`WindowView`].
pub mod config;
pub mod drivers;
pub mod types;
pub use config::ScopeConfig;
pub use drivers::{
    frame_queue, parse, ByteSource, FrameSink, ReaderHandle, ReaderOptions, ReaderState,
    ScopeError, StreamReader, TelemetryPipeline, TimeSeriesStore, WindowSlice, WindowView,
};
pub use types::{Frame, PointFrame};
