// src/drivers/mod.rs
pub mod buffer;
pub mod error;
pub mod palette;
pub mod parser;
pub mod pipeline;
pub mod queue;
pub mod reader;
pub mod source;
pub mod window;
// re-export the main types for callers
pub use buffer::{Channel, TimeSeriesStore};
pub use error::ScopeError;
pub use palette::{channel_color, Rgb};
pub use parser::parse;
pub use pipeline::{FrameSink, LogSink, TelemetryPipeline, TickReport};
pub use queue::{frame_queue, Drained, FrameReceiver, FrameSender};
pub use reader::{read_loop, ReaderHandle, ReaderOptions, ReaderState, ReaderStatus, StreamReader};
pub use source::{ByteSource, ManualSource, ReadFailure, ReadSource};
pub use window::{window, WindowSlice, WindowView};
