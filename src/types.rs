// src/types.rs

/// One decoded input line.
#[derive(Clone, Debug, PartialEq)]
pub enum Frame {
    /// Device log text, or a `#` diagnostic synthesized by the parser.
    RawLine(String),
    Point(PointFrame),
}

impl Frame {
    pub fn is_raw(&self) -> bool {
        matches!(self, Frame::RawLine(_))
    }

    pub fn as_point(&self) -> Option<&PointFrame> {
        match self {
            Frame::Point(frame) => Some(frame),
            Frame::RawLine(_) => None,
        }
    }
}

/// Structured sample: coordinate pairs plus auxiliary column tokens.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointFrame {
    /// Device timestamp in milliseconds. `None` (or zero) means "use arrival time".
    pub ts_ms: Option<i64>,
    pub coords: Vec<(f64, f64)>,
    /// Raw tokens after the `D` marker; numeric parsing happens in the store.
    pub extra: Vec<String>,
}

impl PointFrame {
    pub fn new(coords: Vec<(f64, f64)>, extra: Vec<String>) -> Self {
        Self {
            ts_ms: None,
            coords,
            extra,
        }
    }

    pub fn with_timestamp_ms(mut self, ts_ms: i64) -> Self {
        self.ts_ms = Some(ts_ms);
        self
    }

    pub fn column_count(&self) -> usize {
        self.extra.len()
    }
}

impl From<PointFrame> for Frame {
    fn from(value: PointFrame) -> Self {
        Frame::Point(value)
    }
}
