use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use log::{debug, info, trace, warn};
use crate::drivers::parser;
use crate::drivers::queue::FrameSender;
use crate::drivers::source::{ByteSource, ReadFailure};
use crate::drivers::ScopeError;
use crate::types::Frame;
const READ_CHUNK: usize = 4096;
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReaderState {
    Idle,
    Running,
    Stopping,
    Stopped,
}
impl ReaderState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ReaderState::Idle,
            1 => ReaderState::Running,
            2 => ReaderState::Stopping,
            _ => ReaderState::Stopped,
        }
    }
}
/// Reader lifecycle state, readable from any thread.
#[derive(Clone, Debug)]
pub struct ReaderStatus(Arc<AtomicU8>);
impl ReaderStatus {
    pub fn new() -> Self {
        Self(Arc::new(AtomicU8::new(ReaderState::Idle as u8)))
    }
    pub fn get(&self) -> ReaderState {
        ReaderState::from_u8(self.0.load(Ordering::Acquire))
    }
    fn set(&self, state: ReaderState) {
        self.0.store(state as u8, Ordering::Release);
    }
    /// Idle -> Running only; a thread that already finished keeps Stopped.
    fn mark_started(&self) {
        let _ = self.0.compare_exchange(
            ReaderState::Idle as u8,
            ReaderState::Running as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}
impl Default for ReaderStatus {
    fn default() -> Self {
        Self::new()
    }
}
#[derive(Clone, Copy, Debug, Default)]
pub struct ReaderOptions {
    /// Also push structured lines as raw text, ahead of their parsed frame.
    pub echo_structured: bool,
}
/// Collects bytes and yields complete `\n`-terminated lines.
#[derive(Debug, Default)]
pub struct LineAccumulator {
    buf: Vec<u8>,
}
impl LineAccumulator {
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }
    /// Next complete line, lossily decoded and trimmed.
    pub fn next_line(&mut self) -> Option<String> {
        let end = self.buf.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.buf.drain(..=end).collect();
        Some(String::from_utf8_lossy(&line[..end]).trim().to_owned())
    }
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
/// Body of the reader thread.
///
/// Runs until `stop` is raised, the source fails fatally, or the consumer side
/// of `queue` disappears. Never returns an error: the owner observes shutdown
/// through `status` and the queue disconnecting.
pub fn read_loop(
    source: &mut dyn ByteSource,
    queue: &FrameSender,
    outbound: &Receiver<String>,
    stop: &AtomicBool,
    status: &ReaderStatus,
    options: ReaderOptions,
) {
    status.set(ReaderState::Running);
    let mut lines = LineAccumulator::default();
    let mut buf = vec![0u8; READ_CHUNK];
    while !stop.load(Ordering::Acquire) {
        while let Ok(text) = outbound.try_recv() {
            let mut bytes = text.into_bytes();
            bytes.push(b'\n');
            if let Err(err) = source.write_all(&bytes) {
                warn!("dropping outbound line: {err}");
            }
        }
        let read = match source.read_available(&mut buf) {
            Ok(0) => {
                info!("byte source reached end of stream");
                status.set(ReaderState::Stopped);
                return;
            }
            Ok(n) => n,
            Err(err) => match ReadFailure::classify(&err) {
                ReadFailure::Transient => {
                    trace!("transient read error: {err}");
                    continue;
                }
                ReadFailure::Fatal => {
                    warn!("byte source closed: {err}");
                    status.set(ReaderState::Stopped);
                    return;
                }
            },
        };
        lines.extend(&buf[..read]);
        while let Some(line) = lines.next_line() {
            if !dispatch(queue, line, options) {
                debug!("frame queue consumer dropped, stopping reader");
                status.set(ReaderState::Stopped);
                return;
            }
        }
    }
    status.set(ReaderState::Stopping);
    if lines.pending() > 0 {
        trace!("discarding {} bytes of unterminated input", lines.pending());
    }
    status.set(ReaderState::Stopped);
}
fn dispatch(queue: &FrameSender, line: String, options: ReaderOptions) -> bool {
    let frame = parser::parse(&line);
    if options.echo_structured && !frame.is_raw() && !queue.push(Frame::RawLine(line)) {
        return false;
    }
    queue.push(frame)
}
/// Owns a byte source until [`StreamReader::start`] moves it onto its own thread.
pub struct StreamReader<S> {
    source: S,
    queue: FrameSender,
    options: ReaderOptions,
    status: ReaderStatus,
}
impl<S: ByteSource + 'static> StreamReader<S> {
    pub fn new(source: S, queue: FrameSender, options: ReaderOptions) -> Self {
        Self {
            source,
            queue,
            options,
            status: ReaderStatus::new(),
        }
    }
    pub fn status(&self) -> ReaderStatus {
        self.status.clone()
    }
    pub fn start(self) -> Result<ReaderHandle, ScopeError> {
        let Self {
            mut source,
            queue,
            options,
            status,
        } = self;
        let stop = Arc::new(AtomicBool::new(false));
        let (outbound_tx, outbound_rx) = mpsc::channel::<String>();
        let (done_tx, done_rx) = mpsc::channel::<()>();
        let thread = {
            let stop = Arc::clone(&stop);
            let status = status.clone();
            thread::Builder::new()
                .name("linescope-reader".into())
                .spawn(move || {
                    read_loop(&mut source, &queue, &outbound_rx, &stop, &status, options);
                    done_tx.send(()).ok();
                })?
        };
        status.mark_started();
        debug!("reader thread started");
        Ok(ReaderHandle {
            stop,
            status,
            outbound: outbound_tx,
            done: done_rx,
            thread: Some(thread),
        })
    }
}
/// Control side of a running reader.
///
/// Dropping the handle raises the stop flag but does not wait.
pub struct ReaderHandle {
    stop: Arc<AtomicBool>,
    status: ReaderStatus,
    outbound: Sender<String>,
    done: Receiver<()>,
    thread: Option<JoinHandle<()>>,
}
impl ReaderHandle {
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
    }
    pub fn state(&self) -> ReaderState {
        self.status.get()
    }
    pub fn status(&self) -> ReaderStatus {
        self.status.clone()
    }
    /// Queues a line (newline appended) for the reader thread to write.
    pub fn send_line(&self, text: impl Into<String>) -> bool {
        self.outbound.send(text.into()).is_ok()
    }
    /// Waits up to `timeout` for the thread to finish.
    pub fn join_timeout(&mut self, timeout: Duration) -> Result<(), ScopeError> {
        let Some(thread) = self.thread.take() else {
            return Ok(());
        };
        match self.done.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                thread.join().map_err(|_| ScopeError::ReaderPanicked)
            }
            Err(RecvTimeoutError::Timeout) => {
                self.thread = Some(thread);
                Err(ScopeError::JoinTimeout { waited: timeout })
            }
        }
    }
    pub fn shutdown(mut self, timeout: Duration) -> Result<(), ScopeError> {
        self.stop();
        self.join_timeout(timeout)
    }
}
impl Drop for ReaderHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
