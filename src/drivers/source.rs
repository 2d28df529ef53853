use std::collections::VecDeque;
use std::io::{self, Read};
use std::thread;
use std::time::Duration;
use serialport::SerialPort;
/// How the read loop should react to a failed read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadFailure {
    /// Nothing available right now; try again next iteration.
    Transient,
    /// The source is gone; the loop must end.
    Fatal,
}
impl ReadFailure {
    pub fn classify(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => {
                ReadFailure::Transient
            }
            _ => ReadFailure::Fatal,
        }
    }
}
/// Already-open byte stream owned by the reader thread.
///
/// `read_available` must return within a short bound so the stop flag is
/// observed promptly. `Ok(0)` means end of stream.
pub trait ByteSource: Send {
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    fn write_all(&mut self, _bytes: &[u8]) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "byte source is read-only",
        ))
    }
}
impl ByteSource for Box<dyn SerialPort> {
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // Read what is waiting, or block for at least one byte up to the port timeout.
        let waiting = self.bytes_to_read().map_err(io::Error::from)? as usize;
        let want = waiting.clamp(1, buf.len());
        self.read(&mut buf[..want])
    }
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        io::Write::write_all(self, bytes)?;
        io::Write::flush(self)
    }
}
/// Adapter for regular files such as capture replays. End of input closes the source.
///
/// Reads are not bounded in time, so blocking streams (pipes, FIFOs) do not fit here.
pub struct ReadSource<R> {
    inner: R,
}
impl<R: Read + Send> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}
impl<R: Read + Send> ByteSource for ReadSource<R> {
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}
/// In-memory source useful for tests and deterministic playback.
///
/// Chunks are returned one per read; an empty chunk reads as a timeout. Once
/// drained the source either idles (reporting timeouts) or reports itself closed.
pub struct ManualSource {
    chunks: VecDeque<Vec<u8>>,
    close_when_drained: bool,
    idle_delay: Duration,
    written: Vec<u8>,
}
impl ManualSource {
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: AsRef<[u8]>,
    {
        Self {
            chunks: chunks.into_iter().map(|c| c.as_ref().to_vec()).collect(),
            close_when_drained: false,
            idle_delay: Duration::from_millis(1),
            written: Vec::new(),
        }
    }
    pub fn closing_when_drained(mut self) -> Self {
        self.close_when_drained = true;
        self
    }
    pub fn written(&self) -> &[u8] {
        &self.written
    }
}
impl ByteSource for ManualSource {
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(mut chunk) = self.chunks.pop_front() else {
            if self.close_when_drained {
                return Err(io::Error::new(
                    io::ErrorKind::BrokenPipe,
                    "manual source drained",
                ));
            }
            thread::sleep(self.idle_delay);
            return Err(io::ErrorKind::TimedOut.into());
        };
        if chunk.is_empty() {
            return Err(io::ErrorKind::TimedOut.into());
        }
        if chunk.len() > buf.len() {
            let rest = chunk.split_off(buf.len());
            self.chunks.push_front(rest);
        }
        buf[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }
    fn write_all(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.written.extend_from_slice(bytes);
        Ok(())
    }
}
