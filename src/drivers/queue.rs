use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use crate::types::Frame;
/// Creates the unbounded handoff between the reader thread and the consumer.
pub fn frame_queue() -> (FrameSender, FrameReceiver) {
    let (tx, rx) = mpsc::channel();
    (FrameSender { tx }, FrameReceiver { rx })
}
/// Producer half. Pushing never blocks.
#[derive(Clone)]
pub struct FrameSender {
    tx: Sender<Frame>,
}
impl FrameSender {
    /// Returns `false` once the consumer has gone away.
    pub fn push(&self, frame: Frame) -> bool {
        self.tx.send(frame).is_ok()
    }
}
/// Result of one non-blocking drain pass.
#[derive(Debug, Default)]
pub struct Drained {
    pub frames: Vec<Frame>,
    /// Every producer handle is dropped and nothing more will arrive.
    pub disconnected: bool,
}
/// Consumer half, owned by the tick context.
pub struct FrameReceiver {
    rx: Receiver<Frame>,
}
impl FrameReceiver {
    pub fn try_pop(&self) -> Option<Frame> {
        self.rx.try_recv().ok()
    }
    /// Pops until empty without waiting for more.
    pub fn drain(&self) -> Drained {
        let mut drained = Drained::default();
        loop {
            match self.rx.try_recv() {
                Ok(frame) => drained.frames.push(frame),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    drained.disconnected = true;
                    break;
                }
            }
        }
        drained
    }
}
