//! Synchronous outlet for the frames produced by the protocol engine.
//!
//! The engine runs under a lock and never awaits, so it hands frames to a
//! [`FrameSink`] immediately. Two implementations ship with the crate:
//! [`FrameBatch`], which collects frames for an async caller to flush after
//! the lock is released, and [`BlockingCanSink`], which writes straight into
//! a blocking `embedded_can` driver.
use crate::error::BatchError;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use thiserror_no_std::Error;

/// Receives encoded CAN frames, one call per frame, in transmission order.
pub trait FrameSink {
    type Error: core::fmt::Debug;
    /// Queue or transmit one frame. An error aborts the rest of the message.
    fn send_frame(&mut self, frame: &CanFrame) -> Result<(), Self::Error>;
}

//==================================================================================FRAME_BATCH
/// Fixed-capacity frame buffer.
pub struct FrameBatch<const N: usize> {
    frames: [CanFrame; N],
    len: usize,
}

const EMPTY_FRAME: CanFrame = CanFrame {
    id: CanId(0),
    extended: true,
    data: [0; 8],
    len: 0,
};

impl<const N: usize> Default for FrameBatch<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameBatch<N> {
    pub const fn new() -> Self {
        Self {
            frames: [EMPTY_FRAME; N],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Queued frames, oldest first.
    pub fn frames(&self) -> &[CanFrame] {
        &self.frames[..self.len]
    }

    /// Forget every queued frame.
    pub fn clear(&mut self) {
        self.len = 0;
    }
}

impl<const N: usize> FrameSink for FrameBatch<N> {
    type Error = BatchError;

    fn send_frame(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        if self.len >= N {
            return Err(BatchError::Full { capacity: N });
        }
        self.frames[self.len] = frame.clone();
        self.len += 1;
        Ok(())
    }
}

//==================================================================================BLOCKING_CAN
#[derive(Error, Debug)]
/// Failures of [`BlockingCanSink`].
pub enum BlockingSinkError<E: core::fmt::Debug> {
    /// The driver could not build a frame for this identifier/payload.
    #[error("Frame not representable by the driver")]
    Unrepresentable,
    /// The driver refused the frame.
    #[error("CAN driver error: {0:?}")]
    Bus(E),
}

/// [`FrameSink`] writing into a blocking `embedded_can` driver.
pub struct BlockingCanSink<C> {
    can: C,
}

impl<C: embedded_can::blocking::Can> BlockingCanSink<C> {
    pub fn new(can: C) -> Self {
        Self { can }
    }

    /// Give the driver back.
    pub fn into_inner(self) -> C {
        self.can
    }
}

impl<C> FrameSink for BlockingCanSink<C>
where
    C: embedded_can::blocking::Can,
    C::Error: core::fmt::Debug,
{
    type Error = BlockingSinkError<C::Error>;

    fn send_frame(&mut self, frame: &CanFrame) -> Result<(), Self::Error> {
        let id = embedded_can::Frame::id(frame);
        let native = <C::Frame as embedded_can::Frame>::new(id, frame.payload())
            .ok_or(BlockingSinkError::Unrepresentable)?;
        self.can.transmit(&native).map_err(BlockingSinkError::Bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// A full batch rejects further frames and keeps the queued ones.
    fn test_batch_capacity() {
        let mut batch: FrameBatch<2> = FrameBatch::new();
        let frame = CanFrame::new_extended(CanId(0x1000_3001), &[1, 2, 3]);
        batch.send_frame(&frame).unwrap();
        batch.send_frame(&frame).unwrap();
        assert_eq!(
            batch.send_frame(&frame),
            Err(BatchError::Full { capacity: 2 })
        );
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.frames()[1].payload(), &[1, 2, 3]);
        batch.clear();
        assert!(batch.is_empty());
    }

    struct RecordingCan {
        sent: Vec<CanFrame>,
        fail: bool,
    }

    impl embedded_can::blocking::Can for RecordingCan {
        type Frame = CanFrame;
        type Error = embedded_can::ErrorKind;

        fn transmit(&mut self, frame: &Self::Frame) -> Result<(), Self::Error> {
            if self.fail {
                return Err(embedded_can::ErrorKind::Overrun);
            }
            self.sent.push(frame.clone());
            Ok(())
        }

        fn receive(&mut self) -> Result<Self::Frame, Self::Error> {
            Err(embedded_can::ErrorKind::Other)
        }
    }

    #[test]
    /// Frames reach the driver unchanged; driver errors are wrapped.
    fn test_blocking_sink() {
        let mut sink = BlockingCanSink::new(RecordingCan {
            sent: Vec::new(),
            fail: false,
        });
        let frame = CanFrame::new_extended(CanId(0x1020_3001), &[0xAB, 0xCD]);
        sink.send_frame(&frame).unwrap();
        let mut can = sink.into_inner();
        assert_eq!(can.sent, vec![frame.clone()]);

        can.fail = true;
        let mut sink = BlockingCanSink::new(can);
        assert!(matches!(
            sink.send_frame(&frame),
            Err(BlockingSinkError::Bus(embedded_can::ErrorKind::Overrun))
        ));
    }
}
