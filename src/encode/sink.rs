use crate::foundation::core::{Fps, FrameGeometry, FrameIndex};
use crate::foundation::error::{BitreelError, BitreelResult};
use crate::raster::frame::Frame;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkConfig {
    /// Dimensions every pushed frame must have.
    pub geometry: FrameGeometry,
    /// Output frames-per-second.
    pub fps: Fps,
}

/// Sink contract for consuming frames in video order.
///
/// Ordering contract: `push_frame` is called with strictly increasing `FrameIndex` values.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> BitreelResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> BitreelResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> BitreelResult<()>;
}

/// Order and size checks shared by the built-in sinks.
#[derive(Debug, Default)]
pub(crate) struct FrameOrder {
    last: Option<FrameIndex>,
}

impl FrameOrder {
    pub(crate) fn check(
        &mut self,
        cfg: &SinkConfig,
        idx: FrameIndex,
        frame: &Frame,
    ) -> BitreelResult<()> {
        if let Some(last) = self.last
            && idx.0 <= last.0
        {
            return Err(BitreelError::validation(format!(
                "sink received out-of-order frame index {} after {}",
                idx.0, last.0
            )));
        }
        if frame.geometry() != cfg.geometry {
            return Err(BitreelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.geometry.width, cfg.geometry.height
            )));
        }
        self.last = Some(idx);
        Ok(())
    }
}

/// In-memory sink for tests and for decoding without a video round trip.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    order: FrameOrder,
    frames: Vec<Frame>,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the sink configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Borrow the captured frames.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Take ownership of the captured frames.
    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> BitreelResult<()> {
        cfg.geometry.validate()?;
        self.cfg = Some(cfg);
        self.order = FrameOrder::default();
        self.frames.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> BitreelResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| BitreelError::validation("in-memory sink not started"))?;
        self.order.check(&cfg, idx, frame)?;
        self.frames.push(frame.clone());
        Ok(())
    }

    fn end(&mut self) -> BitreelResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
