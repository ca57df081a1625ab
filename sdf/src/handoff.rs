use parking_lot::Mutex;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use super::pixels::{PixelBuffer, TileRect};

struct Slot {
    frame: Mutex<PixelBuffer>,
    dirty: AtomicBool,
}

/// Single-producer, single-consumer frame slot between a render worker and a display.
///
/// The producer publishes pixels (whole frames or single tiles) and marks the slot
/// dirty; the consumer copies the frame out only when something changed.
#[derive(Clone)]
pub struct FrameHandoff {
    slot: Arc<Slot>,
}

impl FrameHandoff {
    pub fn new(width: u32, height: u32) -> Self {
        FrameHandoff {
            slot: Arc::new(Slot {
                frame: Mutex::new(PixelBuffer::new(width, height)),
                dirty: AtomicBool::new(false),
            }),
        }
    }

    pub fn publish(&self, pixels: &PixelBuffer) {
        self.slot.frame.lock().clone_from(pixels);
        self.slot.dirty.store(true, Ordering::Release);
    }

    /// Publishes only `rect`; `pixels` must match the slot's dimensions.
    pub fn publish_region(&self, pixels: &PixelBuffer, rect: TileRect) {
        self.slot.frame.lock().copy_region_from(pixels, rect);
        self.slot.dirty.store(true, Ordering::Release);
    }

    pub fn is_dirty(&self) -> bool {
        self.slot.dirty.load(Ordering::Acquire)
    }

    /// Copy of the frame if it changed since the last read.
    pub fn take(&self) -> Option<PixelBuffer> {
        self.read_if_changed(PixelBuffer::clone)
    }

    pub fn read_if_changed<R, F: FnOnce(&PixelBuffer) -> R>(&self, read: F) -> Option<R> {
        if !self.slot.dirty.swap(false, Ordering::AcqRel) {
            return None;
        }
        let frame = self.slot.frame.lock();
        Some(read(&frame))
    }
}
