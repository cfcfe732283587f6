//! Side-channel record stored next to a cropped image.
//!
//! The record is written as compact JSON, e.g. `{"size":[64,64],"crop":[20,20,30,30]}`,
//! where `size` is the original canvas and `crop` the `[left, top, right, bottom]`
//! box the stored pixels were taken from.

use crate::bounds::BoundingBox;
use crate::error::TranscodeError;
use serde::{Deserialize, Serialize};

/// Largest canvas a record may describe, in RGBA8 bytes (1 GiB).
pub const MAX_CANVAS_BYTES: u64 = 1 << 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropMetadata {
    pub original_size: (u32, u32),
    pub bounds: BoundingBox,
}

// On-disk layout; field order is part of the format.
#[derive(Debug, Serialize, Deserialize)]
struct MetaRecord {
    size: [u32; 2],
    crop: [u32; 4],
}

impl From<&CropMetadata> for MetaRecord {
    fn from(meta: &CropMetadata) -> Self {
        let b = meta.bounds;
        MetaRecord {
            size: [meta.original_size.0, meta.original_size.1],
            crop: [b.left, b.top, b.right, b.bottom],
        }
    }
}

impl CropMetadata {
    pub fn new(original_size: (u32, u32), bounds: BoundingBox) -> Self {
        Self {
            original_size,
            bounds,
        }
    }

    pub fn to_json(&self) -> Result<Vec<u8>, TranscodeError> {
        Ok(serde_json::to_vec(&MetaRecord::from(self))?)
    }

    /// Parses a record and checks it with [`CropMetadata::validate`].
    pub fn from_json(bytes: &[u8]) -> Result<Self, TranscodeError> {
        let record: MetaRecord = serde_json::from_slice(bytes)?;
        let [width, height] = record.size;
        let [left, top, right, bottom] = record.crop;
        let meta = CropMetadata::new((width, height), BoundingBox::new(left, top, right, bottom));
        meta.validate()?;
        Ok(meta)
    }

    /// Checks that the canvas can be allocated and the box is non-empty and inside it.
    pub fn validate(&self) -> Result<(), TranscodeError> {
        let (width, height) = self.original_size;
        let canvas_bytes = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|pixels| pixels.checked_mul(4));
        if !canvas_bytes.is_some_and(|bytes| bytes <= MAX_CANVAS_BYTES) {
            return Err(TranscodeError::InvalidMetadata(format!(
                "canvas {}x{} exceeds {} bytes",
                width, height, MAX_CANVAS_BYTES
            )));
        }

        let b = self.bounds;
        if !b.fits_within(width, height) {
            return Err(TranscodeError::InvalidMetadata(format!(
                "crop [{}, {}, {}, {}] does not fit a {}x{} canvas",
                b.left, b.top, b.right, b.bottom, width, height
            )));
        }
        Ok(())
    }
}
