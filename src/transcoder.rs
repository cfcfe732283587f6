//! Crop and expand transforms over TGA bytes.
//!
//! - [`crop`] trims fully transparent borders and returns the re-encoded pixels with
//!   the [`CropMetadata`] needed to undo it (none when nothing was trimmed).
//! - [`expand`] decodes stored pixels and, given metadata, places them back on a
//!   transparent canvas of the original size. [`restore`] does the placement alone.
//!
//! Only alpha is restored for trimmed borders; their RGB values come back as zero.

use crate::bounds::{find_bounds, BoundingBox};
use crate::crop_metadata::CropMetadata;
use crate::error::TranscodeError;
use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

/// Output of [`crop`]: encoded pixels plus the record needed to restore the canvas.
#[derive(Debug, Clone)]
pub struct Cropped {
    pub bytes: Vec<u8>,
    pub metadata: Option<CropMetadata>,
}

impl Cropped {
    pub fn is_cropped(&self) -> bool {
        self.metadata.is_some()
    }
}

/// Decodes TGA bytes into RGBA8, whatever the stored pixel depth.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage, TranscodeError> {
    let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Tga)
        .map_err(TranscodeError::Decode)?;
    Ok(decoded.to_rgba8())
}

pub fn encode(image: &RgbaImage) -> Result<Vec<u8>, TranscodeError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Tga)
        .map_err(TranscodeError::Encode)?;
    Ok(buffer.into_inner())
}

pub fn crop(image: &RgbaImage) -> Result<Cropped, TranscodeError> {
    let (width, height) = image.dimensions();
    let bounds = find_bounds(image);

    if bounds.is_full(width, height) {
        return Ok(Cropped {
            bytes: encode(image)?,
            metadata: None,
        });
    }

    let region = imageops::crop_imm(
        image,
        bounds.left,
        bounds.top,
        bounds.width(),
        bounds.height(),
    )
    .to_image();

    log::debug!(
        "cropped {}x{} to {}x{} at ({}, {})",
        width,
        height,
        bounds.width(),
        bounds.height(),
        bounds.left,
        bounds.top
    );

    Ok(Cropped {
        bytes: encode(&region)?,
        metadata: Some(CropMetadata::new((width, height), bounds)),
    })
}

pub fn expand(bytes: &[u8], metadata: Option<&CropMetadata>) -> Result<RgbaImage, TranscodeError> {
    restore(decode(bytes)?, metadata)
}

/// Places already decoded stored pixels back on their original canvas.
pub fn restore(
    stored: RgbaImage,
    metadata: Option<&CropMetadata>,
) -> Result<RgbaImage, TranscodeError> {
    let Some(meta) = metadata else {
        return Ok(stored);
    };
    meta.validate()?;

    let (width, height) = meta.original_size;
    let bounds = meta.bounds;
    let region = fit_to_bounds(stored, &bounds);
    let mut canvas = RgbaImage::new(width, height);
    imageops::replace(&mut canvas, &region, bounds.left as i64, bounds.top as i64);
    Ok(canvas)
}

/// True when stored pixels must be resized before they fit the recorded box.
pub fn needs_resize(stored: &RgbaImage, meta: &CropMetadata) -> bool {
    stored.dimensions() != (meta.bounds.width(), meta.bounds.height())
}

fn fit_to_bounds(image: RgbaImage, bounds: &BoundingBox) -> RgbaImage {
    if image.dimensions() == (bounds.width(), bounds.height()) {
        return image;
    }

    log::debug!(
        "resizing stored {}x{} to {}x{}",
        image.width(),
        image.height(),
        bounds.width(),
        bounds.height()
    );
    imageops::resize(&image, bounds.width(), bounds.height(), FilterType::Nearest)
}
