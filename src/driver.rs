//! Directory ⇄ archive pipeline.
//!
//! [`ArchiveDriver`] ties the pieces together:
//! - [`ArchiveDriver::pack`] reads every `.tga` in a directory, trims transparent
//!   borders with [`transcoder::crop`], and writes `name.tga` plus `name.meta` when
//!   a crop was recorded.
//! - [`ArchiveDriver::unpack`] groups archive entries by lower-cased base name and
//!   restores each image with [`transcoder::restore`].
//! - [`ArchiveDriver::list`] reports what an archive holds without decoding pixels.
//!
//! Any codec or metadata failure aborts the whole operation and names the entry;
//! a partially written archive is never returned.

use crate::container::{read_entries, ArchiveEntry, ArchiveOptions, ContainerWriter};
use crate::crop_metadata::CropMetadata;
use crate::error::{PathKind, Result, TgaPakError};
use crate::naming::{self, EntryKind};
use crate::notifier::Notifier;
use crate::transcoder;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// A restored image ready to be written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// One image in an archive, as reported by [`ArchiveDriver::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySummary {
    pub name: String,
    pub stored_size: usize,
    pub metadata: Option<CropMetadata>,
}

impl EntrySummary {
    pub fn is_cropped(&self) -> bool {
        self.metadata.is_some()
    }
}

// Image and metadata payloads sharing one base name. First entry seen wins each slot.
#[derive(Debug, Default)]
struct EntryGroup {
    image: Option<ArchiveEntry>,
    metadata: Option<ArchiveEntry>,
}

impl EntryGroup {
    fn offer(&mut self, kind: EntryKind, entry: ArchiveEntry) {
        let slot = match kind {
            EntryKind::Image => &mut self.image,
            EntryKind::Metadata => &mut self.metadata,
        };
        if slot.is_none() {
            *slot = Some(entry);
        } else {
            log::debug!("ignoring duplicate entry {}", entry.name);
        }
    }

    fn crop_metadata(&self) -> Result<Option<CropMetadata>> {
        self.metadata
            .as_ref()
            .map(|entry| {
                CropMetadata::from_json(&entry.bytes)
                    .map_err(|e| TgaPakError::transcode(&entry.name, e))
            })
            .transpose()
    }
}

/// Builds the base-name → payloads map in one pass over the entries.
fn group_entries(entries: Vec<ArchiveEntry>) -> BTreeMap<String, EntryGroup> {
    let mut groups: BTreeMap<String, EntryGroup> = BTreeMap::new();

    for entry in entries {
        let (Some(kind), Some(key)) = (
            EntryKind::classify(&entry.name),
            naming::group_key(&entry.name),
        ) else {
            log::debug!("skipping unrecognized entry {}", entry.name);
            continue;
        };
        groups.entry(key).or_default().offer(kind, entry);
    }

    groups
}

pub struct ArchiveDriver<'a> {
    notifier: &'a Notifier,
    options: ArchiveOptions,
}

impl<'a> ArchiveDriver<'a> {
    pub fn new(notifier: &'a Notifier, options: ArchiveOptions) -> Self {
        Self { notifier, options }
    }

    /// Lists the `.tga` files directly inside `source_dir`, sorted by name.
    pub fn source_files(&self, source_dir: &Path) -> Result<Vec<PathBuf>> {
        let listing = fs::read_dir(source_dir).map_err(|e| TgaPakError::io(source_dir, e))?;

        let mut files = Vec::new();
        for entry in listing {
            let entry = entry.map_err(|e| TgaPakError::io(source_dir, e))?;
            let file_type = entry.file_type().map_err(|e| TgaPakError::io(entry.path(), e))?;
            if !file_type.is_file() {
                continue;
            }
            let path = entry.path();
            if path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(naming::is_image_name)
            {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Packs every `.tga` directly inside `source_dir` into ZIP bytes.
    pub fn pack(&self, source_dir: &Path) -> Result<Vec<u8>> {
        if !source_dir.exists() {
            return Err(TgaPakError::InputNotFound(source_dir.to_path_buf()));
        }
        if !source_dir.is_dir() {
            return Err(TgaPakError::WrongKind {
                path: source_dir.to_path_buf(),
                expected: PathKind::Directory,
            });
        }

        let files = self.source_files(source_dir)?;
        if files.is_empty() {
            return Err(TgaPakError::NoMatchingFiles(source_dir.to_path_buf()));
        }

        self.notifier.info(&format!(
            "Packing {} images from {}",
            files.len(),
            source_dir.display()
        ));

        let total = files.len() as u64;
        let progress_bar = self.notifier.create_progress_bar(total, "Packing");
        let mut writer = ContainerWriter::new(&self.options);
        let mut cropped = 0usize;

        for (index, path) in files.iter().enumerate() {
            // Names were filtered through `to_str` by `source_files`.
            let name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default();
            let source = fs::read(path).map_err(|e| TgaPakError::io(path, e))?;

            let image = transcoder::decode(&source).map_err(|e| TgaPakError::transcode(name, e))?;
            let result = transcoder::crop(&image).map_err(|e| TgaPakError::transcode(name, e))?;

            self.notifier.debug(&format!(
                "{}: {} -> {} bytes{}",
                name,
                source.len(),
                result.bytes.len(),
                if result.is_cropped() { " (cropped)" } else { "" }
            ));

            writer.add(name, &result.bytes)?;
            if let Some(meta) = &result.metadata {
                let record = meta.to_json().map_err(|e| TgaPakError::transcode(name, e))?;
                writer.add(&naming::metadata_entry_name(name), &record)?;
                cropped += 1;
            }

            if let Some(ref progress_bar) = progress_bar {
                progress_bar.inc(1);
            }
            self.notifier.progress(index as u64 + 1, total, "Packed");
        }

        if let Some(progress_bar) = progress_bar {
            progress_bar.finish_and_clear();
        }

        self.notifier.info(&format!(
            "Packed {} images ({} cropped) into {} entries",
            files.len(),
            cropped,
            writer.len()
        ));

        writer.finish()
    }

    /// Restores every image in a ZIP produced by [`ArchiveDriver::pack`].
    ///
    /// Output names are the lower-cased base name plus `.tga`, sorted by name.
    /// Metadata entries without a matching image are dropped.
    pub fn unpack(&self, container: &[u8]) -> Result<Vec<ExtractedFile>> {
        let entries = read_entries(container)?;
        self.notifier
            .debug(&format!("Archive holds {} entries", entries.len()));

        let groups = group_entries(entries);
        let images = groups.values().filter(|g| g.image.is_some()).count() as u64;
        let progress_bar = self.notifier.create_progress_bar(images, "Unpacking");
        let mut extracted = Vec::with_capacity(images as usize);

        for (key, group) in &groups {
            let Some(image) = &group.image else {
                if let Some(orphan) = &group.metadata {
                    self.notifier
                        .debug(&format!("Dropping {}: no matching image", orphan.name));
                }
                continue;
            };

            let metadata = group.crop_metadata()?;
            let stored = transcoder::decode(&image.bytes)
                .map_err(|e| TgaPakError::transcode(&image.name, e))?;
            if let Some(meta) = metadata
                .as_ref()
                .filter(|m| transcoder::needs_resize(&stored, m))
            {
                self.notifier.warn(&format!(
                    "{}: stored image is {}x{}, crop box is {}x{}; resizing",
                    image.name,
                    stored.width(),
                    stored.height(),
                    meta.bounds.width(),
                    meta.bounds.height()
                ));
            }
            let restored = transcoder::restore(stored, metadata.as_ref())
                .map_err(|e| TgaPakError::transcode(&image.name, e))?;
            let bytes =
                transcoder::encode(&restored).map_err(|e| TgaPakError::transcode(&image.name, e))?;

            extracted.push(ExtractedFile {
                name: naming::extracted_file_name(key),
                bytes,
            });

            if let Some(ref progress_bar) = progress_bar {
                progress_bar.inc(1);
            }
            self.notifier
                .progress(extracted.len() as u64, images, "Unpacked");
        }

        if let Some(progress_bar) = progress_bar {
            progress_bar.finish_and_clear();
        }

        self.notifier
            .info(&format!("Unpacked {} images", extracted.len()));
        Ok(extracted)
    }

    /// Summarizes each image group in an archive without decoding pixel data.
    pub fn list(&self, container: &[u8]) -> Result<Vec<EntrySummary>> {
        let groups = group_entries(read_entries(container)?);

        let mut summaries = Vec::with_capacity(groups.len());
        for group in groups.values() {
            let Some(image) = &group.image else {
                continue;
            };
            summaries.push(EntrySummary {
                name: image.name.clone(),
                stored_size: image.bytes.len(),
                metadata: group.crop_metadata()?,
            });
        }

        Ok(summaries)
    }
}
