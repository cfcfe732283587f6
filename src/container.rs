//! ZIP container used as a flat name → bytes store.
//!
//! Entries are written sequentially by a single [`ContainerWriter`] and read back
//! in archive order by [`read_entries`]. Directory entries are ignored.

use crate::error::Result;
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

// Upper bound on the up-front reservation for one entry.
const MAX_PREALLOCATION: u64 = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}

/// Settings applied to every entry written to a container.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveOptions {
    pub compression: Compression,
    /// Deflate level; `None` uses the codec default. Ignored for stored entries.
    pub level: Option<i32>,
}

impl ArchiveOptions {
    fn file_options(&self) -> FileOptions {
        match self.compression {
            Compression::Deflated => FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .compression_level(self.level),
            Compression::Stored => {
                FileOptions::default().compression_method(CompressionMethod::Stored)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub bytes: Vec<u8>,
}

pub struct ContainerWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    options: FileOptions,
    entries: usize,
}

impl ContainerWriter {
    pub fn new(options: &ArchiveOptions) -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            options: options.file_options(),
            entries: 0,
        }
    }

    pub fn add(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.zip.start_file(name, self.options)?;
        self.zip
            .write_all(bytes)
            .map_err(zip::result::ZipError::Io)?;
        self.entries += 1;
        log::trace!("wrote entry {} ({} bytes)", name, bytes.len());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    pub fn finish(mut self) -> Result<Vec<u8>> {
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}

pub fn read_entries(container: &[u8]) -> Result<Vec<ArchiveEntry>> {
    let mut archive = ZipArchive::new(Cursor::new(container))?;
    let mut entries = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        if file.is_dir() {
            continue;
        }

        // The header size is untrusted; let the buffer grow with what is actually read.
        let mut bytes = Vec::with_capacity(file.size().min(MAX_PREALLOCATION) as usize);
        file.read_to_end(&mut bytes)
            .map_err(zip::result::ZipError::Io)?;
        entries.push(ArchiveEntry {
            name: file.name().to_string(),
            bytes,
        });
    }

    Ok(entries)
}
