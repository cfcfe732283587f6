use std::path::{Path, PathBuf};

pub const IMAGE_EXTENSION: &str = "tga";
pub const METADATA_EXTENSION: &str = "meta";

/// What an archive entry holds, judged by its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Image,
    Metadata,
}

impl EntryKind {
    pub fn classify(name: &str) -> Option<EntryKind> {
        let extension = Path::new(name).extension()?.to_str()?;
        if extension.eq_ignore_ascii_case(IMAGE_EXTENSION) {
            Some(EntryKind::Image)
        } else if extension.eq_ignore_ascii_case(METADATA_EXTENSION) {
            Some(EntryKind::Metadata)
        } else {
            None
        }
    }
}

pub fn is_image_name(name: &str) -> bool {
    EntryKind::classify(name) == Some(EntryKind::Image)
}

/// File stem of an entry name, original case preserved.
pub fn base_name(name: &str) -> Option<&str> {
    Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
}

/// Key pairing an image entry with its metadata entry.
pub fn group_key(name: &str) -> Option<String> {
    base_name(name).map(|stem| stem.to_lowercase())
}

pub fn metadata_entry_name(image_name: &str) -> String {
    let stem = base_name(image_name).unwrap_or(image_name);
    format!("{}.{}", stem, METADATA_EXTENSION)
}

pub fn extracted_file_name(key: &str) -> String {
    format!("{}.{}", key.to_lowercase(), IMAGE_EXTENSION)
}

/// `<DIRNAME>.ZIP` in upper case, next to the source directory.
pub fn default_archive_path(source_dir: &Path) -> Option<PathBuf> {
    let name = source_dir.file_name()?.to_str()?;
    let archive = format!("{}.ZIP", name.to_uppercase());
    Some(match source_dir.parent() {
        Some(parent) => parent.join(archive),
        None => PathBuf::from(archive),
    })
}

/// Directory named after the archive stem, next to the archive.
pub fn default_extract_dir(archive: &Path) -> Option<PathBuf> {
    let stem = archive.file_stem()?;
    Some(match archive.parent() {
        Some(parent) => parent.join(stem),
        None => PathBuf::from(stem),
    })
}
