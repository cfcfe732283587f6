use anyhow::Result;
use image::{Rgba, RgbaImage};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

use tgapak::container::{read_entries, ContainerWriter};
use tgapak::transcoder::{decode, encode};
use tgapak::{ArchiveDriver, ArchiveOptions, BoundingBox, CropMetadata, Notifier, TgaPakError};

fn opaque(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 3) as u8, (y * 5) as u8, (x ^ y) as u8, 255])
    })
}

fn opaque_only_in(width: u32, height: u32, rect: BoundingBox) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        if rect.left <= x && x < rect.right && rect.top <= y && y < rect.bottom {
            Rgba([x as u8, y as u8, 200, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

fn write_tga(dir: &Path, name: &str, image: &RgbaImage) -> Result<()> {
    fs::write(dir.join(name), encode(image)?)?;
    Ok(())
}

fn archive_of(entries: &[(&str, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut writer = ContainerWriter::new(&ArchiveOptions::default());
    for (name, bytes) in entries {
        writer.add(name, bytes)?;
    }
    Ok(writer.finish()?)
}

#[test]
fn test_pack_and_unpack_sprite_directory() -> Result<()> {
    let source = tempdir()?;
    let sprite_box = BoundingBox::new(20, 20, 30, 30);
    let a = opaque(64, 64);
    let b = opaque_only_in(64, 64, sprite_box);
    write_tga(source.path(), "A.tga", &a)?;
    write_tga(source.path(), "B.tga", &b)?;

    let notifier = Notifier::new(0);
    let driver = ArchiveDriver::new(&notifier, ArchiveOptions::default());
    let archive = driver.pack(source.path())?;

    let entries = read_entries(&archive)?;
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["A.tga", "B.tga", "B.meta"], "one meta entry, for B only");
    assert_eq!(
        String::from_utf8(entries[2].bytes.clone())?,
        r#"{"size":[64,64],"crop":[20,20,30,30]}"#
    );
    assert_eq!(decode(&entries[1].bytes)?.dimensions(), (10, 10));

    let files = driver.unpack(&archive)?;
    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["a.tga", "b.tga"]);

    assert_eq!(decode(&files[0].bytes)?, a, "uncropped image must round trip");

    let restored_b = decode(&files[1].bytes)?;
    assert_eq!(restored_b.dimensions(), (64, 64));
    let inside = |x: u32, y: u32| {
        sprite_box.left <= x && x < sprite_box.right && sprite_box.top <= y && y < sprite_box.bottom
    };
    for (x, y, pixel) in restored_b.enumerate_pixels() {
        if inside(x, y) {
            assert_eq!(pixel, b.get_pixel(x, y), "sprite pixel ({x}, {y})");
        } else {
            assert_eq!(pixel[3], 0, "pixel ({x}, {y}) outside the sprite must be transparent");
        }
    }

    Ok(())
}

#[test]
fn test_pack_only_takes_top_level_tga_files() -> Result<()> {
    let source = tempdir()?;
    write_tga(source.path(), "Wall.TGA", &opaque(4, 4))?;
    fs::write(source.path().join("notes.txt"), "not an image")?;
    fs::create_dir(source.path().join("nested.tga"))?;
    write_tga(&source.path().join("nested.tga"), "deep.tga", &opaque(2, 2))?;

    let notifier = Notifier::new(0);
    let driver = ArchiveDriver::new(&notifier, ArchiveOptions::default());
    let entries = read_entries(&driver.pack(source.path())?)?;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Wall.TGA");
    Ok(())
}

#[test]
fn test_pack_transparent_image_without_metadata() -> Result<()> {
    let source = tempdir()?;
    write_tga(source.path(), "ghost.tga", &RgbaImage::new(8, 8))?;

    let notifier = Notifier::new(0);
    let driver = ArchiveDriver::new(&notifier, ArchiveOptions::default());
    let entries = read_entries(&driver.pack(source.path())?)?;

    assert_eq!(entries.len(), 1, "fully transparent images are stored uncropped");
    assert_eq!(decode(&entries[0].bytes)?.dimensions(), (8, 8));
    Ok(())
}

#[test]
fn test_pack_errors() -> Result<()> {
    let notifier = Notifier::new(0);
    let driver = ArchiveDriver::new(&notifier, ArchiveOptions::default());

    let empty = tempdir()?;
    fs::write(empty.path().join("readme.md"), "nothing to pack")?;
    let err = driver.pack(empty.path()).unwrap_err();
    assert!(matches!(err, TgaPakError::NoMatchingFiles(_)));

    let err = driver.pack(&empty.path().join("missing")).unwrap_err();
    assert!(matches!(err, TgaPakError::InputNotFound(_)));

    let err = driver.pack(&empty.path().join("readme.md")).unwrap_err();
    assert!(matches!(err, TgaPakError::WrongKind { .. }));

    Ok(())
}

#[test]
fn test_pack_aborts_on_undecodable_file() -> Result<()> {
    let source = tempdir()?;
    write_tga(source.path(), "good.tga", &opaque(4, 4))?;
    fs::write(source.path().join("broken.tga"), b"this is not a targa image")?;

    let notifier = Notifier::new(0);
    let driver = ArchiveDriver::new(&notifier, ArchiveOptions::default());

    match driver.pack(source.path()) {
        Err(TgaPakError::Transcode { name, .. }) => assert_eq!(name, "broken.tga"),
        other => panic!("expected a transcode error, got {:?}", other.map(|b| b.len())),
    }
    Ok(())
}

#[test]
fn test_unpack_image_without_metadata_is_unchanged() -> Result<()> {
    let image = opaque_only_in(16, 16, BoundingBox::new(2, 2, 5, 5));
    let archive = archive_of(&[("Loose.TGA", encode(&image)?)])?;

    let notifier = Notifier::new(0);
    let driver = ArchiveDriver::new(&notifier, ArchiveOptions::default());
    let files = driver.unpack(&archive)?;

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "loose.tga");
    assert_eq!(decode(&files[0].bytes)?, image);
    Ok(())
}

#[test]
fn test_unpack_drops_orphan_metadata() -> Result<()> {
    let meta = CropMetadata::new((8, 8), BoundingBox::new(1, 1, 3, 3)).to_json()?;
    let archive = archive_of(&[
        ("orphan.meta", meta),
        ("kept.tga", encode(&opaque(3, 3))?),
    ])?;

    let notifier = Notifier::new(0);
    let driver = ArchiveDriver::new(&notifier, ArchiveOptions::default());
    let files = driver.unpack(&archive)?;

    let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, ["kept.tga"]);
    Ok(())
}

#[test]
fn test_unpack_pairs_names_case_insensitively() -> Result<()> {
    let stored = opaque(2, 3);
    let meta = CropMetadata::new((10, 10), BoundingBox::new(4, 5, 6, 8)).to_json()?;
    let archive = archive_of(&[("TANK.meta", meta), ("Tank.tga", encode(&stored)?)])?;

    let notifier = Notifier::new(0);
    let driver = ArchiveDriver::new(&notifier, ArchiveOptions::default());
    let files = driver.unpack(&archive)?;

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "tank.tga");
    let restored = decode(&files[0].bytes)?;
    assert_eq!(restored.dimensions(), (10, 10));
    assert_eq!(restored.get_pixel(4, 5), stored.get_pixel(0, 0));
    assert_eq!(restored.get_pixel(5, 7), stored.get_pixel(1, 2));
    assert_eq!(restored.get_pixel(0, 0)[3], 0);
    Ok(())
}

#[test]
fn test_unpack_rejects_malformed_metadata() -> Result<()> {
    let archive = archive_of(&[
        ("unit.tga", encode(&opaque(2, 2))?),
        ("unit.meta", b"size: 2x2".to_vec()),
    ])?;

    let notifier = Notifier::new(0);
    let driver = ArchiveDriver::new(&notifier, ArchiveOptions::default());

    match driver.unpack(&archive) {
        Err(TgaPakError::Transcode { name, .. }) => assert_eq!(name, "unit.meta"),
        other => panic!("expected a transcode error, got {:?}", other.map(|f| f.len())),
    }
    Ok(())
}

#[test]
fn test_unpack_rejects_unallocatable_canvas() -> Result<()> {
    let archive = archive_of(&[
        ("huge.tga", encode(&opaque(1, 1))?),
        ("huge.meta", br#"{"size":[4294967295,4294967295],"crop":[0,0,1,1]}"#.to_vec()),
    ])?;

    let notifier = Notifier::new(0);
    let driver = ArchiveDriver::new(&notifier, ArchiveOptions::default());

    match driver.unpack(&archive) {
        Err(TgaPakError::Transcode { name, .. }) => assert_eq!(name, "huge.meta"),
        other => panic!("expected a transcode error, got {:?}", other.map(|f| f.len())),
    }
    Ok(())
}

#[test]
fn test_list_reports_crop_records() -> Result<()> {
    let source = tempdir()?;
    write_tga(source.path(), "full.tga", &opaque(6, 6))?;
    write_tga(
        source.path(),
        "sprite.tga",
        &opaque_only_in(12, 12, BoundingBox::new(3, 4, 9, 10)),
    )?;

    let notifier = Notifier::new(1);
    let driver = ArchiveDriver::new(&notifier, ArchiveOptions::default());
    let summaries = driver.list(&driver.pack(source.path())?)?;

    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].name, "full.tga");
    assert!(!summaries[0].is_cropped());
    assert_eq!(summaries[1].name, "sprite.tga");
    assert_eq!(
        summaries[1].metadata,
        Some(CropMetadata::new((12, 12), BoundingBox::new(3, 4, 9, 10)))
    );
    Ok(())
}
