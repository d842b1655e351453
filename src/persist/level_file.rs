//! Level-art file: magic, version and the three layer records
//!
//! Files are written Brotli compressed. Loading sniffs the magic to accept
//! uncompressed files as well.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use tracing::info;

use super::record::{read_canvas, write_canvas, ByteReader};
use super::PersistError;
use crate::canvas::LevelCanvases;

pub const LEVEL_ART_MAGIC: [u8; 4] = *b"LVCA";
pub const LEVEL_ART_VERSION: u32 = 1;

/// Uncompressed level-art bytes
pub fn level_art_to_bytes(canvases: &LevelCanvases) -> Result<Vec<u8>, PersistError> {
    let mut out = Vec::new();
    out.extend_from_slice(&LEVEL_ART_MAGIC);
    out.extend_from_slice(&LEVEL_ART_VERSION.to_le_bytes());
    for (_, canvas) in canvases.iter() {
        write_canvas(canvas, &mut out)?;
    }
    Ok(out)
}

/// Parse level-art bytes, compressed or not
pub fn level_art_from_bytes(bytes: &[u8]) -> Result<LevelCanvases, PersistError> {
    // Plain files start with the magic, anything else should be brotli
    let is_plain = bytes.starts_with(&LEVEL_ART_MAGIC);

    let decompressed;
    let data = if is_plain {
        bytes
    } else {
        let mut out = Vec::new();
        brotli::BrotliDecompress(&mut Cursor::new(bytes), &mut out)
            .map_err(|e| PersistError::Compression(e.to_string()))?;
        decompressed = out;
        decompressed.as_slice()
    };

    let mut reader = ByteReader::new(data);
    let magic = reader.read_bytes(LEVEL_ART_MAGIC.len())?;
    if magic != LEVEL_ART_MAGIC {
        return Err(PersistError::BadMagic);
    }
    let version = reader.read_u32()?;
    if version != LEVEL_ART_VERSION {
        return Err(PersistError::UnsupportedVersion(version));
    }

    let background = read_canvas(&mut reader)?;
    let shadow = read_canvas(&mut reader)?;
    let foreground = read_canvas(&mut reader)?;
    Ok(LevelCanvases::from_layers(background, shadow, foreground))
}

/// Brotli-compressed level-art bytes (quality 6, window 22)
pub fn level_art_to_compressed(canvases: &LevelCanvases) -> Result<Vec<u8>, PersistError> {
    let plain = level_art_to_bytes(canvases)?;
    let mut compressed = Vec::new();
    brotli::BrotliCompress(
        &mut Cursor::new(&plain),
        &mut compressed,
        &brotli::enc::BrotliEncoderParams {
            quality: 6,
            lgwin: 22,
            ..Default::default()
        },
    )
    .map_err(|e| PersistError::Compression(e.to_string()))?;
    Ok(compressed)
}

/// Save level art to a file (always Brotli compressed)
pub fn save_level_art<P: AsRef<Path>>(path: P, canvases: &LevelCanvases) -> Result<(), PersistError> {
    let path = path.as_ref();
    let compressed = level_art_to_compressed(canvases)?;
    fs::write(path, &compressed)?;
    info!(path = %path.display(), bytes = compressed.len(), "saved level art");
    Ok(())
}

/// Load level art from a file
pub fn load_level_art<P: AsRef<Path>>(path: P) -> Result<LevelCanvases, PersistError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let canvases = level_art_from_bytes(&bytes)?;
    info!(path = %path.display(), "loaded level art");
    Ok(canvases)
}
