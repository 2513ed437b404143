//! Document engine: opening layered documents and exporting flattened PNGs

use std::any::Any;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::panic;
use std::path::{Path, PathBuf};

use image::codecs::png::{FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder};
use log::debug;
use psd::Psd;

use crate::conversion::config::ExportOptions;
use crate::error::{EngineError, EngineResult};

/// An opened document. Closing consumes it, so it can only be closed once.
pub trait Document {
    /// Export the flattened image to `dest`
    fn export(&mut self, dest: &Path, options: &ExportOptions) -> EngineResult<()>;

    /// Release the document, discarding any in-memory changes
    fn close(self) -> EngineResult<()>
    where
        Self: Sized;
}

/// Opens source documents for conversion
pub trait DocumentEngine {
    type Document: Document;

    fn open(&self, path: &Path) -> EngineResult<Self::Document>;
}

/// Engine backed by the `psd` decoder and the `image` PNG encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct PsdEngine;

impl PsdEngine {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentEngine for PsdEngine {
    type Document = PsdDocument;

    fn open(&self, path: &Path) -> EngineResult<PsdDocument> {
        let bytes = fs::read(path)?;
        if bytes.len() < PSD_HEADER_LEN || !bytes.starts_with(PSD_SIGNATURE) {
            return Err(EngineError::decode("missing 8BPS file signature"));
        }
        check_layout(&bytes)?;

        // the decoder indexes into the buffer and can panic on truncated sections
        let decoded = panic::catch_unwind(|| {
            Psd::from_bytes(&bytes).map(|psd| (psd.width(), psd.height(), psd.rgba()))
        })
        .map_err(|payload| EngineError::decode(panic_message(payload.as_ref())))?;

        let (width, height, pixels) = decoded.map_err(|e| EngineError::decode(e.to_string()))?;
        PsdDocument::from_rgba(path, width, height, pixels)
    }
}

const PSD_SIGNATURE: &[u8] = b"8BPS";
const PSD_HEADER_LEN: usize = 26;

const LENGTH_PREFIXED_SECTIONS: [&str; 3] = [
    "color mode data",
    "image resources",
    "layer and mask information",
];

/// Walk the section lengths and make sure the composite image data is all there.
///
/// The decoder zero-fills missing pixel data, so a truncated file would
/// otherwise export as a black image.
fn check_layout(bytes: &[u8]) -> EngineResult<()> {
    let version = read_u16(bytes, 4).unwrap_or(0);
    if version != 1 {
        return Err(EngineError::decode(format!(
            "unsupported PSD version {}",
            version
        )));
    }

    let channels = read_u16(bytes, 12).unwrap_or(0) as u64;
    let height = read_u32(bytes, 14).unwrap_or(0) as u64;
    let width = read_u32(bytes, 18).unwrap_or(0) as u64;
    let depth = read_u16(bytes, 22).unwrap_or(0) as u64;

    let mut pos = PSD_HEADER_LEN;
    for section in LENGTH_PREFIXED_SECTIONS {
        let len = read_u32(bytes, pos)
            .ok_or_else(|| EngineError::decode(format!("{} section is missing", section)))?;
        let end = (pos as u64 + 4).saturating_add(len as u64);
        if end > bytes.len() as u64 {
            return Err(EngineError::decode(format!(
                "{} section runs past the end of the file",
                section
            )));
        }
        pos = end as usize;
    }

    let compression = read_u16(bytes, pos)
        .ok_or_else(|| EngineError::decode("image data section is missing"))?;
    pos += 2;

    let rows = channels * height;
    let row_bytes = (width * depth).div_ceil(8);
    let needed = match compression {
        0 => rows * row_bytes,
        1 => {
            let table = rows * 2;
            if pos as u64 + table > bytes.len() as u64 {
                return Err(EngineError::decode("RLE byte count table is truncated"));
            }
            let packed: u64 = (0..rows as usize)
                .filter_map(|row| read_u16(bytes, pos + row * 2))
                .map(u64::from)
                .sum();
            table + packed
        }
        other => {
            return Err(EngineError::decode(format!(
                "unsupported image data compression {}",
                other
            )))
        }
    };

    let available = (bytes.len() - pos) as u64;
    if available < needed {
        return Err(EngineError::decode(format!(
            "image data is truncated: {} of {} bytes present",
            available, needed
        )));
    }
    Ok(())
}

fn read_u16(bytes: &[u8], at: usize) -> Option<u16> {
    let raw = bytes.get(at..at.checked_add(2)?)?;
    Some(u16::from_be_bytes([raw[0], raw[1]]))
}

fn read_u32(bytes: &[u8], at: usize) -> Option<u32> {
    let raw = bytes.get(at..at.checked_add(4)?)?;
    Some(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("decoder failed: {}", detail)
}

/// Flattened composite of an opened PSD file
#[derive(Debug, Clone)]
pub struct PsdDocument {
    source: PathBuf,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PsdDocument {
    /// Wrap an RGBA8 composite. The buffer must hold exactly `width * height` pixels.
    pub fn from_rgba(source: &Path, width: u32, height: u32, pixels: Vec<u8>) -> EngineResult<Self> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 {
            return Err(EngineError::decode(format!(
                "document has no pixels ({}x{})",
                width, height
            )));
        }
        if pixels.len() != expected {
            return Err(EngineError::decode(format!(
                "composite holds {} bytes, expected {}",
                pixels.len(),
                expected
            )));
        }

        Ok(Self {
            source: source.to_path_buf(),
            width,
            height,
            pixels,
        })
    }

    fn write_png<W: Write>(&self, writer: W, options: &ExportOptions) -> EngineResult<()> {
        let encoder =
            PngEncoder::new_with_quality(writer, options.compression(), FilterType::Adaptive);

        if options.transparency {
            encoder.write_image(&self.pixels, self.width, self.height, ExtendedColorType::Rgba8)?;
        } else {
            let rgb = flatten_onto_white(&self.pixels);
            encoder.write_image(&rgb, self.width, self.height, ExtendedColorType::Rgb8)?;
        }

        Ok(())
    }
}

impl Document for PsdDocument {
    fn export(&mut self, dest: &Path, options: &ExportOptions) -> EngineResult<()> {
        options.validate().map_err(EngineError::options)?;

        write_or_remove(dest, |writer| self.write_png(writer, options))?;

        debug!(
            "Exported {} ({}x{}) to {}",
            self.source.display(),
            self.width,
            self.height,
            dest.display()
        );
        Ok(())
    }

    fn close(self) -> EngineResult<()> {
        // Nothing is written back to the source file
        drop(self.pixels);
        Ok(())
    }
}

/// Create `dest` and fill it with `write`. A failed write leaves no partial file behind.
fn write_or_remove<F>(dest: &Path, write: F) -> EngineResult<()>
where
    F: FnOnce(&mut BufWriter<File>) -> EngineResult<()>,
{
    let mut writer = BufWriter::new(File::create(dest)?);
    let result = write(&mut writer).and_then(|()| writer.flush().map_err(EngineError::from));
    drop(writer);

    if result.is_err() {
        if let Err(e) = fs::remove_file(dest) {
            debug!("Could not remove partial output {}: {}", dest.display(), e);
        }
    }
    result
}

/// Composite RGBA8 pixels over an opaque white background
fn flatten_onto_white(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let alpha = px[3] as u32;
        for &channel in &px[..3] {
            let value = (channel as u32 * alpha + 255 * (255 - alpha) + 127) / 255;
            rgb.push(value as u8);
        }
    }
    rgb
}
