//! Export options for PSD to PNG conversion

use image::codecs::png::CompressionType;

/// Raster encoding written by the exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
}

/// PNG pixel depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngBitDepth {
    /// 8 bits per channel truecolor (PNG-24, or PNG-32 with alpha)
    TwentyFour,
}

/// Fixed options used when exporting a flattened document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub format: ExportFormat,
    pub bit_depth: PngBitDepth,
    /// Keep the alpha channel
    pub transparency: bool,
    pub interlaced: bool,
    /// 0-100, mapped onto PNG compression effort
    pub quality: u8,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            bit_depth: PngBitDepth::TwentyFour,
            transparency: true,
            interlaced: false,
            quality: 100,
        }
    }
}

impl ExportOptions {
    /// Create the default PNG-24 options
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable/disable the alpha channel
    pub fn with_transparency(mut self, transparency: bool) -> Self {
        self.transparency = transparency;
        self
    }

    /// Set quality
    pub fn with_quality(mut self, quality: u8) -> Result<Self, String> {
        if quality > 100 {
            return Err("Quality must be 0-100".to_string());
        }
        self.quality = quality;
        Ok(self)
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.interlaced {
            return Err("Interlaced PNG output is not supported".to_string());
        }

        if self.quality > 100 {
            return Err("Quality must be 0-100".to_string());
        }

        Ok(())
    }

    /// PNG compression effort for the configured quality
    pub fn compression(&self) -> CompressionType {
        match self.quality {
            0..=33 => CompressionType::Fast,
            34..=66 => CompressionType::Default,
            _ => CompressionType::Best,
        }
    }
}
