//! BLP2 texture decoding
//!
//! Decodes the top mip level of a BLP2 blob into RGBA8 pixels. Two
//! block-compressed encodings (DXT1 and DXT5) and the raw ARGB layout
//! are handled; anything else is rejected per image, so one malformed
//! texture never aborts a batch.

mod dxt;

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::Cursor;

use crate::error::{Error, Result};

/// Texture magic: "BLP2"
pub const BLP_MAGIC: [u8; 4] = *b"BLP2";

/// Fixed header size in bytes
pub const BLP_HEADER_SIZE: usize = 1172;

/// Color encoding: DXT-compressed blocks
pub const ENCODING_DXT: u8 = 2;

/// Color encodings 3 and 4: flat ARGB8888 pixels
pub const ENCODING_ARGB: [u8; 2] = [3, 4];

/// Alpha-format discriminator selecting DXT5 within [`ENCODING_DXT`]
pub const ALPHA_FORMAT_DXT5: u8 = 7;

/// The fixed 1172-byte texture header
#[derive(Debug, Clone)]
pub struct BlpHeader {
    /// Format version (1 for BLP2)
    pub version: u32,
    /// Color encoding discriminator
    pub color_encoding: u8,
    /// Bits of alpha stored per pixel
    pub alpha_depth: u8,
    /// Sub-format discriminator: 7 selects DXT5, anything else DXT1
    pub alpha_format: u8,
    /// Mip chain marker
    pub mip_count: u8,
    /// Width of mip 0 in pixels
    pub width: u32,
    /// Height of mip 0 in pixels
    pub height: u32,
    /// Offsets of the 16 mip levels from the start of the blob
    pub mip_offsets: [u32; 16],
    /// Sizes of the 16 mip levels
    pub mip_sizes: [u32; 16],
    /// 256-entry palette; present in every header, unused by the
    /// supported encodings
    pub palette: [u32; 256],
}

impl BlpHeader {
    /// Parses the fixed header from the start of a texture blob
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < BLP_HEADER_SIZE {
            return Err(Error::Format(format!(
                "texture blob of {} bytes is smaller than the {BLP_HEADER_SIZE}-byte header",
                data.len()
            )));
        }
        if data[0..4] != BLP_MAGIC {
            return Err(Error::Format(format!(
                "bad texture magic {:?}",
                &data[0..4]
            )));
        }

        let mut cursor = Cursor::new(&data[4..BLP_HEADER_SIZE]);
        let version = cursor.read_u32::<LittleEndian>()?;
        let color_encoding = cursor.read_u8()?;
        let alpha_depth = cursor.read_u8()?;
        let alpha_format = cursor.read_u8()?;
        let mip_count = cursor.read_u8()?;
        let width = cursor.read_u32::<LittleEndian>()?;
        let height = cursor.read_u32::<LittleEndian>()?;

        let mut mip_offsets = [0u32; 16];
        cursor.read_u32_into::<LittleEndian>(&mut mip_offsets)?;
        let mut mip_sizes = [0u32; 16];
        cursor.read_u32_into::<LittleEndian>(&mut mip_sizes)?;
        let mut palette = [0u32; 256];
        cursor.read_u32_into::<LittleEndian>(&mut palette)?;

        Ok(Self {
            version,
            color_encoding,
            alpha_depth,
            alpha_format,
            mip_count,
            width,
            height,
            mip_offsets,
            mip_sizes,
            palette,
        })
    }
}

/// A decoded image: immutable RGBA8 pixels, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// `width * height * 4` bytes, RGBA order
    pub pixels: Vec<u8>,
}

impl Image {
    pub(crate) fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; width as usize * height as usize * 4],
        }
    }

    pub(crate) fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// RGBA value at `(x, y)`, if in bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }
}

/// Decodes the top mip level of a texture blob
pub fn decode(data: &[u8]) -> Result<Image> {
    let header = BlpHeader::parse(data)?;

    let offset = header.mip_offsets[0] as usize;
    let size = header.mip_sizes[0] as usize;
    if offset == 0 || size == 0 || offset.saturating_add(size) > data.len() {
        return Err(Error::Format(format!(
            "mip 0 at {offset}+{size} lies outside the {}-byte blob",
            data.len()
        )));
    }
    let mip = &data[offset..offset + size];

    match header.color_encoding {
        ENCODING_DXT => {
            if header.alpha_format == ALPHA_FORMAT_DXT5 {
                dxt::decode_dxt5(header.width, header.height, mip)
            } else {
                dxt::decode_dxt1(header.width, header.height, mip)
            }
        }
        enc if ENCODING_ARGB.contains(&enc) => decode_argb(header.width, header.height, mip),
        other => Err(Error::UnsupportedEncoding(other)),
    }
}

/// Flat row-major ARGB8888 pixels
fn decode_argb(width: u32, height: u32, mip: &[u8]) -> Result<Image> {
    let required = width as u64 * height as u64 * 4;
    if (mip.len() as u64) < required {
        return Err(Error::Format(format!(
            "ARGB mip holds {} bytes, {width}x{height} needs {required}",
            mip.len()
        )));
    }

    let mut image = Image::blank(width, height);
    let mut o = 0usize;
    for y in 0..height {
        for x in 0..width {
            let (a, r, g, b) = (mip[o], mip[o + 1], mip[o + 2], mip[o + 3]);
            image.put(x, y, [r, g, b, a]);
            o += 4;
        }
    }

    Ok(image)
}
