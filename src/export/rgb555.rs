//! RGB555 big-endian texture format.
//!
//! Each pixel is a `u16` laid out as `0RRRRRGGGGGBBBBB`, stored row-major,
//! most significant byte first, with no header.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use image::{GrayImage, Rgb, RgbImage};
use thiserror::Error;

/// Errors that can occur reading or writing RGB555 files.
#[derive(Error, Debug)]
pub enum Rgb555Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Size mismatch: expected {expected} bytes for {width}x{height}, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: u64,
        actual: u64,
    },
}

/// Flat fill used when a file opens but holds too few pixels.
pub const SIZE_MISMATCH_FILL: Rgb555 = Rgb555(0x7C1F);

/// One packed 5-5-5 pixel. The top bit is always clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb555(pub u16);

impl Rgb555 {
    /// Keeps the top five bits of each channel.
    #[inline]
    pub fn pack(r: u8, g: u8, b: u8) -> Self {
        let (r, g, b) = ((r >> 3) as u16, (g >> 3) as u16, (b >> 3) as u16);
        Self((r << 10) | (g << 5) | b)
    }

    #[inline]
    pub fn from_gray(v: u8) -> Self {
        Self::pack(v, v, v)
    }

    /// Expands back to bytes; each channel comes back as `c & 0xF8`.
    #[inline]
    pub fn unpack(self) -> [u8; 3] {
        let v = self.0;
        [
            (((v >> 10) & 0x1F) << 3) as u8,
            (((v >> 5) & 0x1F) << 3) as u8,
            ((v & 0x1F) << 3) as u8,
        ]
    }
}

/// A row-major grid of packed pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedTexture {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgb555>,
}

impl PackedTexture {
    /// Serializes every pixel big-endian.
    pub fn to_be_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.0.to_be_bytes()).collect()
    }

    /// Parses big-endian pixels. `bytes` must hold exactly `width * height` pixels.
    pub fn from_be_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self, Rgb555Error> {
        let expected = expected_file_size(width, height);
        if bytes.len() as u64 != expected {
            return Err(Rgb555Error::SizeMismatch {
                width,
                height,
                expected,
                actual: bytes.len() as u64,
            });
        }

        let pixels = bytes
            .chunks_exact(2)
            .map(|c| Rgb555(u16::from_be_bytes([c[0], c[1]])))
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Writes the raw pixel stream. Does not flush.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for pixel in &self.pixels {
            writer.write_all(&pixel.0.to_be_bytes())?;
        }
        Ok(())
    }

    /// Expands to 8-bit RGB for previewing.
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb(self.pixels[(y * self.width + x) as usize].unpack())
        })
    }

    /// Gradient test pattern: R follows x, G follows y, B is mid-gray.
    pub fn test_pattern(width: u32, height: u32) -> Self {
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            for x in 0..width {
                let r = (x * 255 / width) as u8 & 0xF8;
                let g = (y * 255 / height) as u8 & 0xF8;
                let b = 128u8 & 0xF8;
                pixels.push(Rgb555::pack(r, g, b));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn filled(width: u32, height: u32, pixel: Rgb555) -> Self {
        Self {
            width,
            height,
            pixels: vec![pixel; (width as usize) * (height as usize)],
        }
    }
}

/// Images that can be packed into RGB555.
pub trait Rgb555Source {
    fn to_packed(&self) -> PackedTexture;
}

impl Rgb555Source for GrayImage {
    fn to_packed(&self) -> PackedTexture {
        PackedTexture {
            width: self.width(),
            height: self.height(),
            pixels: self.pixels().map(|p| Rgb555::from_gray(p[0])).collect(),
        }
    }
}

impl Rgb555Source for RgbImage {
    fn to_packed(&self) -> PackedTexture {
        PackedTexture {
            width: self.width(),
            height: self.height(),
            pixels: self
                .pixels()
                .map(|p| Rgb555::pack(p[0], p[1], p[2]))
                .collect(),
        }
    }
}

/// Packs a grayscale or RGB image.
pub fn encode<S: Rgb555Source + ?Sized>(source: &S) -> PackedTexture {
    source.to_packed()
}

/// Writes a texture as a headerless big-endian RGB555 file.
pub fn write_rgb555(path: &Path, texture: &PackedTexture) -> Result<(), Rgb555Error> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    texture.write_to(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Reads a `width × height` RGB555 file; the file must be exactly that size.
pub fn load_rgb555(path: &Path, width: u32, height: u32) -> Result<PackedTexture, Rgb555Error> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    PackedTexture::from_be_bytes(width, height, &bytes)
}

/// Loads a texture, substituting a placeholder instead of failing.
///
/// Only the first `width * height` pixels are read, so trailing bytes are
/// ignored. A file that cannot be opened yields
/// [`PackedTexture::test_pattern`]; one that opens but is short or fails to
/// read yields a flat [`SIZE_MISMATCH_FILL`].
pub fn load_rgb555_or_fallback(path: &Path, width: u32, height: u32) -> PackedTexture {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(_) => return PackedTexture::test_pattern(width, height),
    };

    let expected = expected_file_size(width, height);
    let mut bytes = Vec::new();
    match file.take(expected).read_to_end(&mut bytes) {
        Ok(_) => PackedTexture::from_be_bytes(width, height, &bytes)
            .unwrap_or_else(|_| PackedTexture::filled(width, height, SIZE_MISMATCH_FILL)),
        Err(_) => PackedTexture::filled(width, height, SIZE_MISMATCH_FILL),
    }
}

/// Returns the file size of a `width × height` RGB555 texture.
pub fn expected_file_size(width: u32, height: u32) -> u64 {
    (width as u64) * (height as u64) * 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;
    use tempfile::tempdir;

    #[test]
    fn test_pack_layout() {
        assert_eq!(Rgb555::pack(0xFF, 0, 0).0, 0x7C00);
        assert_eq!(Rgb555::pack(0, 0xFF, 0).0, 0x03E0);
        assert_eq!(Rgb555::pack(0, 0, 0xFF).0, 0x001F);
        assert_eq!(Rgb555::pack(0xFF, 0xFF, 0xFF).0, 0x7FFF);
        assert_eq!(Rgb555::pack(0x07, 0x07, 0x07).0, 0);
    }

    #[test]
    fn test_top_bit_clear() {
        for v in 0..=255u8 {
            assert_eq!(Rgb555::pack(v, v, v).0 & 0x8000, 0);
        }
    }

    #[test]
    fn test_unpack_keeps_top_bits() {
        for r in 0..=255u8 {
            for g in 0..=255u8 {
                for b in 0..=255u8 {
                    assert_eq!(
                        Rgb555::pack(r, g, b).unpack(),
                        [r & 0xF8, g & 0xF8, b & 0xF8]
                    );
                }
            }
        }
    }

    #[test]
    fn test_gray_replicated() {
        let img = GrayImage::from_pixel(2, 1, Luma([200]));
        let packed = encode(&img);
        assert_eq!(packed.pixels, vec![Rgb555::pack(200, 200, 200); 2]);
    }

    #[test]
    fn test_big_endian_order() {
        let texture = PackedTexture {
            width: 2,
            height: 1,
            pixels: vec![Rgb555(0x1234), Rgb555(0x7C1F)],
        };
        assert_eq!(texture.to_be_bytes(), vec![0x12, 0x34, 0x7C, 0x1F]);
    }

    #[test]
    fn test_row_major() {
        let img = RgbImage::from_fn(2, 2, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 0]));
        let packed = encode(&img);
        assert_eq!(
            packed.pixels,
            vec![
                Rgb555::pack(0, 0, 0),
                Rgb555::pack(8, 0, 0),
                Rgb555::pack(0, 8, 0),
                Rgb555::pack(8, 8, 0),
            ]
        );
    }

    #[test]
    fn test_write_and_load() {
        let img = RgbImage::from_fn(8, 4, |x, y| Rgb([(x * 30) as u8, (y * 60) as u8, 128]));
        let packed = encode(&img);

        let dir = tempdir().unwrap();
        let path = dir.path().join("test.rgb555");
        write_rgb555(&path, &packed).unwrap();

        let metadata = std::fs::metadata(&path).unwrap();
        assert_eq!(metadata.len(), expected_file_size(8, 4));

        let loaded = load_rgb555(&path, 8, 4).unwrap();
        assert_eq!(loaded, packed);
    }

    #[test]
    fn test_file_bytes_big_endian() {
        let texture = PackedTexture::filled(1, 1, Rgb555(0x1234));
        let dir = tempdir().unwrap();
        let path = dir.path().join("one.rgb555");
        write_rgb555(&path, &texture).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), vec![0x12, 0x34]);
    }

    #[test]
    fn test_load_size_mismatch() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.rgb555");
        std::fs::write(&path, [0u8; 6]).unwrap();

        match load_rgb555(&path, 2, 2) {
            Err(Rgb555Error::SizeMismatch {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 8);
                assert_eq!(actual, 6);
            }
            other => panic!("expected size mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_fallbacks() {
        let dir = tempdir().unwrap();

        let missing = load_rgb555_or_fallback(&dir.path().join("missing.rgb555"), 4, 4);
        assert_eq!(missing, PackedTexture::test_pattern(4, 4));

        let path = dir.path().join("short.rgb555");
        std::fs::write(&path, [0u8; 3]).unwrap();
        let short = load_rgb555_or_fallback(&path, 4, 4);
        assert!(short.pixels.iter().all(|&p| p == SIZE_MISMATCH_FILL));
        assert_eq!(short.pixels.len(), 16);
    }

    #[test]
    fn test_fallback_oversize_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("long.rgb555");
        let mut bytes = [0x12u8, 0x34].repeat(4);
        bytes.extend_from_slice(&[0xAB, 0xCD]);
        std::fs::write(&path, &bytes).unwrap();

        let loaded = load_rgb555_or_fallback(&path, 2, 2);
        assert_eq!(loaded, PackedTexture::filled(2, 2, Rgb555(0x1234)));

        // The strict loader still rejects trailing bytes.
        assert!(matches!(
            load_rgb555(&path, 2, 2),
            Err(Rgb555Error::SizeMismatch { actual: 10, .. })
        ));
    }

    #[test]
    fn test_fallback_unreadable_file() {
        // A directory opens on Linux but fails to read.
        let dir = tempdir().unwrap();
        let loaded = load_rgb555_or_fallback(dir.path(), 2, 2);
        if cfg!(unix) {
            assert_eq!(loaded, PackedTexture::filled(2, 2, SIZE_MISMATCH_FILL));
        }
    }

    #[test]
    fn test_test_pattern_gradient() {
        let pattern = PackedTexture::test_pattern(32, 32);
        assert_eq!(pattern.pixels[0].unpack(), [0, 0, 128]);
        let last = pattern.pixels[32 * 32 - 1].unpack();
        assert_eq!(last, [(31 * 255 / 32) as u8 & 0xF8, (31 * 255 / 32) as u8 & 0xF8, 128]);
    }

    #[test]
    fn test_to_rgb_image() {
        let texture = PackedTexture::filled(3, 2, Rgb555::pack(255, 100, 7));
        let img = texture.to_rgb_image();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0, [248, 96, 0]);
    }
}
