use serde::{Deserialize, Serialize};

use crate::errors::BuildError;

/// Bytes per RGBA8888 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Background of the dog-ear, simulating the back side of the notification.
const DOGEAR_BACKGROUND: Color = Color(0xFFEE_EEEE);

/// Raw RGBA8888 bitmap, row-major, no padding.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    #[serde(with = "pixels_base64")]
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Wrap a pixel buffer, checking it matches the declared size.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, BuildError> {
        match byte_len(width, height) {
            Some(expected) if width != 0 && height != 0 && pixels.len() == expected => Ok(Self {
                width,
                height,
                pixels,
            }),
            _ => Err(BuildError::InvalidBitmap {
                width,
                height,
                len: pixels.len(),
            }),
        }
    }

    /// A bitmap filled with a single color.
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self, BuildError> {
        let len = byte_len(width, height).ok_or(BuildError::InvalidBitmap {
            width,
            height,
            len: 0,
        })?;
        let pixels = color.to_rgba().repeat(len / BYTES_PER_PIXEL);
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Invert color channels, keeping alpha.
    ///
    /// Small icons are monochrome; inverting makes them contrast with the
    /// accent background of the target container.
    pub fn inverted(&self) -> Self {
        let mut pixels = self.pixels.clone();
        for px in pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px[0] = !px[0];
            px[1] = !px[1];
            px[2] = !px[2];
        }
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize) * (self.width as usize) + x as usize) * BYTES_PER_PIXEL;
        let px = self.pixels.get(offset..offset + BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let offset = ((y as usize) * (self.width as usize) + x as usize) * BYTES_PER_PIXEL;
        self.pixels[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&rgba);
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Packed ARGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const WHITE: Color = Color(0xFFFF_FFFF);

    /// Parse `#RRGGBB` or `#AARRGGBB`.
    pub fn parse(s: &str) -> Result<Self, BuildError> {
        let invalid = || BuildError::InvalidColor(s.to_owned());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        match hex.len() {
            6 => Ok(Self(0xFF00_0000 | value)),
            8 => Ok(Self(value)),
            _ => Err(invalid()),
        }
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn to_rgba(self) -> [u8; 4] {
        let [a, r, g, b] = self.0.to_be_bytes();
        [r, g, b, a]
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

/// Buffer size for `width` x `height` pixels; `None` if it overflows.
fn byte_len(width: u32, height: u32) -> Option<usize> {
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)?
        .checked_mul(BYTES_PER_PIXEL)
}

/// Render the accent-colored corner triangle marking the source container.
///
/// The triangle covers the lower-right half of a `size` x `size` square on a
/// light grey background.
pub fn dogear(color: Color, size: u32) -> Result<Bitmap, BuildError> {
    let mut bitmap = Bitmap::filled(size, size, DOGEAR_BACKGROUND)?;
    let fill = color.to_rgba();
    for y in 0..size {
        for x in 0..size {
            if u64::from(x) + u64::from(y) + 1 >= u64::from(size) {
                bitmap.set_pixel(x, y, fill);
            }
        }
    }
    Ok(bitmap)
}

/// Serde helper for pixel buffers as base64 strings.
mod pixels_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(pixels: &[u8], s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&STANDARD.encode(pixels))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(d)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
