use crate::foundation::core::{Canvas, HexColor};
use crate::foundation::error::{OliveError, OliveResult};

/// Largest accepted pixel buffer, in bytes (1 GiB of RGBA8).
pub const MAX_SURFACE_BYTES: usize = 1 << 30;

/// An in-memory RGBA8 canvas.
///
/// Pixels are straight (not premultiplied) alpha, row-major and tightly packed. Every drawing
/// operation in this crate produces opaque pixels.
#[derive(Clone, Debug)]
pub struct PixelSurface {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// RGBA8 bytes.
    pub data: Vec<u8>,
}

impl PixelSurface {
    /// Allocate a surface filled with `color`.
    pub fn filled(canvas: Canvas, color: HexColor) -> OliveResult<Self> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(OliveError::render("surface must be at least 1x1"));
        }

        let bytes = (canvas.width as usize)
            .checked_mul(canvas.height as usize)
            .and_then(|n| n.checked_mul(4))
            .filter(|&n| n <= MAX_SURFACE_BYTES)
            .ok_or_else(|| {
                OliveError::render(format!(
                    "surface size too large: {}x{} (max {MAX_SURFACE_BYTES} bytes)",
                    canvas.width, canvas.height
                ))
            })?;

        let data = color.to_rgba8().repeat(bytes / 4);
        Ok(Self {
            width: canvas.width,
            height: canvas.height,
            data,
        })
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    pub fn fill(&mut self, color: HexColor) {
        let px = color.to_rgba8();
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    pub fn fill_row(&mut self, y: u32, color: HexColor) {
        let px = color.to_rgba8();
        let stride = self.width as usize * 4;
        let start = y as usize * stride;
        for chunk in self.data[start..start + stride].chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    pub fn fill_column(&mut self, x: u32, color: HexColor) {
        let px = color.to_rgba8();
        for y in 0..self.height {
            let i = self.index(x, y);
            self.data[i..i + 4].copy_from_slice(&px);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.index(x, y);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Copy premultiplied RGBA8 pixels of identical size, un-premultiplying on the way.
    pub fn copy_from_premul(&mut self, premul: &[u8]) -> OliveResult<()> {
        if premul.len() != self.data.len() {
            return Err(OliveError::render(format!(
                "pixel buffer size mismatch: expected {} bytes, got {}",
                self.data.len(),
                premul.len()
            )));
        }

        fn unpremul(c: u8, a: u8) -> u8 {
            if a == 0 {
                return 0;
            }
            ((u16::from(c) * 255 + u16::from(a) / 2) / u16::from(a)).min(255) as u8
        }

        for (dst, src) in self.data.chunks_exact_mut(4).zip(premul.chunks_exact(4)) {
            let a = src[3];
            dst[0] = unpremul(src[0], a);
            dst[1] = unpremul(src[1], a);
            dst[2] = unpremul(src[2], a);
            dst[3] = a;
        }
        Ok(())
    }

    /// RGB8 bytes with alpha dropped, for encoders without an alpha channel.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&px[..3]);
        }
        out
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}
