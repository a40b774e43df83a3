use std::sync::Arc;

/// Bytes per decoded pixel (RGBA).
const BYTES_PER_PIXEL: usize = 4;

/// An encoded image payload plus the display metadata the shell decoded
/// from it.
///
/// The payload is shared behind `Arc`, so clones handed out by the cache are
/// cheap. Dimensions are known for images inserted by the shell and unknown
/// (zero) for images rehydrated from disk.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedImage {
    data: Arc<Vec<u8>>,
    width: u32,
    height: u32,
    scale: u32,
}

impl CachedImage {
    /// Wrap an encoded payload with its decoded dimensions and screen scale.
    pub fn new(data: Vec<u8>, width: u32, height: u32, scale: u32) -> Self {
        Self {
            data: Arc::new(data),
            width,
            height,
            scale,
        }
    }

    /// Wrap a payload whose dimensions are unknown, e.g. one read back from
    /// the disk tier.
    pub fn from_encoded(data: Vec<u8>) -> Self {
        Self::new(data, 0, 0, 1)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn shared_data(&self) -> Arc<Vec<u8>> {
        Arc::clone(&self.data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// Memory-tier cost of this image in bytes: the decoded bitmap
    /// footprint (`width * height * scale^2 * 4`) when dimensions are known,
    /// the encoded payload length otherwise.
    pub fn cost(&self) -> usize {
        let pixels =
            self.width as usize * self.height as usize * (self.scale as usize).pow(2);
        if pixels == 0 {
            self.data.len()
        } else {
            pixels * BYTES_PER_PIXEL
        }
    }
}
