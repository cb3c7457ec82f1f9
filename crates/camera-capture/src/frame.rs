//! BGR video frame type

/// Decoded BGR video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// BGR pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Frame sequence number
    pub sequence: u64,
}

impl VideoFrame {
    /// Create a new video frame from raw BGR data.
    pub fn new(data: Vec<u8>, width: u32, height: u32, sequence: u64) -> Self {
        debug_assert_eq!(data.len(), (width * height * 3) as usize);
        Self {
            data,
            width,
            height,
            sequence,
        }
    }

    /// Create a black frame of the given size.
    pub fn black(width: u32, height: u32) -> Self {
        Self::new(vec![0; (width * height * 3) as usize], width, height, 0)
    }

    /// Convert an RGB byte buffer (e.g. a decoded JPEG) into a BGR frame.
    pub fn from_rgb(rgb: &[u8], width: u32, height: u32, sequence: u64) -> Self {
        let mut data = Vec::with_capacity(rgb.len());
        for px in rgb.chunks_exact(3) {
            data.extend_from_slice(&[px[2], px[1], px[0]]);
        }
        Self::new(data, width, height, sequence)
    }

    /// Get pixel at (x, y) as [b, g, r].
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Set pixel at (x, y) from [b, g, r]. Out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, bgr: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        self.data[idx..idx + 3].copy_from_slice(&bgr);
    }

    /// Copy another frame into this one at (x, y). The source must fit
    /// entirely inside the target; otherwise nothing is copied.
    pub fn blit(&mut self, src: &VideoFrame, x: u32, y: u32) -> bool {
        if x + src.width > self.width || y + src.height > self.height {
            return false;
        }
        for row in 0..src.height {
            let src_start = (row * src.width * 3) as usize;
            let src_end = src_start + (src.width * 3) as usize;
            let dst_start = (((y + row) * self.width + x) * 3) as usize;
            let dst_end = dst_start + (src.width * 3) as usize;
            self.data[dst_start..dst_end].copy_from_slice(&src.data[src_start..src_end]);
        }
        true
    }
}
