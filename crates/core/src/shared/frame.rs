use ndarray::{s, ArrayView3};

/// A decoded raster image: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the domain layer
/// treats pixel data as opaque.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Copies the half-open pixel rectangle `[x1, x2) × [y1, y2)` into a new frame.
    ///
    /// Bounds are clamped to the frame; an inverted or empty rectangle yields
    /// a zero-size frame rather than panicking.
    pub fn crop(&self, x1: u32, y1: u32, x2: u32, y2: u32) -> Frame {
        let x2 = x2.min(self.width);
        let y2 = y2.min(self.height);
        let x1 = x1.min(x2);
        let y1 = y1.min(y2);

        let view = self.as_ndarray();
        let region = view.slice(s![y1 as usize..y2 as usize, x1 as usize..x2 as usize, ..]);
        let data: Vec<u8> = region.iter().copied().collect();

        Frame::new(data, x2 - x1, y2 - y1, self.channels)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
