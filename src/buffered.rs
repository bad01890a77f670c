//! Buffered drawing surface
//!
//! [`BufferedDisplay`] pairs a [`Display`] with a [`FrameBuffer`]. Drawing
//! only touches memory; [`update`](BufferedDisplay::update) pushes the whole
//! frame to the panel.

use embedded_hal::delay::DelayNs;

use crate::color::Color;
use crate::display::Display;
use crate::error::Error;
use crate::framebuffer::FrameBuffer;
use crate::geometry::{Point, Rect};
use crate::image::{ImageSource, is_lit};
use crate::interface::DisplayInterface;

type BufferedResult<I> = core::result::Result<(), Error<I>>;

/// Display with an in-memory frame
///
/// ## Type Parameters
///
/// * `I` - Interface type implementing [`DisplayInterface`]
/// * `B` - Frame storage implementing `AsRef<[u8]> + AsMut<[u8]>`
pub struct BufferedDisplay<I, B>
where
    I: DisplayInterface,
{
    display: Display<I>,
    frame: FrameBuffer<B>,
}

impl<I, B> BufferedDisplay<I, B>
where
    I: DisplayInterface,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wrap a display and caller-provided frame storage
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if `storage` is shorter than
    /// `dimensions.buffer_size()`.
    pub fn try_new(display: Display<I>, storage: B) -> Result<Self, Error<I>> {
        let required = display.dimensions().buffer_size();
        let provided = storage.as_ref().len();
        if provided < required {
            return Err(Error::BufferTooSmall { required, provided });
        }
        let frame = FrameBuffer::new(*display.dimensions(), display.rotation(), storage)
            .map_err(|_| Error::BufferTooSmall { required, provided })?;
        Ok(Self { display, frame })
    }

    /// Reset and initialize the panel, then show the current frame
    ///
    /// The whole frame is written right after the init sequence, so the
    /// panel never shows whatever the controller RAM held at power-up.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> BufferedResult<I> {
        self.display.init(delay)?;
        self.update()
    }

    /// Switch the panel off; the frame is kept
    pub fn power_off(&mut self) -> BufferedResult<I> {
        self.display.power_off()
    }

    /// Fill the frame with `color` (memory only)
    pub fn clear(&mut self, color: Color) {
        self.frame.clear(color);
    }

    /// Set one pixel in the frame (memory only)
    pub fn set_pixel(&mut self, x: i32, y: i32, on: bool) {
        self.frame.set_pixel(x, y, on);
    }

    /// Read one pixel back from the frame
    pub fn pixel(&self, x: i32, y: i32) -> Option<bool> {
        self.frame.pixel(x, y)
    }

    /// Logical drawing area
    pub fn bounds(&self) -> Rect {
        self.frame.bounds()
    }

    /// Send the whole frame to the panel
    pub fn update(&mut self) -> BufferedResult<I> {
        self.display.write_frame(&self.frame)
    }

    /// Copy an RGB source into the frame, then update the panel
    ///
    /// Destination pixels are the part of `target` inside
    /// [`bounds`](Self::bounds). Destination `(x, y)` reads the source at
    /// `(x - target.x + source_origin.x, y - target.y + source_origin.y)`;
    /// source points outside `source.bounds()` leave the destination
    /// untouched. Dark source pixels light the panel.
    ///
    /// The panel is updated even when nothing overlaps.
    pub fn draw_image<S>(&mut self, target: Rect, source: &S, source_origin: Point) -> BufferedResult<I>
    where
        S: ImageSource + ?Sized,
    {
        if let Some(area) = target.intersection(&self.bounds()) {
            let source_bounds = source.bounds();
            let dx = i64::from(source_origin.x) - i64::from(target.origin.x);
            let dy = i64::from(source_origin.y) - i64::from(target.origin.y);

            for point in area.points() {
                let (Ok(sx), Ok(sy)) = (
                    i32::try_from(i64::from(point.x) + dx),
                    i32::try_from(i64::from(point.y) + dy),
                ) else {
                    continue;
                };
                if !source_bounds.contains(Point::new(sx, sy)) {
                    continue;
                }
                let (r, g, b) = source.rgb(sx, sy);
                self.frame.set_pixel(point.x, point.y, is_lit(r, g, b));
            }
        }
        self.update()
    }

    /// Access the underlying Display
    pub fn display(&self) -> &Display<I> {
        &self.display
    }

    /// Access the underlying Display mutably
    ///
    /// Use this for contrast, inversion and power control.
    pub fn display_mut(&mut self) -> &mut Display<I> {
        &mut self.display
    }

    /// The frame buffer
    pub fn frame(&self) -> &FrameBuffer<B> {
        &self.frame
    }

    /// The frame buffer, mutably
    pub fn frame_mut(&mut self) -> &mut FrameBuffer<B> {
        &mut self.frame
    }

    /// Split into the display and the frame
    pub fn release(self) -> (Display<I>, FrameBuffer<B>) {
        (self.display, self.frame)
    }
}

#[cfg(feature = "alloc")]
impl<I> BufferedDisplay<I, alloc::vec::Vec<u8>>
where
    I: DisplayInterface,
{
    /// Wrap a display with a heap-allocated, all-off frame
    pub fn new(display: Display<I>) -> Self {
        let frame = FrameBuffer::allocate(*display.dimensions(), display.rotation());
        Self { display, frame }
    }
}
