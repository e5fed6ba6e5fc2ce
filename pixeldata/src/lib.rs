#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]
//! Pixel data rendition with window-level mapping.
//!
//! The actual pixel decoding, image scaling and JPEG encoding are
//! performed by collaborators supplied through the [`FrameDecoder`],
//! [`ImageScaler`] and [`JpegEncoder`] traits. This crate owns the
//! domain transformation in between: clipping overlay bits above the
//! stored sample window, mapping stored sample values to 8-bit gray
//! through a window-level look-up table in display units, choosing the
//! interpolation mode, and painting the result into an RGB raster.

use dcmflow_object::DicomFile;
use snafu::{Backtrace, ResultExt, Snafu};
use tracing::warn;

/// The largest output dimension for which bicubic interpolation is used.
const MAX_CUBIC: i32 = 1100;

/// A type-erased error from a collaborator.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error which may occur in the rendition pipeline.
#[derive(Debug, Snafu)]
#[non_exhaustive]
pub enum Error {
    /// The object has no pixel data element.
    #[snafu(display("Not an image: {}", path))]
    NotAnImage { path: String, backtrace: Backtrace },
    /// The frame decoder collaborator failed.
    #[snafu(display("Unable to read the image: {}", source))]
    ReadFrame {
        source: BoxedError,
        backtrace: Backtrace,
    },
    /// The JPEG encoder collaborator failed.
    #[snafu(display("Unable to encode the image: {}", source))]
    EncodeImage {
        source: BoxedError,
        backtrace: Backtrace,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A single-channel raster of stored sample values.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Sample values in row-major order,
    /// one sample per pixel, zero-extended to 16 bits.
    pub samples: Vec<u16>,
}

/// The color model of a decoded frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorModel {
    /// The number of significant bits per sample (Bits Stored).
    pub bits_stored: u16,
    /// Whether sample values are signed (Pixel Representation = 1).
    pub signed: bool,
    /// Samples per pixel.
    pub samples_per_pixel: u16,
    /// Planar configuration.
    pub planar: u16,
    /// The color model's pixel size in bits.
    pub pixel_size: u16,
}

/// A decoded frame: the raster and the color model describing it.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    /// The raw frame raster.
    pub raster: Raster,
    /// The color model of the raster.
    pub color_model: ColorModel,
}

/// An 8-bit RGB raster, 3 bytes per pixel in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Rgb8Raster {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Interleaved RGB samples.
    pub data: Vec<u8>,
}

impl Rgb8Raster {
    /// Create a black raster of the given dimensions.
    pub fn new(width: u32, height: u32) -> Rgb8Raster {
        Rgb8Raster {
            width,
            height,
            data: vec![0; width as usize * height as usize * 3],
        }
    }
}

/// The interpolation mode of an [`ImageScaler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleMode {
    /// Nearest neighbor interpolation.
    Nearest,
    /// Bicubic interpolation.
    Bicubic,
}

/// A collaborator which decodes a pixel data frame from a file.
pub trait FrameDecoder {
    /// Decode the frame with the given index (the first frame is zero).
    fn decode(&self, path: &std::path::Path, frame: u32) -> Result<DecodedFrame, BoxedError>;
}

/// A collaborator which rescales an RGB raster.
pub trait ImageScaler {
    /// Scale the raster by the given factors.
    fn scale(
        &self,
        image: &Rgb8Raster,
        scale_x: f64,
        scale_y: f64,
        mode: ScaleMode,
    ) -> Rgb8Raster;
}

/// A collaborator which encodes an RGB raster as a JPEG.
pub trait JpegEncoder {
    /// Encode the raster with the given quality,
    /// ranging from 0 to 100; a negative value selects the
    /// encoder's default setting.
    fn encode(&self, image: &Rgb8Raster, quality: i32) -> Result<Vec<u8>, BoxedError>;
}

/// A frame decoder wrapper which caches the last decoded frame.
///
/// Decoding a frame is expensive; repeated renditions of the same
/// frame (for instance at different window settings) reuse the cached
/// raster. The cache is guarded by a lock, so the wrapper can be
/// shared, but decoding itself is serialized.
#[derive(Debug)]
pub struct CachedFrameDecoder<D> {
    inner: D,
    cache: std::sync::Mutex<Option<(u32, DecodedFrame)>>,
}

impl<D> CachedFrameDecoder<D> {
    /// Wrap the given decoder with a single-frame cache.
    pub fn new(inner: D) -> CachedFrameDecoder<D> {
        CachedFrameDecoder {
            inner,
            cache: std::sync::Mutex::new(None),
        }
    }

    /// Drop the cached frame, forcing the next decode to hit the
    /// inner decoder.
    pub fn invalidate(&self) {
        *self.cache.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl<D> FrameDecoder for CachedFrameDecoder<D>
where
    D: FrameDecoder,
{
    fn decode(&self, path: &std::path::Path, frame: u32) -> Result<DecodedFrame, BoxedError> {
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some((cached_frame, decoded)) = cache.as_ref() {
            if *cached_frame == frame {
                return Ok(decoded.clone());
            }
        }
        *cache = None;
        let decoded = self.inner.decode(path, frame)?;
        *cache = Some((frame, decoded.clone()));
        Ok(decoded)
    }
}

/// The modality rescale transformation,
/// mapping stored values to display units:
/// `display = slope * stored + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rescale {
    /// The rescale slope.
    pub slope: f32,
    /// The rescale intercept.
    pub intercept: f32,
}

impl Rescale {
    /// Create a new rescale transformation.
    pub fn new(slope: f32, intercept: f32) -> Rescale {
        Rescale { slope, intercept }
    }

    /// Fetch the rescale parameters declared by the object,
    /// defaulting to the identity transformation.
    pub fn of(obj: &DicomFile) -> Rescale {
        Rescale {
            slope: obj.element_float("RescaleSlope", 1.0),
            intercept: obj.element_float("RescaleIntercept", 0.0),
        }
    }

    /// Convert a window level and width from display units
    /// to stored pixel units.
    pub fn window_to_pixel_units(&self, level: i32, width: i32) -> (i32, i32) {
        let level = ((level as f32 - self.intercept) / self.slope) as i32;
        let width = (width as f32 / self.slope) as i32;
        (level, width)
    }
}

/// A window-level look-up table mapping stored sample values
/// to 8-bit gray.
///
/// The table has `1 << bits_stored` entries; sample bits above the
/// window are masked off on look-up.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowLut {
    table: Vec<u8>,
    sample_mask: u16,
}

impl WindowLut {
    /// Build a look-up table for the given window,
    /// in stored pixel units.
    ///
    /// Values at or below `level - width/2` map to 0,
    /// values at or above `level - width/2 + width` map to 255,
    /// and values in between are linearly interpolated;
    /// the mapping is flipped when `inverse` is set
    /// (Presentation LUT Shape INVERSE).
    /// When `signed` is set (Pixel Representation = 1),
    /// the upper half of the table, which corresponds to negative
    /// sample values, is blanked to 0.
    ///
    /// # Panics
    ///
    /// Panics if `bits_stored` is 0 or above 16.
    pub fn new(bits_stored: u16, level: i32, width: i32, inverse: bool, signed: bool) -> WindowLut {
        assert!(bits_stored != 0 && bits_stored <= 16);
        let size = 1usize << bits_stored;
        let mut table = vec![0u8; size];

        let width = width.max(2);
        let bottom = (level - width / 2).clamp(0, size as i32 - 1);
        let top = (bottom + width).clamp(0, size as i32 - 1);
        let (low, high) = if inverse { (255, 0) } else { (0, 255) };

        let bottom = bottom as usize;
        let top = top as usize;
        for entry in &mut table[..bottom] {
            *entry = low;
        }
        for entry in &mut table[top..] {
            *entry = high;
        }
        if top > bottom {
            let scale = 255.0 / (top - bottom) as f64;
            for i in bottom..top {
                let ramp = (scale * (i - bottom) as f64) as i32;
                let ramp = ramp.clamp(0, 255) as u8;
                table[i] = if inverse { 255 - ramp } else { ramp };
            }
        }
        if signed {
            for entry in &mut table[size / 2..] {
                *entry = 0;
            }
        }

        WindowLut {
            table,
            sample_mask: (size - 1) as u16,
        }
    }

    /// Map a stored sample value to its 8-bit gray value.
    #[inline]
    pub fn get(&self, sample: u16) -> u8 {
        self.table[(sample & self.sample_mask) as usize]
    }

    /// The number of entries in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Whether the table is empty (never true in practice).
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// The parameters of a window-leveled rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// The frame to render (the first frame is zero).
    pub frame: u32,
    /// The output width, or -1 to keep the original width.
    pub width: i32,
    /// The output height, or -1 to keep the original height.
    pub height: i32,
    /// JPEG quality from 0 to 100; negative selects the encoder default.
    pub quality: i32,
    /// The window level, in display units (e.g. Hounsfield values).
    pub window_level: i32,
    /// The window width, in display units.
    pub window_width: i32,
}

/// A rendered image: the encoded bytes and the output dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedImage {
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// The encoded JPEG data.
    pub data: Vec<u8>,
}

/// Clip samples carrying bits above the stored sample window.
///
/// Overlay planes may be burned into the unused high bits of the pixel
/// cells; a sample with any such bit set is forced to the maximum
/// stored value before rendering. Only single-sample rasters with
/// planar configuration 0 and 8 < bits stored < 16 are affected.
pub fn clip_overlay_bits(raster: &mut Raster, cm: &ColorModel) {
    if cm.samples_per_pixel != 1 || cm.planar != 0 {
        return;
    }
    if cm.bits_stored <= 8 || cm.bits_stored >= 16 {
        return;
    }
    let max_sample = (1u16 << cm.bits_stored) - 1;
    let high_bits_mask = !max_sample;
    for sample in &mut raster.samples {
        if *sample & high_bits_mask != 0 {
            *sample = max_sample;
        }
    }
}

/// Produce a window-leveled 8-bit JPEG rendition of a frame.
///
/// The frame is obtained from the decoder collaborator;
/// the window level and width are given in display units
/// and converted to pixel units with the object's rescale parameters.
/// Interpolation is nearest neighbor for 8-bit color models and for
/// output dimensions above 1100 pixels, bicubic otherwise.
pub fn render_window_leveled_jpeg<D, S, E>(
    obj: &DicomFile,
    decoder: &D,
    scaler: &S,
    encoder: &E,
    options: RenderOptions,
) -> Result<RenderedImage>
where
    D: FrameDecoder,
    S: ImageScaler,
    E: JpegEncoder,
{
    if !obj.is_image() {
        return NotAnImageSnafu {
            path: obj.path().display().to_string(),
        }
        .fail();
    }

    let mut frame = match decoder.decode(obj.path(), options.frame) {
        Ok(frame) => frame,
        Err(source) => {
            warn!("Unable to read the image: {}", source);
            return Err(source).context(ReadFrameSnafu);
        }
    };
    let cm = frame.color_model;
    clip_overlay_bits(&mut frame.raster, &cm);

    let orig_w = frame.raster.width as i32;
    let orig_h = frame.raster.height as i32;
    let (w, h, image_scale) = if options.width == -1 || options.height == -1 {
        (orig_w, orig_h, 1.0)
    } else {
        (
            options.width,
            options.height,
            f64::from(options.width) / f64::from(orig_w),
        )
    };

    // window level and width arrive in display units
    let rescale = Rescale::of(obj);
    let (level, width) = rescale.window_to_pixel_units(options.window_level, options.window_width);

    let lut_shape = obj.element_value("PresentationLUTShape");
    let inverse = lut_shape.trim().eq_ignore_ascii_case("inverse");
    let signed = obj.element_value("PixelRepresentation").trim() == "1";

    // map samples to 8-bit gray, through the window when applicable
    let gray: Vec<u8> = if (8..=16).contains(&cm.bits_stored) && cm.pixel_size <= 16 {
        let lut = WindowLut::new(cm.bits_stored, level, width, inverse, signed);
        frame.raster.samples.iter().map(|&s| lut.get(s)).collect()
    } else {
        let shift = cm.bits_stored.saturating_sub(8);
        frame.raster.samples.iter().map(|&s| (s >> shift) as u8).collect()
    };

    let mut rgb = Rgb8Raster::new(frame.raster.width, frame.raster.height);
    for (px, &g) in rgb.data.chunks_exact_mut(3).zip(gray.iter()) {
        px[0] = g;
        px[1] = g;
        px[2] = g;
    }

    let mode = if cm.pixel_size <= 8 || w > MAX_CUBIC || h > MAX_CUBIC {
        ScaleMode::Nearest
    } else {
        ScaleMode::Bicubic
    };
    let scaled = if image_scale == 1.0 {
        rgb
    } else {
        scaler.scale(&rgb, image_scale, image_scale, mode)
    };

    // paint onto a canvas of the requested dimensions
    let mut canvas = Rgb8Raster::new(w as u32, h as u32);
    let copy_w = (scaled.width.min(canvas.width)) as usize * 3;
    for row in 0..scaled.height.min(canvas.height) {
        let src = row as usize * scaled.width as usize * 3;
        let dst = row as usize * canvas.width as usize * 3;
        canvas.data[dst..dst + copy_w].copy_from_slice(&scaled.data[src..src + copy_w]);
    }

    let data = encoder
        .encode(&canvas, options.quality)
        .context(EncodeImageSnafu)?;

    Ok(RenderedImage {
        width: canvas.width,
        height: canvas.height,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lut_maps_below_and_above_the_window() {
        // 12-bit window centered at 1074 with width 100
        let lut = WindowLut::new(12, 1074, 100, false, false);
        assert_eq!(lut.len(), 4096);
        // below the window
        assert_eq!(lut.get(0), 0);
        assert_eq!(lut.get(1024), 0);
        // above the window
        assert_eq!(lut.get(1124), 255);
        assert_eq!(lut.get(4095), 255);
        // center maps near the middle
        let mid = lut.get(1074);
        assert!((120..=135).contains(&mid), "midpoint was {}", mid);
        // monotonically non-decreasing across the ramp
        let mut prev = 0;
        for s in 1024..1124 {
            let v = lut.get(s);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn lut_endpoints_are_assigned() {
        // the fill covers every entry outside the ramp
        let lut = WindowLut::new(8, 128, 64, false, false);
        assert_eq!(lut.get(0), 0);
        assert_eq!(lut.get(95), 0);
        assert_eq!(lut.get(255), 255);
        assert_eq!(lut.get(254), 255);
    }

    #[test]
    fn inverse_lut_flips_the_ramp() {
        let lut = WindowLut::new(8, 128, 64, true, false);
        assert_eq!(lut.get(0), 255);
        assert_eq!(lut.get(255), 0);
        let lo = lut.get(100);
        let hi = lut.get(150);
        assert!(lo > hi);
    }

    #[test]
    fn signed_blanking_zeroes_the_upper_half() {
        let lut = WindowLut::new(8, 64, 32, false, true);
        // upper half holds the "negative" sample values
        assert_eq!(lut.get(128), 0);
        assert_eq!(lut.get(255), 0);
        // the lower half keeps the window mapping
        assert_eq!(lut.get(100), 255);
    }

    #[test]
    fn lut_masks_sample_bits_above_the_window() {
        let lut = WindowLut::new(8, 128, 256, false, false);
        assert_eq!(lut.get(0x0110), lut.get(0x0010));
    }

    #[test]
    fn narrow_window_is_widened_to_two() {
        // a degenerate width must not divide by zero
        let lut = WindowLut::new(8, 128, 0, false, false);
        assert_eq!(lut.get(0), 0);
        assert_eq!(lut.get(255), 255);
    }

    #[test]
    fn overlay_bits_are_clipped() {
        let cm = ColorModel {
            bits_stored: 12,
            signed: false,
            samples_per_pixel: 1,
            planar: 0,
            pixel_size: 16,
        };
        let mut raster = Raster {
            width: 2,
            height: 2,
            samples: vec![0x0FFF, 0x1001, 0x0123, 0x8000],
        };
        clip_overlay_bits(&mut raster, &cm);
        assert_eq!(raster.samples, vec![0x0FFF, 0x0FFF, 0x0123, 0x0FFF]);
    }

    #[test]
    fn cached_decoder_decodes_each_frame_once() {
        use std::sync::atomic::{AtomicU32, Ordering};

        struct Counting(AtomicU32);
        impl FrameDecoder for Counting {
            fn decode(
                &self,
                _path: &std::path::Path,
                frame: u32,
            ) -> Result<DecodedFrame, BoxedError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(DecodedFrame {
                    raster: Raster {
                        width: 1,
                        height: 1,
                        samples: vec![frame as u16],
                    },
                    color_model: ColorModel {
                        bits_stored: 8,
                        signed: false,
                        samples_per_pixel: 1,
                        planar: 0,
                        pixel_size: 8,
                    },
                })
            }
        }

        let decoder = CachedFrameDecoder::new(Counting(AtomicU32::new(0)));
        let path = std::path::Path::new("x.dcm");
        decoder.decode(path, 0).unwrap();
        decoder.decode(path, 0).unwrap();
        assert_eq!(decoder.inner.0.load(Ordering::SeqCst), 1);
        // a different frame replaces the cache
        decoder.decode(path, 1).unwrap();
        decoder.decode(path, 0).unwrap();
        assert_eq!(decoder.inner.0.load(Ordering::SeqCst), 3);
        decoder.invalidate();
        decoder.decode(path, 0).unwrap();
        assert_eq!(decoder.inner.0.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn overlay_clipping_skips_multi_sample_rasters() {
        let cm = ColorModel {
            bits_stored: 12,
            signed: false,
            samples_per_pixel: 3,
            planar: 0,
            pixel_size: 24,
        };
        let mut raster = Raster {
            width: 1,
            height: 1,
            samples: vec![0x1001],
        };
        clip_overlay_bits(&mut raster, &cm);
        assert_eq!(raster.samples, vec![0x1001]);
    }
}
