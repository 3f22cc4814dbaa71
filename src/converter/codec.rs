use std::fs::File;
use std::path::Path;

use image::{DynamicImage, ImageEncoder};

use super::job::TargetFormat;
use crate::error::CodecError;

/// Decode/encode seam between the worker and the underlying image library.
/// The worker never touches pixel data itself.
pub trait ImageCodec: Send + Sync {
    /// Decodes the file at `path`. The container format is detected from the
    /// file contents, never from the extension.
    fn decode(&self, path: &Path) -> Result<DynamicImage, CodecError>;

    /// Encodes `image` to `path` in `format`. `quality` applies to lossy
    /// formats only.
    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: TargetFormat,
        quality: u8,
    ) -> Result<(), CodecError>;
}

/// Codec backed by the `image` crate. With the `heif` feature enabled,
/// HEIC/HEIF files that `image` cannot decode are handed to libheif.
pub struct StandardCodec;

impl ImageCodec for StandardCodec {
    fn decode(&self, path: &Path) -> Result<DynamicImage, CodecError> {
        let reader = image::ImageReader::open(path)?.with_guessed_format()?;
        match reader.decode() {
            Ok(img) => Ok(img),
            Err(err) => {
                #[cfg(feature = "heif")]
                {
                    if let Ok(img) = heif::decode(path) {
                        return Ok(img);
                    }
                }
                Err(CodecError::Image(err))
            }
        }
    }

    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        format: TargetFormat,
        quality: u8,
    ) -> Result<(), CodecError> {
        match format {
            TargetFormat::Jpeg => {
                // JPEG has no alpha channel; flatten to RGB8 before encoding.
                let rgb = image.to_rgb8();
                let mut encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(File::create(path)?, quality);
                encoder.encode_image(&rgb)?;
            }
            TargetFormat::Png => {
                let file = File::create(path)?;
                let encoder = image::codecs::png::PngEncoder::new_with_quality(
                    file,
                    image::codecs::png::CompressionType::Default,
                    image::codecs::png::FilterType::Adaptive,
                );
                encoder.write_image(
                    image.as_bytes(),
                    image.width(),
                    image.height(),
                    image.color().into(),
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "heif")]
mod heif {
    use std::io;
    use std::path::Path;

    use image::DynamicImage;
    use libheif_rs::{ColorSpace, HeifContext, RgbChroma};

    use crate::error::CodecError;

    pub fn decode(path: &Path) -> Result<DynamicImage, CodecError> {
        let path_str = path.to_str().ok_or_else(|| {
            CodecError::Io(io::Error::new(io::ErrorKind::InvalidInput, "non-UTF-8 path"))
        })?;
        let ctx = HeifContext::read_from_file(path_str)?;
        let handle = ctx.primary_image_handle()?;
        let img = handle.decode(ColorSpace::Rgb(RgbChroma::Rgb), None)?;

        let planes = img.planes();
        let plane = planes.interleaved.ok_or_else(|| {
            CodecError::Io(io::Error::new(io::ErrorKind::InvalidData, "no interleaved plane"))
        })?;

        let width = plane.width;
        let height = plane.height;
        let stride = plane.stride;
        let row_len = width as usize * 3;
        let mut buf = Vec::with_capacity(row_len * height as usize);
        for y in 0..height as usize {
            let start = y * stride;
            buf.extend_from_slice(&plane.data[start..start + row_len]);
        }

        let rgb = image::RgbImage::from_raw(width, height, buf).ok_or_else(|| {
            CodecError::Io(io::Error::new(io::ErrorKind::InvalidData, "short pixel buffer"))
        })?;
        Ok(DynamicImage::ImageRgb8(rgb))
    }
}
