use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

use crate::config::ModelConfig;
use crate::error::InferenceError;

/// Resize and per-channel normalization applied before the forward pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessing {
    pub width: u32,
    pub height: u32,
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl From<&ModelConfig> for Preprocessing {
    fn from(config: &ModelConfig) -> Self {
        Self {
            width: config.input_size[0],
            height: config.input_size[1],
            mean: config.mean,
            std: config.std,
        }
    }
}

pub fn decode(bytes: &[u8]) -> Result<DynamicImage, InferenceError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Builds a `1 x 3 x height x width` batch from an RGB rendition of `image`.
pub fn to_input(image: &DynamicImage, preprocessing: &Preprocessing) -> Array4<f32> {
    let rgb = image
        .resize_exact(preprocessing.width, preprocessing.height, FilterType::Triangle)
        .to_rgb8();
    let shape = (1, 3, preprocessing.height as usize, preprocessing.width as usize);

    Array4::from_shape_fn(shape, |(_, c, y, x)| {
        let value = rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0;
        (value - preprocessing.mean[c]) / preprocessing.std[c]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgb};
    use std::io::Cursor;

    fn preprocessing() -> Preprocessing {
        Preprocessing {
            width: 8,
            height: 4,
            mean: [0.5, 0.5, 0.5],
            std: [0.5, 0.5, 0.5],
        }
    }

    #[test]
    fn input_is_nchw_and_normalized() {
        let red = ImageBuffer::from_pixel(20, 20, Rgb([255u8, 0, 0]));
        let input = to_input(&DynamicImage::ImageRgb8(red), &preprocessing());

        assert_eq!(input.dim(), (1, 3, 4, 8));
        assert!((input[[0, 0, 2, 3]] - 1.0).abs() < 1e-2);
        assert!((input[[0, 1, 2, 3]] + 1.0).abs() < 1e-2);
        assert!((input[[0, 2, 0, 7]] + 1.0).abs() < 1e-2);
    }

    #[test]
    fn decodes_encoded_png() {
        let gray = ImageBuffer::from_pixel(3, 2, Rgb([128u8, 128, 128]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(gray)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let image = decode(&bytes).unwrap();
        assert_eq!((image.width(), image.height()), (3, 2));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, InferenceError::Decode(_)));
    }
}
