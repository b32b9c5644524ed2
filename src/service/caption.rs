use crate::error::PicturaError;
use async_trait::async_trait;
use axum::body::Bytes;
use image::RgbImage;
use std::sync::Arc;
use tracing::{debug, info};

/// The image captioning model, treated as an opaque `caption(image) -> text`.
#[async_trait]
pub trait CaptionModel: Send + Sync {
    async fn caption(&self, image: &RgbImage) -> Result<String, PicturaError>;
}

/// Always answers with the same caption.
pub struct FixedCaptioner {
    text: String,
}

impl FixedCaptioner {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl CaptionModel for FixedCaptioner {
    async fn caption(&self, _image: &RgbImage) -> Result<String, PicturaError> {
        Ok(self.text.clone())
    }
}

/// Stateless captioning front end: decode, normalize to RGB, call the model.
#[derive(Clone)]
pub struct CaptionService {
    model: Arc<dyn CaptionModel>,
}

impl CaptionService {
    pub fn new(model: Arc<dyn CaptionModel>) -> Self {
        Self { model }
    }

    /// Decode on a blocking worker and convert any color mode to 8-bit RGB.
    pub async fn decode(bytes: Bytes) -> Result<RgbImage, PicturaError> {
        let image = tokio::task::spawn_blocking(move || {
            image::load_from_memory(&bytes).map(|img| img.to_rgb8())
        })
        .await??;
        debug!(
            width = image.width(),
            height = image.height(),
            "image decoded and converted to RGB"
        );
        Ok(image)
    }

    pub async fn generate(&self, bytes: Bytes) -> Result<String, PicturaError> {
        let image = Self::decode(bytes).await?;
        let caption = self.model.caption(&image).await?;
        let caption = caption.trim().to_string();
        info!(caption = %caption, "caption generated");
        Ok(caption)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn encode(img: DynamicImage) -> Bytes {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        Bytes::from(out.into_inner())
    }

    #[tokio::test]
    async fn decode_converts_rgba_to_rgb() {
        let rgba = RgbaImage::from_pixel(4, 3, Rgba([10, 20, 30, 128]));
        let rgb = CaptionService::decode(encode(DynamicImage::ImageRgba8(rgba)))
            .await
            .unwrap();
        assert_eq!(rgb.dimensions(), (4, 3));
        assert_eq!(rgb.get_pixel(0, 0).0, [10, 20, 30]);
    }

    #[tokio::test]
    async fn decode_rejects_non_image_bytes() {
        let err = CaptionService::decode(Bytes::from_static(b"plain text"))
            .await
            .unwrap_err();
        assert!(matches!(err, PicturaError::Decode(_)));
    }

    #[tokio::test]
    async fn generate_trims_model_output() {
        let service = CaptionService::new(Arc::new(FixedCaptioner::new("  a cat on a mat \n")));
        let img = DynamicImage::ImageLuma8(image::GrayImage::new(2, 2));
        let caption = service.generate(encode(img)).await.unwrap();
        assert_eq!(caption, "a cat on a mat");
    }
}
