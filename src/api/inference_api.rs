use crate::config::CaptionConfig;
use crate::error::PicturaError;
use crate::service::caption::CaptionModel;
use crate::types::inference::{InferenceErrorBody, first_generated_text};
use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, RgbImage};
use reqwest::header::CONTENT_TYPE;
use std::io::Cursor;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

/// Captions images through a hosted image-to-text inference endpoint.
///
/// One request per image, no retries: a failed call fails the caption.
pub struct InferenceApiCaptioner {
    client: reqwest::Client,
    endpoint: Url,
    api_token: Option<String>,
}

impl InferenceApiCaptioner {
    pub fn new(cfg: &CaptionConfig) -> Result<Self, PicturaError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("pictura/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(cfg.timeout_secs));
        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: cfg.endpoint.clone(),
            api_token: cfg.api_token.clone(),
        })
    }

    fn encode_png(image: &RgbImage) -> Result<Vec<u8>, PicturaError> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image.clone())
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| PicturaError::CaptionGeneration(format!("failed to encode image: {e}")))?;
        Ok(out.into_inner())
    }
}

#[async_trait]
impl CaptionModel for InferenceApiCaptioner {
    async fn caption(&self, image: &RgbImage) -> Result<String, PicturaError> {
        let png = Self::encode_png(image)?;
        debug!(endpoint = %self.endpoint, bytes = png.len(), "posting image for captioning");

        let mut req = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "image/png")
            .body(png);
        if let Some(token) = self.api_token.as_deref() {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await?;

        let status = resp.status();
        let body = resp.bytes().await?;
        if !status.is_success() {
            let detail = serde_json::from_slice::<InferenceErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
            error!(status = %status, detail = %detail, "inference endpoint returned an error");
            return Err(PicturaError::CaptionGeneration(format!(
                "inference endpoint returned {status}: {detail}"
            )));
        }

        first_generated_text(&body)
            .map_err(|e| {
                PicturaError::CaptionGeneration(format!("malformed inference response: {e}"))
            })?
            .ok_or_else(|| {
                PicturaError::CaptionGeneration("inference response had no caption".to_string())
            })
    }
}
