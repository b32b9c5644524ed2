use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::StatusCode,
};

use crate::PicturaError;

/// Name of the multipart field carrying the image.
pub const FILE_FIELD: &str = "file";

/// An image uploaded as the `file` part of a `multipart/form-data` body.
/// Other parts are ignored.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("<unnamed>")
    }
}

impl<S> FromRequest<S> for ImageUpload
where
    S: Send + Sync,
{
    type Rejection = PicturaError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await?;

        while let Some(field) = multipart.next_field().await? {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }
            let file_name = field.file_name().map(str::to_owned);
            let bytes = field.bytes().await?;
            return Ok(ImageUpload { file_name, bytes });
        }

        Err(PicturaError::upload(
            StatusCode::BAD_REQUEST,
            format!("missing `{FILE_FIELD}` field in multipart body"),
        ))
    }
}
