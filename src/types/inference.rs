use serde::Deserialize;

/// One candidate of an image-to-text inference response.
///
/// The endpoint answers with a JSON array: `[{"generated_text": "..."}]`.
#[derive(Debug, Deserialize)]
pub struct GeneratedText {
    pub generated_text: String,
}

/// Error body returned by the inference endpoint on failure.
#[derive(Debug, Deserialize)]
pub struct InferenceErrorBody {
    pub error: String,
}

/// Pick the first caption out of a raw response body.
pub fn first_generated_text(body: &[u8]) -> Result<Option<String>, serde_json::Error> {
    let candidates: Vec<GeneratedText> = serde_json::from_slice(body)?;
    Ok(candidates.into_iter().next().map(|c| c.generated_text))
}
