pub mod inference_api;

pub use inference_api::InferenceApiCaptioner;
