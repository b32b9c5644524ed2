pub mod caption;

pub use caption::{CaptionModel, CaptionService, FixedCaptioner};
