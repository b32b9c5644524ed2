pub mod caption;
pub mod inference;
