pub mod caption;
pub mod history;
