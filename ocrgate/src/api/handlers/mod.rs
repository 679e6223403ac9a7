pub mod health;
pub mod languages;
pub mod ocr;
pub mod root;

pub use health::health_check;
pub use languages::list_languages;
pub use ocr::extract_text;
pub use root::service_info;
