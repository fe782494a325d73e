pub mod indexing_service;
pub mod ocr_service;
pub mod search_service;
pub mod text_service;
