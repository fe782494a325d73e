pub mod index_summary;
pub mod record;
pub mod search;
