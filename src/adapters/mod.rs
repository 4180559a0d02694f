// Adapters layer: concrete implementations for external systems (http, storage, scraping, data files).

pub mod births;
pub mod cast_store;
pub mod catalog;
pub mod http;
pub mod metadata;
pub mod ranking;
pub mod storage;
