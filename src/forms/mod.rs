pub mod date_filter;
pub mod export;
pub mod pagination;
pub mod registry;
