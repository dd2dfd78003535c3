pub mod content_types;
pub mod pages;
pub mod submissions;
