pub mod content_type;
pub mod page;
pub mod submission;

pub use content_type::ContentType;
pub use page::{FormPageSummary, Page};
pub use submission::{FormData, Submission};
