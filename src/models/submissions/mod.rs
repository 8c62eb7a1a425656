pub mod entities;
pub mod requests;

pub use entities::{NewSubmission, Submission};
pub use requests::SubmissionListQuery;
