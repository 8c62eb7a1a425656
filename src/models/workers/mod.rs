pub mod requests;

pub use requests::{WorkerCodeQuery, WorkerResultsRequest};
