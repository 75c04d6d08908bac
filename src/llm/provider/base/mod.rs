//! Shared provider plumbing: request sending and response cleanup.

pub mod request;
pub mod response;

pub use request::send_llm_request;
pub use response::{clean_commit_response, extract_first_json_object, truncate_for_preview};
