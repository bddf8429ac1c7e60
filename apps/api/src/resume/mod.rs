// Resume pipeline: field extraction, quality scoring and persistence.
// All prompts for this module live in prompts.rs.

pub mod decode;
pub mod field_extractor;
pub mod handlers;
pub mod json_repair;
pub mod models;
pub mod outcome;
pub mod pipeline;
pub mod prompts;
pub mod quality;
pub mod repository;
pub mod retry;
