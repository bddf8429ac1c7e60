// Document storage and PDF text extraction.
// Both sit behind traits so the pipeline can run against in-memory fakes.

pub mod store;
pub mod text;

pub use store::{resume_object_key, DocumentStore, S3DocumentStore, StorageError};
pub use text::{ExtractionError, PdfTextExtractor, TextExtractor};
