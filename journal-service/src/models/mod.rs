//! Request/response models for the journal service.

pub mod completion;
pub mod entry;
pub mod image;
pub mod report;

pub use completion::{Candidate, CandidateContent, CompletionResponse, Part};
pub use entry::{AnalyzeEntryRequest, AnalyzeEntryResponse};
pub use image::{AnalyzeImageRequest, AnalyzeImageResponse};
pub use report::{LogRecord, TrendReportRequest, TrendReportResponse};
