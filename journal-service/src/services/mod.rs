pub mod analysis;
pub mod extractor;
pub mod metrics;
pub mod prompts;
pub mod providers;

pub use extractor::{extract, first_text, Extraction};
pub use metrics::{get_metrics, init_metrics};
