pub mod fence;
pub mod report;
pub mod scanner;
pub mod sink;

pub use fence::{FenceMatcher, FENCE_MARKER};
pub use report::{ExtractionMode, ExtractionProgress, ExtractionReport};
pub use scanner::{Extractor, ScanState};
pub use sink::{ConcatSink, DryRunSink, SnippetSink, SplitSink};
