//! sqlvet engine
//!
//! Drives the validation stages over a batch of queries:
//! - Reading queries from files and directories
//! - Running every stage per query and deciding pass/fail
//! - Handing each result to a report sink and keeping run totals

pub mod pipeline;
pub mod reader;
pub mod writer;

pub use pipeline::{PipelineError, Validator};
pub use reader::{read_file, read_input, split_queries, ReadError, ReaderOptions};
pub use writer::{JsonDirectoryWriter, MemorySink, ReportSink, WriteError};
