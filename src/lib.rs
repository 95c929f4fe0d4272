//! Naver subway code scraper.
//!
//! Walks a numeric code space in fixed-size batches, extracts the line number and
//! station name from each page, groups the results per line (sorted by code) and
//! writes them to a JSON file that can optionally be uploaded to an object store.

mod macros;

pub mod batch;
pub mod config;
mod error;
pub mod parse;
pub mod process;
pub mod request;
pub mod sink;
pub mod table;
pub mod upload;

pub use config::{FailurePolicy, FileNaming, ScrapeConfig, UploadConfig};
pub use error::{Error, Result};
pub use parse::ExtractedRecord;
pub use process::{process_site, RunReport};
pub use table::{AggregateTable, StationEntry};

const BASE_URL: &str = "https://pts.map.naver.com/end-subway/ends/web";
const BATCH_COUNT: usize = 100;
/// Kept small, bigger batches get their connections reset by the server.
const BATCH_SIZE: usize = 200;
const BATCH_DELAY_SECS: u64 = 5;
const FILE_SUFFIX: &str = "subway_information.json";
const BUCKET: &str = "bucketestmy";
const KEY_PREFIX: &str = "bmt";
/// Asia/Seoul, no DST.
const LOCAL_OFFSET_SECS: i32 = 9 * 3600;
