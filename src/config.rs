use std::{path::PathBuf, time::Duration};

use crate::{BASE_URL, BATCH_COUNT, BATCH_DELAY_SECS, BATCH_SIZE, BUCKET, KEY_PREFIX};

/// What to do when a single page can't be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Abort the whole run on the first failed request. No file is written.
    #[default]
    FailFast,
    /// Log the failing code and keep going; the code is left out of the output.
    SkipAndLog,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FileNaming {
    /// `{YYYY}_{MM}_{DD}_subway_information.json` in Seoul time.
    #[default]
    Dated,
    Fixed(String),
}

/// Where the output file gets PUT: `{endpoint}/{bucket}/{prefix}/{file_name}`,
/// or `presigned_url` as is when one was handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadConfig {
    pub endpoint: String,
    pub bucket: String,
    pub prefix: String,
    pub presigned_url: Option<String>,
    /// Sent with the PUT, e.g. `Authorization` or `x-amz-*` headers.
    pub headers: Vec<(String, String)>,
}

impl UploadConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            bucket: BUCKET.into(),
            prefix: KEY_PREFIX.into(),
            presigned_url: None,
            headers: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub batch_count: usize,
    pub batch_size: usize,
    /// Rest between two consecutive batches.
    pub batch_delay: Duration,
    pub output_dir: PathBuf,
    pub file_naming: FileNaming,
    pub failure_policy: FailurePolicy,
    pub upload: Option<UploadConfig>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.into(),
            batch_count: BATCH_COUNT,
            batch_size: BATCH_SIZE,
            batch_delay: Duration::from_secs(BATCH_DELAY_SECS),
            output_dir: PathBuf::from("."),
            file_naming: FileNaming::default(),
            failure_policy: FailurePolicy::default(),
            upload: None,
        }
    }
}

impl ScrapeConfig {
    /// Number of codes the run will request, `[0, batch_count * batch_size)`.
    pub fn total_codes(&self) -> usize {
        self.batch_count.saturating_mul(self.batch_size)
    }
}
