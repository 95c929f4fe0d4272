use std::{path::PathBuf, process::ExitCode, time::Duration};

use clap::Parser;
use subway_scrap::{process_site, FailurePolicy, FileNaming, ScrapeConfig, UploadConfig};
use tracing::error;
use tracing_subscriber::EnvFilter;

/// Scrape Naver subway station codes into `{date}_subway_information.json`.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Page base URL, pages are requested at `{base}/{code}/home`
    #[arg(long)]
    base_url: Option<String>,
    /// Number of batches to run
    #[arg(long)]
    batches: Option<usize>,
    /// Codes per batch, all requested concurrently
    #[arg(long)]
    batch_size: Option<usize>,
    /// Seconds to rest between batches
    #[arg(long)]
    delay_secs: Option<u64>,
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
    /// Fixed output file name instead of the dated one
    #[arg(long)]
    file_name: Option<String>,
    /// Log and skip codes that fail to load instead of aborting
    #[arg(long)]
    skip_failures: bool,
    /// S3-compatible endpoint; uploading is off without it
    #[arg(long)]
    upload_endpoint: Option<String>,
    #[arg(long, requires = "upload_endpoint")]
    bucket: Option<String>,
    #[arg(long, requires = "upload_endpoint")]
    prefix: Option<String>,
    /// Presigned PUT URL, used as is instead of the endpoint/bucket path
    #[arg(long)]
    presigned_url: Option<String>,
    /// Extra upload header as `NAME:VALUE`, can be repeated
    #[arg(long = "upload-header", value_parser = parse_header)]
    upload_headers: Vec<(String, String)>,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:VALUE, got {raw:?}"))?;
    Ok((name.trim().to_string(), value.trim().to_string()))
}

impl Args {
    fn into_config(self) -> ScrapeConfig {
        let defaults = ScrapeConfig::default();
        let endpoint = match (self.upload_endpoint, &self.presigned_url) {
            (Some(endpoint), _) => Some(endpoint),
            (None, Some(_)) => Some(String::new()),
            (None, None) => None,
        };
        let upload = endpoint.map(|endpoint| {
            let mut up = UploadConfig::new(endpoint);
            up.presigned_url = self.presigned_url;
            up.headers = self.upload_headers;
            if let Some(bucket) = self.bucket {
                up.bucket = bucket;
            }
            if let Some(prefix) = self.prefix {
                up.prefix = prefix;
            }
            up
        });

        ScrapeConfig {
            base_url: self.base_url.unwrap_or(defaults.base_url),
            batch_count: self.batches.unwrap_or(defaults.batch_count),
            batch_size: self.batch_size.unwrap_or(defaults.batch_size),
            batch_delay: self
                .delay_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.batch_delay),
            output_dir: self.output_dir,
            file_naming: self.file_name.map_or(FileNaming::Dated, FileNaming::Fixed),
            failure_policy: if self.skip_failures {
                FailurePolicy::SkipAndLog
            } else {
                FailurePolicy::FailFast
            },
            upload,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Args::parse().into_config();
    match process_site(&config).await {
        Ok(report) => {
            println!("{}", report.message);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
