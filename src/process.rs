use std::path::PathBuf;

use chrono::Local;
use tokio::time::sleep;

use crate::batch::{batch_range, BatchRunner, BatchStats};
use crate::sink::{file_name, write_table};
use crate::upload::ObjectStoreUploader;
use crate::{info_time, AggregateTable, Result, ScrapeConfig};

/// Outcome of a full run.
#[derive(Debug)]
pub struct RunReport {
    pub table: AggregateTable,
    pub path: PathBuf,
    /// Upload acknowledgement, or a note that the file was only written locally.
    pub message: String,
    pub stats: BatchStats,
}

/// Scrapes every batch, writes the grouped result to disk and uploads it when configured.
///
/// Batches run strictly one after the other with `batch_delay` of rest in between.
/// With `FailurePolicy::FailFast` the first failed request ends the run before anything is written.
pub async fn process_site(config: &ScrapeConfig) -> Result<RunReport> {
    // The last batch has the highest codes, so if it fits every batch does.
    if config.batch_count > 0 {
        batch_range(config.batch_count, config.batch_size)?;
    }

    let start_time = Local::now();
    let client = reqwest::Client::new();
    let runner = BatchRunner::new(client.clone(), &config.base_url, config.failure_policy);

    info_time!(
        "Started scraping {} codes in {} batches",
        config.total_codes(),
        config.batch_count
    );

    let mut table = AggregateTable::new();
    let mut stats = BatchStats::default();
    for batch_num in 1..=config.batch_count {
        info_time!("Starting batch {}", batch_num);
        let batch_stats = runner
            .run_batch(batch_num, config.batch_size, &mut table)
            .await?;
        stats.merge(batch_stats);

        if batch_num < config.batch_count && !config.batch_delay.is_zero() {
            info_time!(
                "Finished batch {}, resting for {:?}",
                batch_num,
                config.batch_delay
            );
            sleep(config.batch_delay).await;
        }
    }
    info_time!(
        start_time,
        "Finished PROCESSING ALL batches: {} lines, {} stations",
        table.len(),
        table.station_count()
    );

    let name = file_name(&config.file_naming, Local::now());
    let path = write_table(&config.output_dir, &name, &table).await?;
    info_time!("Wrote the results to file: {}", path.display());

    let message = match &config.upload {
        Some(upload) => {
            ObjectStoreUploader::new(client, upload.clone())
                .upload(&path)
                .await?
        }
        None => format!("{name} file written"),
    };
    info_time!(start_time, "Full run time:");

    Ok(RunReport {
        table,
        path,
        message,
        stats,
    })
}
