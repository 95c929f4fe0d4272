use std::{ops::Range, sync::Arc};

use chrono::Local;
use reqwest::Client;
use tokio::{sync::mpsc, task::JoinSet};
use tracing::{debug, warn};

use crate::parse::{parse_station, ExtractedRecord};
use crate::request::request_page_html;
use crate::{info_time, AggregateTable, Error, FailurePolicy, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub requested: usize,
    pub inserted: usize,
    /// Pages without a line or a station name.
    pub empty: usize,
    /// Failed requests, only non-zero with `FailurePolicy::SkipAndLog`.
    pub skipped: usize,
}

impl BatchStats {
    pub fn merge(&mut self, other: BatchStats) {
        self.requested += other.requested;
        self.inserted += other.inserted;
        self.empty += other.empty;
        self.skipped += other.skipped;
    }
}

/// Half-open code range of a 1-based batch: `[(n-1)*size, n*size)`.
pub fn batch_range(batch_num: usize, batch_size: usize) -> Result<Range<u32>> {
    if batch_num == 0 {
        return Err(Error::InvalidBatch(batch_num));
    }
    let to_code = |n: usize| u32::try_from(n).map_err(|_| Error::InvalidBatch(batch_num));
    let start = (batch_num - 1)
        .checked_mul(batch_size)
        .ok_or(Error::InvalidBatch(batch_num))?;
    let end = start
        .checked_add(batch_size)
        .ok_or(Error::InvalidBatch(batch_num))?;
    Ok(to_code(start)?..to_code(end)?)
}

/// Fetches and parses one batch of codes at a time and folds the results into a table.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    // Client uses Arc so we can clone cheaply
    client: Client,
    base_url: Arc<str>,
    policy: FailurePolicy,
}

impl BatchRunner {
    pub fn new(client: Client, base_url: &str, policy: FailurePolicy) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            policy,
        }
    }

    pub async fn run_batch(
        &self,
        batch_num: usize,
        batch_size: usize,
        table: &mut AggregateTable,
    ) -> Result<BatchStats> {
        let codes = batch_range(batch_num, batch_size)?;
        self.run_codes(codes, table).await
    }

    /// Requests every code of the range concurrently, one task per code.
    ///
    /// Results are collected in completion order. The table is only touched after all
    /// the tasks are done, and the per-line ordering is restored by `AggregateTable::insert`.
    pub async fn run_codes(
        &self,
        codes: Range<u32>,
        table: &mut AggregateTable,
    ) -> Result<BatchStats> {
        let start_time = Local::now();
        let expected = codes.len();
        let (res_tx, mut res_rx) = mpsc::channel(expected.max(1));

        let mut task_set = JoinSet::new();
        for code in codes.clone() {
            task_set.spawn({
                let client = self.client.clone();
                let base_url = self.base_url.clone();
                let res_tx = res_tx.clone();

                async move {
                    let res = fetch_record(&client, &base_url, code).await;
                    // The receiver only goes away once the batch was abandoned.
                    let _ = res_tx.send((code, res)).await;
                }
            });
        }
        drop(res_tx);

        let mut stats = BatchStats {
            requested: expected,
            ..Default::default()
        };
        let mut found = Vec::new();
        for received in 0..expected {
            let Some((code, res)) = res_rx.recv().await else {
                // Every sender is gone early, so some task panicked.
                while let Some(joined) = task_set.join_next().await {
                    joined?;
                }
                return Err(Error::ChannelClosed { received, expected });
            };

            match res {
                Ok(record) if record.is_complete() => found.push(record),
                Ok(_) => stats.empty += 1,
                Err(err) => match self.policy {
                    FailurePolicy::FailFast => {
                        task_set.abort_all();
                        return Err(err);
                    }
                    FailurePolicy::SkipAndLog => {
                        warn!(code, error = %err, "skipping code");
                        stats.skipped += 1;
                    }
                },
            }
        }

        // Barrier: nothing is in flight past this point.
        while let Some(joined) = task_set.join_next().await {
            joined?;
        }

        stats.inserted = found.len();
        table.extend(found);

        info_time!(
            start_time,
            "Processed codes {}..{}: {} stations, {} empty, {} skipped",
            codes.start,
            codes.end,
            stats.inserted,
            stats.empty,
            stats.skipped
        );
        Ok(stats)
    }
}

async fn fetch_record(client: &Client, base_url: &str, code: u32) -> Result<ExtractedRecord> {
    let html = request_page_html(client, base_url, code).await?;
    let record = parse_station(html, code).await?;
    debug!(code, "code checked");
    Ok(record)
}
