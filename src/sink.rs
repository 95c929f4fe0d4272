use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tokio::fs;

use crate::{AggregateTable, FileNaming, Result, FILE_SUFFIX, LOCAL_OFFSET_SECS};

/// Serializes the table as pretty JSON, indented by one space per level.
pub fn to_json(table: &AggregateTable) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
    table.serialize(&mut ser)?;
    Ok(buf)
}

pub fn from_json(bytes: &[u8]) -> Result<AggregateTable> {
    Ok(serde_json::from_slice(bytes)?)
}

/// The output file name. Dated names use the calendar day in Seoul,
/// e.g. `2024_03_09_subway_information.json`.
pub fn file_name<Tz: TimeZone>(naming: &FileNaming, now: DateTime<Tz>) -> String {
    match naming {
        FileNaming::Fixed(name) => name.clone(),
        FileNaming::Dated => {
            let local = now.with_timezone(&seoul());
            format!("{}_{FILE_SUFFIX}", local.format("%Y_%m_%d"))
        }
    }
}

fn seoul() -> FixedOffset {
    FixedOffset::east_opt(LOCAL_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Writes the table to `dir/name`, creating `dir` if needed. Returns the written path.
pub async fn write_table(dir: &Path, name: &str, table: &AggregateTable) -> Result<PathBuf> {
    let content = to_json(table)?;
    fs::create_dir_all(dir).await?;
    let path = dir.join(name);
    fs::write(&path, content).await?;
    Ok(path)
}
