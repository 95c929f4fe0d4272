use scraper::{Html, Selector};
use tokio::task::spawn_blocking;

use crate::{Error, Result};

const LINE_SELECTOR: &str = ".line_no";
const STATION_SELECTOR: &str = ".place_name";

/// What a single page yielded. Most codes don't map to a station, in which case
/// `line_num` and/or `station_nm` are empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRecord {
    pub line_num: String,
    pub station_nm: String,
    pub naver_code: u32,
}

impl ExtractedRecord {
    pub fn new(line_num: impl Into<String>, station_nm: impl Into<String>, naver_code: u32) -> Self {
        Self {
            line_num: line_num.into(),
            station_nm: station_nm.into(),
            naver_code,
        }
    }

    /// Both the line and the station name were found.
    pub fn is_complete(&self) -> bool {
        !self.line_num.is_empty() && !self.station_nm.is_empty()
    }
}

/// Parses the page off the async runtime (`Html` is `!Send`).
pub async fn parse_station(html: String, code: u32) -> Result<ExtractedRecord> {
    spawn_blocking(move || extract_record(&html, code)).await?
}

/// Pulls the text of the first `.line_no` and the first `.place_name` element.
/// Markup is stripped, whitespace is left as is.
pub fn extract_record(html: &str, code: u32) -> Result<ExtractedRecord> {
    let doc = Html::parse_document(html);

    let line_selector = create_selector(LINE_SELECTOR)?;
    let station_selector = create_selector(STATION_SELECTOR)?;

    Ok(ExtractedRecord {
        line_num: first_text(&doc, &line_selector),
        station_nm: first_text(&doc, &station_selector),
        naver_code: code,
    })
}

fn first_text(doc: &Html, selector: &Selector) -> String {
    doc.select(selector)
        .next()
        .map(|el| el.text().collect())
        .unwrap_or_default()
}

#[inline]
fn create_selector(sel_str: &str) -> Result<Selector> {
    Selector::parse(sel_str).map_err(|_| Error::ParseMissingSelector(sel_str.into()))
}
