use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::parse::ExtractedRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationEntry {
    #[serde(rename = "stationNm")]
    pub station_nm: String,
    #[serde(rename = "naverCode")]
    pub naver_code: u32,
}

/// Stations grouped by line, each line's stations ascending by code.
///
/// The ordering holds after every insert, so the table can be read at any point of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateTable {
    lines: BTreeMap<String, Vec<StationEntry>>,
}

impl AggregateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record to its line. Records missing the line or the station name are
    /// dropped and `false` is returned.
    pub fn insert(&mut self, record: ExtractedRecord) -> bool {
        if !record.is_complete() {
            return false;
        }
        let ExtractedRecord {
            line_num,
            station_nm,
            naver_code,
        } = record;

        let stations = self.lines.entry(line_num).or_default();
        // Equal codes keep their arrival order.
        let idx = stations.partition_point(|s| s.naver_code <= naver_code);
        stations.insert(
            idx,
            StationEntry {
                station_nm,
                naver_code,
            },
        );
        true
    }

    pub fn get(&self, line: &str) -> Option<&[StationEntry]> {
        self.lines.get(line).map(Vec::as_slice)
    }

    pub fn lines(&self) -> impl Iterator<Item = (&str, &[StationEntry])> {
        self.lines.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn station_count(&self) -> usize {
        self.lines.values().map(Vec::len).sum()
    }
}

impl Extend<ExtractedRecord> for AggregateTable {
    fn extend<T: IntoIterator<Item = ExtractedRecord>>(&mut self, iter: T) {
        for record in iter {
            self.insert(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn codes(table: &AggregateTable, line: &str) -> Vec<u32> {
        table
            .get(line)
            .unwrap_or_default()
            .iter()
            .map(|s| s.naver_code)
            .collect()
    }

    #[test]
    fn late_arrival_is_sorted_in() {
        let mut table = AggregateTable::new();
        assert!(table.insert(ExtractedRecord::new("Line1", "B", 5)));
        assert!(table.insert(ExtractedRecord::new("Line1", "A", 3)));

        assert_eq!(
            table.get("Line1").unwrap(),
            &[
                StationEntry { station_nm: "A".into(), naver_code: 3 },
                StationEntry { station_nm: "B".into(), naver_code: 5 },
            ]
        );
    }

    #[test]
    fn incomplete_records_are_dropped() {
        let mut table = AggregateTable::new();
        assert!(!table.insert(ExtractedRecord::new("", "Station", 1)));
        assert!(!table.insert(ExtractedRecord::new("Line1", "", 2)));
        assert!(!table.insert(ExtractedRecord::new("", "", 3)));
        assert!(table.is_empty());
        assert_eq!(table.station_count(), 0);
    }

    #[test]
    fn lines_are_grouped_separately() {
        let mut table = AggregateTable::new();
        table.extend([
            ExtractedRecord::new("2", "Gangnam", 222),
            ExtractedRecord::new("1", "Seoul", 150),
            ExtractedRecord::new("2", "City Hall", 201),
        ]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.station_count(), 3);
        assert_eq!(codes(&table, "1"), vec![150]);
        assert_eq!(codes(&table, "2"), vec![201, 222]);
        let keys: Vec<_> = table.lines().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["1", "2"]);
    }

    proptest! {
        #[test]
        fn stays_sorted_under_any_arrival_order(
            records in prop::collection::vec((0..4u8, 0..500u32, any::<bool>()), 0..200)
        ) {
            let mut table = AggregateTable::new();
            for (line, code, named) in records {
                let name = if named { format!("st{code}") } else { String::new() };
                table.insert(ExtractedRecord::new(format!("L{line}"), name, code));

                for (_, stations) in table.lines() {
                    prop_assert!(stations.windows(2).all(|w| w[0].naver_code <= w[1].naver_code));
                    prop_assert!(stations.iter().all(|s| !s.station_nm.is_empty()));
                }
            }
            prop_assert!(table.lines().all(|(k, _)| !k.is_empty()));
        }

        #[test]
        fn insertion_order_does_not_change_the_result(
            codes in prop::collection::hash_set(0..10_000u32, 0..100)
                .prop_map(|s| s.into_iter().collect::<Vec<_>>())
        ) {
            let build = |codes: &[u32]| {
                let mut table = AggregateTable::new();
                table.extend(codes.iter().map(|&c| ExtractedRecord::new(format!("L{}", c % 3), format!("st{c}"), c)));
                table
            };
            let mut reversed = codes.clone();
            reversed.reverse();
            prop_assert_eq!(build(&codes), build(&reversed));
        }
    }
}
