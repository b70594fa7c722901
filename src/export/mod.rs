//! CSV export of resolved rounds.
//!
//! One row per [`RoundRecord`], column order fixed for compatibility
//! with historical logs:
//!
//! `round_index, first_choice, flipped_card, second_choice, trophy_card,
//! result, switched, reward, rule_applied`
//!
//! Slot columns are bare 0-based integers, booleans render as
//! `true`/`false`, and `rule_applied` carries the rule's stable label.
//! A session export writes all records, in ledger order, to one file
//! named by participant identifier and timestamp.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::session::{Ledger, RoundRecord};

/// One CSV row. Field order is the persisted column order.
#[derive(Debug, Serialize)]
struct Row<'a> {
    round_index: u32,
    first_choice: u8,
    flipped_card: u8,
    second_choice: u8,
    trophy_card: u8,
    result: bool,
    switched: bool,
    reward: i64,
    rule_applied: &'a str,
}

impl<'a> From<&'a RoundRecord> for Row<'a> {
    fn from(record: &'a RoundRecord) -> Self {
        Self {
            round_index: record.round_index,
            first_choice: record.first_choice.raw(),
            flipped_card: record.revealed.raw(),
            second_choice: record.second_choice.raw(),
            trophy_card: record.target.raw(),
            result: record.won,
            switched: record.switched,
            reward: record.points_delta,
            rule_applied: record.rule_applied.label(),
        }
    }
}

/// Write records as CSV rows, header first, to any writer.
pub fn write_records<'a, W, I>(records: I, writer: W) -> Result<(), csv::Error>
where
    W: io::Write,
    I: IntoIterator<Item = &'a RoundRecord>,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(Row::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Build the export filename: sanitized participant id plus timestamp.
#[must_use]
pub fn session_filename(participant: &str, epoch_secs: u64) -> String {
    let safe: String = participant
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let safe = if safe.is_empty() {
        "anonymous".to_string()
    } else {
        safe
    };
    format!("{}_{}.csv", safe, epoch_secs)
}

/// Export a session's ledger to `<dir>/<participant>_<unix-seconds>.csv`.
///
/// Returns the path written. The directory must already exist.
pub fn export_session(
    ledger: &Ledger,
    participant: &str,
    dir: &Path,
) -> Result<PathBuf, csv::Error> {
    let epoch_secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let path = dir.join(session_filename(participant, epoch_secs));

    let file = File::create(&path)?;
    write_records(ledger.all(), file)?;

    log::info!("wrote {} rounds to {}", ledger.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RewardRule, Slot};

    fn sample_record() -> RoundRecord {
        RoundRecord {
            round_index: 0,
            first_choice: Slot::new(0),
            revealed: Slot::new(2),
            second_choice: Slot::new(1),
            target: Slot::new(1),
            won: true,
            switched: true,
            points_delta: 90,
            rule_applied: RewardRule::SwitchCost(10),
        }
    }

    #[test]
    fn test_header_and_column_order() {
        let mut buf = Vec::new();
        write_records(std::iter::once(&sample_record()), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(
                "round_index,first_choice,flipped_card,second_choice,\
                 trophy_card,result,switched,reward,rule_applied"
            )
        );
        assert_eq!(lines.next(), Some("0,0,2,1,1,true,true,90,switch_cost"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_rows_follow_ledger_order() {
        let mut ledger = Ledger::new();
        for i in 0..5 {
            let mut record = sample_record();
            record.round_index = i;
            ledger.append(record);
        }

        let mut buf = Vec::new();
        write_records(ledger.all(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let indices: Vec<_> = text
            .lines()
            .skip(1)
            .map(|line| line.split(',').next().unwrap().to_string())
            .collect();
        assert_eq!(indices, vec!["0", "1", "2", "3", "4"]);
    }

    #[test]
    fn test_hidden_rule_exports_kind_label() {
        let mut record = sample_record();
        record.rule_applied = RewardRule::Heuristic {
            kind: crate::core::HeuristicKind::Representativeness,
            cost: 10,
        };

        let mut buf = Vec::new();
        write_records(std::iter::once(&record), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("representativeness"));
    }

    #[test]
    fn test_empty_ledger_writes_header_only() {
        let ledger = Ledger::new();
        let mut buf = Vec::new();
        write_records(ledger.all(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_session_filename_sanitizes() {
        assert_eq!(session_filename("p01", 1700000000), "p01_1700000000.csv");
        assert_eq!(
            session_filename("Ada Lovelace", 1700000000),
            "Ada_Lovelace_1700000000.csv"
        );
        assert_eq!(
            session_filename("a@b.example", 7),
            "a_b_example_7.csv"
        );
        assert_eq!(session_filename("", 7), "anonymous_7.csv");
    }

    #[test]
    fn test_export_session_writes_file() {
        let mut ledger = Ledger::new();
        ledger.append(sample_record());

        let dir = std::env::temp_dir();
        let path = export_session(&ledger, "p01", &dir).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("p01_"));

        std::fs::remove_file(path).unwrap();
    }
}
