//! Incident records and CSV report

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::LogError;

/// Violation type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Violation {
    Drowsiness,
    PhoneUse,
}

impl Violation {
    /// Report label, kept identical to the field system's wording.
    pub fn label(&self) -> &'static str {
        match self {
            Violation::Drowsiness => "YORGUNLUK (UYUMA)",
            Violation::PhoneUse => "DIKKAT (TELEFON)",
        }
    }
}

/// One recorded violation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Incident {
    /// Date, YYYY-MM-DD
    pub date: String,
    /// Time, HH:MM:SS
    pub time: String,
    /// Violation type
    pub kind: Violation,
}

/// Append-only ordered incident log.
///
/// Adjacent entries never share both second-resolution timestamp and
/// violation type; repeat calls within the same second are dropped so a
/// sustained alert does not spam one row per frame.
#[derive(Debug, Default)]
pub struct IncidentLog {
    entries: Vec<Incident>,
}

impl IncidentLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation at the current wall-clock time.
    pub fn record(&mut self, kind: Violation) {
        self.record_at(Local::now(), kind);
    }

    fn record_at(&mut self, now: DateTime<Local>, kind: Violation) {
        let time = now.format("%H:%M:%S").to_string();
        if let Some(last) = self.entries.last() {
            if last.time == time && last.kind == kind {
                return;
            }
        }
        debug!(kind = kind.label(), %time, "incident recorded");
        self.entries.push(Incident {
            date: now.format("%Y-%m-%d").to_string(),
            time,
            kind,
        });
    }

    pub fn entries(&self) -> &[Incident] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the report CSV under `results_dir` (created on demand) and
    /// return its path. An empty log writes nothing and returns `None`.
    pub fn flush(&self, results_dir: &Path) -> Result<Option<PathBuf>, LogError> {
        if self.entries.is_empty() {
            info!("no incidents recorded during this run");
            return Ok(None);
        }

        fs::create_dir_all(results_dir)?;
        let path = results_dir.join(format!(
            "gorev_raporu_{}.csv",
            Local::now().format("%Y%m%d_%H%M")
        ));

        let mut file = fs::File::create(&path)?;
        writeln!(file, "Tarih,Saat,Ihlal_Turu")?;
        for incident in &self.entries {
            writeln!(
                file,
                "{},{},{}",
                incident.date,
                incident.time,
                incident.kind.label()
            )?;
        }

        info!(path = %path.display(), entries = self.entries.len(), "incident report written");
        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_same_second_same_kind_deduplicated() {
        let mut log = IncidentLog::new();
        log.record_at(at(10, 0, 0), Violation::Drowsiness);
        log.record_at(at(10, 0, 0), Violation::Drowsiness);
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn test_same_second_other_kind_kept() {
        let mut log = IncidentLog::new();
        log.record_at(at(10, 0, 0), Violation::Drowsiness);
        log.record_at(at(10, 0, 0), Violation::PhoneUse);
        assert_eq!(log.entries().len(), 2);
    }

    #[test]
    fn test_next_second_recorded_again() {
        let mut log = IncidentLog::new();
        log.record_at(at(10, 0, 0), Violation::Drowsiness);
        log.record_at(at(10, 0, 1), Violation::Drowsiness);
        assert_eq!(log.entries().len(), 2);
    }

    #[test]
    fn test_dedup_is_adjacent_only() {
        // A different kind in between re-arms the duplicate check.
        let mut log = IncidentLog::new();
        log.record_at(at(10, 0, 0), Violation::Drowsiness);
        log.record_at(at(10, 0, 0), Violation::PhoneUse);
        log.record_at(at(10, 0, 0), Violation::Drowsiness);
        assert_eq!(log.entries().len(), 3);
    }

    #[test]
    fn test_flush_empty_writes_nothing() {
        let dir = std::env::temp_dir().join(format!("incident-empty-{}", std::process::id()));
        let log = IncidentLog::new();
        assert!(log.flush(&dir).unwrap().is_none());
        assert!(!dir.exists());
    }

    #[test]
    fn test_flush_writes_csv() {
        let dir = std::env::temp_dir().join(format!("incident-flush-{}", std::process::id()));
        let mut log = IncidentLog::new();
        log.record_at(at(10, 0, 0), Violation::Drowsiness);
        log.record_at(at(10, 0, 2), Violation::PhoneUse);

        let path = log.flush(&dir).unwrap().expect("report path");
        let body = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[0], "Tarih,Saat,Ihlal_Turu");
        assert_eq!(lines[1], "2024-05-01,10:00:00,YORGUNLUK (UYUMA)");
        assert_eq!(lines[2], "2024-05-01,10:00:02,DIKKAT (TELEFON)");

        fs::remove_dir_all(&dir).unwrap();
    }
}
