//! Flat-file record store. The whole CSV file is read on every load and
//! rewritten on every append; the file is the only system of record.
//! Rows the loader cannot use are left out of every view but written back
//! verbatim, so saving never loses data.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use csv::{ByteRecord, ReaderBuilder, Writer, WriterBuilder};
use serde::{Deserialize, Deserializer};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::leads::intake::MAX_PROJECT_COUNT;
use crate::leads::scoring::{compute_score, score_label, ScoringConfig};
use crate::models::company::{CallStatus, CompanyRecord, CompanyType, ProjectPhase, WorkKind};

/// Canonical header, in `CompanyRecord` field order.
pub const CSV_HEADER: [&str; 12] = [
    "name",
    "company_type",
    "work_kind",
    "project_count",
    "vacancies_active",
    "project_phase",
    "score",
    "priority",
    "status",
    "last_contact",
    "next_action",
    "note",
];

/// Column names written by the Dutch-language versions of the tracker, in
/// the same order as `CSV_HEADER`.
const LEGACY_HEADER: [&str; 12] = [
    "Bedrijf",
    "Type",
    "Werksoort",
    "Projecten",
    "Vacatures",
    "Fase",
    "Score",
    "Prioriteit",
    "Status",
    "Laatste contact",
    "Volgende actie",
    "Notitie",
];

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("store lock poisoned")]
    Poisoned,
}

/// A row as found on disk. Stored `score`/`priority` columns are ignored and
/// recomputed; header and value aliases accept files written by the
/// Dutch-language versions of the tracker.
#[derive(Debug, Deserialize)]
struct StoredRow {
    #[serde(alias = "Bedrijf")]
    name: String,
    #[serde(alias = "Type")]
    company_type: CompanyType,
    #[serde(alias = "Werksoort")]
    work_kind: WorkKind,
    #[serde(alias = "Projecten")]
    project_count: i64,
    #[serde(alias = "Vacatures", deserialize_with = "deserialize_flag")]
    vacancies_active: bool,
    #[serde(alias = "Fase")]
    project_phase: ProjectPhase,
    #[serde(alias = "Status")]
    status: CallStatus,
    #[serde(
        alias = "Laatste contact",
        default,
        deserialize_with = "deserialize_lenient_date"
    )]
    last_contact: Option<NaiveDate>,
    #[serde(alias = "Volgende actie", default)]
    next_action: Option<String>,
    #[serde(alias = "Notitie", default)]
    note: Option<String>,
}

pub struct CsvRecordStore {
    path: PathBuf,
    scoring: ScoringConfig,
    write_lock: Mutex<()>,
}

impl CsvRecordStore {
    pub fn new(path: impl Into<PathBuf>, scoring: ScoringConfig) -> Self {
        Self {
            path: path.into(),
            scoring,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every usable record. A missing file is the empty state, not an
    /// error; unusable rows are logged and left out.
    pub fn load(&self) -> Result<Vec<CompanyRecord>, StoreError> {
        let records: Vec<CompanyRecord> = self
            .read_entries()?
            .into_iter()
            .filter_map(|entry| match entry {
                Entry::Record(record) => Some(record),
                Entry::Unreadable { line, reason, .. } => {
                    warn!("Skipping row at line {line} in {:?}: {reason}", self.path);
                    None
                }
            })
            .collect();

        debug!("Loaded {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    /// Appends one record and rewrites the whole file. Unreadable rows are
    /// written back in place under the canonical header.
    pub fn append(&self, record: CompanyRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;

        let mut entries = self.read_entries()?;
        let unreadable = entries
            .iter()
            .filter(|e| matches!(e, Entry::Unreadable { .. }))
            .count();
        if unreadable > 0 {
            warn!(
                "{unreadable} unreadable rows in {:?} kept unchanged",
                self.path
            );
        }

        entries.push(Entry::Record(record));
        self.write_entries(&entries)?;

        info!("Saved record #{} to {:?}", entries.len(), self.path);
        Ok(())
    }

    fn read_entries(&self) -> Result<Vec<Entry>, StoreError> {
        if !self.path.exists() {
            debug!("No data file at {:?} yet, starting empty", self.path);
            return Ok(Vec::new());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;
        let headers = reader.byte_headers()?.clone();
        let sources = column_sources(&headers);

        let mut entries = Vec::new();
        for result in reader.byte_records() {
            let raw = result?;
            let parsed = raw
                .deserialize::<StoredRow>(Some(&headers))
                .map_err(|e| e.to_string())
                .and_then(|row| {
                    self.rescore(row)
                        .ok_or_else(|| "invalid values".to_string())
                });

            match parsed {
                Ok(record) => entries.push(Entry::Record(record)),
                Err(reason) => entries.push(Entry::Unreadable {
                    line: raw.position().map_or(0, |p| p.line()),
                    reason,
                    row: to_canonical_order(&raw, &sources),
                }),
            }
        }
        Ok(entries)
    }

    fn write_entries(&self, entries: &[Entry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut writer = csv_writer()?;
        for entry in entries {
            match entry {
                Entry::Record(record) => writer.serialize(record)?,
                Entry::Unreadable { row, .. } => writer.write_byte_record(row)?,
            }
        }

        let content = finish(writer)?;
        std::fs::write(&self.path, content).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn rescore(&self, row: StoredRow) -> Option<CompanyRecord> {
        let name = row.name.trim().to_string();
        if name.is_empty() || !(0..=MAX_PROJECT_COUNT).contains(&row.project_count) {
            return None;
        }
        let project_count = row.project_count as u8;
        let score = compute_score(
            project_count,
            row.vacancies_active,
            row.work_kind,
            row.project_phase,
            &self.scoring,
        );

        Some(CompanyRecord {
            name,
            company_type: row.company_type,
            work_kind: row.work_kind,
            project_count,
            vacancies_active: row.vacancies_active,
            project_phase: row.project_phase,
            score,
            priority: score_label(score, &self.scoring.thresholds),
            status: row.status,
            last_contact: row.last_contact,
            next_action: row.next_action.filter(|s| !s.is_empty()),
            note: row.note.filter(|s| !s.is_empty()),
        })
    }
}

/// One data row of the file, in file order.
enum Entry {
    Record(CompanyRecord),
    /// Kept as found, reordered into the canonical columns.
    Unreadable {
        line: u64,
        reason: String,
        row: ByteRecord,
    },
}

/// For each canonical column, the index of the matching column in `headers`
/// (by canonical or Dutch name).
fn column_sources(headers: &ByteRecord) -> Vec<Option<usize>> {
    CSV_HEADER
        .iter()
        .zip(LEGACY_HEADER)
        .map(|(canonical, legacy)| {
            headers
                .iter()
                .position(|h| h == canonical.as_bytes() || h == legacy.as_bytes())
        })
        .collect()
}

fn to_canonical_order(raw: &ByteRecord, sources: &[Option<usize>]) -> ByteRecord {
    sources
        .iter()
        .map(|source| source.and_then(|i| raw.get(i)).unwrap_or_default())
        .collect()
}

fn csv_writer() -> Result<Writer<Vec<u8>>, StoreError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    Ok(writer)
}

fn finish(writer: Writer<Vec<u8>>) -> Result<Vec<u8>, StoreError> {
    writer
        .into_inner()
        .map_err(|e| StoreError::Csv(e.into_error().into()))
}

/// Serializes records with the canonical header. Also used to embed the
/// data into language-model prompts.
pub fn render_csv(records: &[CompanyRecord]) -> Result<String, StoreError> {
    let mut writer = csv_writer()?;
    for record in records {
        writer.serialize(record)?;
    }
    let bytes = finish(writer)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Accepts `true/false`, `yes/no`, `ja/nee` and `1/0`, case-insensitive.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "ja" | "1" => Ok(true),
        "false" | "no" | "nee" | "0" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "unrecognised vacancy flag '{other}'"
        ))),
    }
}

/// Unparseable dates become `None` instead of rejecting the row.
fn deserialize_lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()))
}
