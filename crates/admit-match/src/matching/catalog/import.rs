use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::path::Path;

use super::{CatalogViolation, InstitutionDraft};

#[derive(Debug)]
pub enum CatalogImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
    InvalidRow {
        row: usize,
        violation: CatalogViolation,
    },
}

impl std::fmt::Display for CatalogImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogImportError::Io(err) => write!(f, "failed to read catalog export: {}", err),
            CatalogImportError::Csv(err) => write!(f, "invalid catalog CSV data: {}", err),
            CatalogImportError::InvalidValue { row, column, value } => write!(
                f,
                "row {}: column '{}' has an unreadable value '{}'",
                row, column, value
            ),
            CatalogImportError::InvalidRow { row, violation } => {
                write!(f, "row {}: {}", row, violation)
            }
        }
    }
}

impl std::error::Error for CatalogImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogImportError::Io(err) => Some(err),
            CatalogImportError::Csv(err) => Some(err),
            CatalogImportError::InvalidValue { .. } => None,
            CatalogImportError::InvalidRow { violation, .. } => Some(violation),
        }
    }
}

impl From<std::io::Error> for CatalogImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CatalogImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Bulk loader for spreadsheet exports of the institution catalog.
pub struct InstitutionCsvImporter;

impl InstitutionCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<InstitutionDraft>, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<InstitutionDraft>, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut drafts = Vec::new();

        for (index, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            // header is line 1
            let row = index + 2;
            let draft = record?.into_draft(row)?;
            draft
                .validate()
                .map_err(|violation| CatalogImportError::InvalidRow { row, violation })?;
            drafts.push(draft);
        }

        Ok(drafts)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Program")]
    program: String,
    #[serde(rename = "Location", default, deserialize_with = "empty_string_as_none")]
    location: Option<String>,
    #[serde(rename = "Category", default, deserialize_with = "empty_string_as_none")]
    category: Option<String>,
    #[serde(rename = "Type", default, deserialize_with = "empty_string_as_none")]
    university_type: Option<String>,
    #[serde(
        rename = "Acceptance Rate",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    acceptance_rate: Option<String>,
    #[serde(rename = "Tuition", default, deserialize_with = "empty_string_as_none")]
    tuition: Option<String>,
    #[serde(
        rename = "National Rank",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    national_rank: Option<String>,
    #[serde(
        rename = "International Rank",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    international_rank: Option<String>,
    #[serde(rename = "Website", default, deserialize_with = "empty_string_as_none")]
    website: Option<String>,
    #[serde(
        rename = "Application Deadline",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    application_deadline: Option<String>,
}

impl CatalogRow {
    fn into_draft(self, row: usize) -> Result<InstitutionDraft, CatalogImportError> {
        let acceptance_rate_percent = parse_amount(row, "Acceptance Rate", self.acceptance_rate)?;
        let tuition_fees_per_year = parse_amount(row, "Tuition", self.tuition)?;
        let ranking_national = parse_rank(row, "National Rank", self.national_rank)?;
        let ranking_international =
            parse_rank(row, "International Rank", self.international_rank)?;
        let application_deadline = self
            .application_deadline
            .map(|raw| {
                NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                    CatalogImportError::InvalidValue {
                        row,
                        column: "Application Deadline",
                        value: raw,
                    }
                })
            })
            .transpose()?;

        Ok(InstitutionDraft {
            name: self.name,
            program: self.program,
            location: self.location,
            category: self.category,
            university_type: self.university_type,
            acceptance_rate_percent,
            tuition_fees_per_year,
            ranking_national,
            ranking_international,
            website: self.website,
            application_deadline,
            ..InstitutionDraft::default()
        })
    }
}

fn parse_amount(
    row: usize,
    column: &'static str,
    raw: Option<String>,
) -> Result<Option<f64>, CatalogImportError> {
    raw.map(|value| {
        let cleaned: String = value
            .chars()
            .filter(|c| !matches!(c, ',' | '%' | '$' | ' '))
            .collect();
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|amount| amount.is_finite())
            .ok_or(CatalogImportError::InvalidValue { row, column, value })
    })
    .transpose()
}

fn parse_rank(
    row: usize,
    column: &'static str,
    raw: Option<String>,
) -> Result<Option<u32>, CatalogImportError> {
    raw.map(|value| {
        value
            .trim_start_matches('#')
            .parse::<u32>()
            .map_err(|_| CatalogImportError::InvalidValue { row, column, value })
    })
    .transpose()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
