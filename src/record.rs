//! Track records and dataset ingestion.
//!
//! A [`Dataset`] is an immutable table of [`Record`]s sharing one ordered
//! list of numeric feature columns. Textual attributes (title, artist,
//! genre) are carried alongside the features but never transformed; they
//! exist so cluster reports can name their members.
//!
//! Missing feature values (empty CSV cells) are kept as `None` rather than
//! being zero-filled at ingestion time; each downstream stage decides its
//! own missing-value policy.

use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// The eight audio feature columns of the canonical track dataset.
pub const FEATURE_COLUMNS: [&str; 8] = [
    "Beats Per Minute (BPM)",
    "Energy",
    "Danceability",
    "Loudness (dB)",
    "Liveness",
    "Valence",
    "Acousticness",
    "Speechiness",
];

/// Passthrough column holding the record identifier.
pub const INDEX_COLUMN: &str = "Index";
/// Passthrough column holding the track title.
pub const TITLE_COLUMN: &str = "Title";
/// Passthrough column holding the artist name.
pub const ARTIST_COLUMN: &str = "Artist";
/// Passthrough column holding the genre label.
pub const GENRE_COLUMN: &str = "Top Genre";

/// One track: identity, textual attributes, and an ordered feature vector.
///
/// `features` is positionally aligned with the owning [`Dataset`]'s column
/// list; `None` marks a value that was missing in the source.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// Source identifier (the `Index` column, or the row position when absent).
    pub id: usize,
    /// Track title.
    pub title: String,
    /// Artist name.
    pub artist: String,
    /// Genre label.
    pub genre: String,
    /// Feature values, aligned with the dataset's column order.
    pub features: Vec<Option<f64>>,
}

/// An immutable table of records with a shared feature schema.
#[derive(Clone, Debug)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Dataset {
    /// Build a dataset from a column schema and records.
    ///
    /// Every record's feature vector must match the schema length.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Result<Self> {
        let width = columns.len();
        for record in &records {
            if record.features.len() != width {
                return Err(Error::DimensionMismatch {
                    expected: width,
                    found: record.features.len(),
                });
            }
        }
        Ok(Self { columns, records })
    }

    /// Read a dataset from a CSV file using the canonical feature columns.
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file, &FEATURE_COLUMNS)
    }

    /// Read a dataset from any CSV source, selecting the named feature columns.
    ///
    /// The header must contain `Title`, `Artist`, `Top Genre`, and every
    /// requested feature column; a missing header fails with
    /// [`Error::MissingColumn`]. Empty cells become `None`.
    pub fn from_csv_reader<R: Read>(reader: R, feature_columns: &[&str]) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);

        let headers = csv.headers()?.clone();
        let position = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::MissingColumn(name.to_string()))
        };

        let title_at = position(TITLE_COLUMN)?;
        let artist_at = position(ARTIST_COLUMN)?;
        let genre_at = position(GENRE_COLUMN)?;
        let id_at = headers.iter().position(|h| h == INDEX_COLUMN);
        let feature_at: Vec<usize> = feature_columns
            .iter()
            .map(|name| position(name))
            .collect::<Result<_>>()?;

        let mut records = Vec::new();
        for (row, entry) in csv.records().enumerate() {
            let entry = entry?;

            let mut features = Vec::with_capacity(feature_at.len());
            for (&at, &name) in feature_at.iter().zip(feature_columns) {
                features.push(parse_cell(entry.get(at), name, row)?);
            }

            let id = id_at
                .and_then(|at| entry.get(at))
                .and_then(|cell| cell.trim().parse::<usize>().ok())
                .unwrap_or(row);

            records.push(Record {
                id,
                title: entry.get(title_at).unwrap_or_default().to_string(),
                artist: entry.get(artist_at).unwrap_or_default().to_string(),
                genre: entry.get(genre_at).unwrap_or_default().to_string(),
                features,
            });
        }

        Ok(Self {
            columns: feature_columns.iter().map(|c| c.to_string()).collect(),
            records,
        })
    }

    /// Feature column names, in schema order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All records, in load order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Position of a feature column in the schema, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Feature value of one record by column name.
    pub fn feature(&self, record: usize, column: &str) -> Option<f64> {
        let at = self.column_index(column)?;
        self.records.get(record).and_then(|r| r.features[at])
    }
}

fn parse_cell(cell: Option<&str>, column: &str, row: usize) -> Result<Option<f64>> {
    let cell = cell.unwrap_or("").trim();
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<f64>().map(Some).map_err(|_| {
        Error::Other(format!(
            "row {row}: column {column:?} has non-numeric value {cell:?}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_csv() -> &'static str {
        "Index,Title,Artist,Top Genre,Energy,Danceability\n\
         1,Sunrise,Norah Jones,adult standards,30,53\n\
         2,Black Night,Deep Purple,album rock,79,\n\
         3,Clint Eastwood,Gorillaz,alternative hip hop,69,66\n"
    }

    #[test]
    fn test_csv_roundtrip() {
        let dataset =
            Dataset::from_csv_reader(sample_csv().as_bytes(), &["Energy", "Danceability"]).unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.columns(), &["Energy", "Danceability"]);

        let first = &dataset.records()[0];
        assert_eq!(first.id, 1);
        assert_eq!(first.title, "Sunrise");
        assert_eq!(first.artist, "Norah Jones");
        assert_eq!(first.genre, "adult standards");
        assert_eq!(first.features, vec![Some(30.0), Some(53.0)]);
    }

    #[test]
    fn test_empty_cell_is_missing() {
        let dataset =
            Dataset::from_csv_reader(sample_csv().as_bytes(), &["Energy", "Danceability"]).unwrap();
        assert_eq!(dataset.records()[1].features[1], None);
        assert_eq!(dataset.feature(1, "Danceability"), None);
        assert_eq!(dataset.feature(1, "Energy"), Some(79.0));
    }

    #[test]
    fn test_missing_column() {
        let err = Dataset::from_csv_reader(sample_csv().as_bytes(), &["Energy", "Tempo"])
            .unwrap_err();
        assert!(matches!(err, Error::MissingColumn(name) if name == "Tempo"));
    }

    #[test]
    fn test_non_numeric_cell() {
        let csv = "Title,Artist,Top Genre,Energy\nA,B,rock,loud\n";
        assert!(Dataset::from_csv_reader(csv.as_bytes(), &["Energy"]).is_err());
    }

    #[test]
    fn test_new_checks_width() {
        let record = Record {
            id: 0,
            title: String::new(),
            artist: String::new(),
            genre: String::new(),
            features: vec![Some(1.0)],
        };
        let err = Dataset::new(vec!["a".into(), "b".into()], vec![record]).unwrap_err();
        assert!(matches!(err, Error::DimensionMismatch { expected: 2, found: 1 }));
    }
}
