//! Read-side helpers for cluster reporting.
//!
//! Downstream reporting (playlists, charts) needs two aggregates per
//! cluster: the mean of a named feature compared against the whole dataset,
//! and a genre breakdown. Both operate on the original (or standardized)
//! dataset plus member positions, never on projected coordinates.

use crate::error::{Error, Result};
use crate::record::Dataset;

/// Canonical genre families used for cluster profiles; labels matching none
/// of them fall into the "other" bucket.
pub const MAIN_GENRES: [&str; 19] = [
    "alternative",
    "jazz",
    "pop",
    "indie",
    "rock",
    "country",
    "dance",
    "hip hop",
    "metal",
    "blues",
    "folk",
    "soul",
    "carnaval",
    "punk",
    "disco",
    "electro",
    "rap",
    "latin",
    "reggae",
];

/// Share of one genre family within a cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct GenreShare {
    /// Genre family (or `"other"`).
    pub genre: &'static str,
    /// Fraction of the cluster's members, in `[0, 1]`.
    pub share: f64,
}

/// Mean of a named feature over the whole dataset, skipping missing values.
pub fn feature_mean(dataset: &Dataset, column: &str) -> Result<f64> {
    let members: Vec<usize> = (0..dataset.len()).collect();
    cluster_feature_mean(dataset, &members, column)
}

/// Mean of a named feature over the given member positions, skipping
/// missing values.
pub fn cluster_feature_mean(dataset: &Dataset, members: &[usize], column: &str) -> Result<f64> {
    let at = dataset
        .column_index(column)
        .ok_or_else(|| Error::MissingColumn(column.to_string()))?;

    let values: Vec<f64> = members
        .iter()
        .filter_map(|&idx| dataset.records().get(idx))
        .filter_map(|record| record.features[at])
        .collect();

    if values.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Genre breakdown of a cluster: the fraction of members per genre family,
/// non-zero entries only, in canonical order with `"other"` last.
///
/// A member counts toward the first family its genre label contains, so
/// e.g. `"alternative rock"` counts as `alternative`.
pub fn genre_profile(dataset: &Dataset, members: &[usize]) -> Vec<GenreShare> {
    if members.is_empty() {
        return Vec::new();
    }

    let mut counts = vec![0usize; MAIN_GENRES.len() + 1];
    for &idx in members {
        let Some(record) = dataset.records().get(idx) else {
            continue;
        };
        let family = MAIN_GENRES
            .iter()
            .position(|genre| record.genre.contains(genre))
            .unwrap_or(MAIN_GENRES.len());
        counts[family] += 1;
    }

    let total = members.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .map(|(family, count)| GenreShare {
            genre: MAIN_GENRES.get(family).copied().unwrap_or("other"),
            share: count as f64 / total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use approx::assert_relative_eq;

    fn dataset() -> Dataset {
        let rows: Vec<(&str, Option<f64>)> = vec![
            ("alternative rock", Some(10.0)),
            ("smooth jazz", Some(20.0)),
            ("jazz fusion", None),
            ("celtic twilight", Some(30.0)),
        ];
        let records = rows
            .into_iter()
            .enumerate()
            .map(|(id, (genre, energy))| Record {
                id,
                title: String::new(),
                artist: String::new(),
                genre: genre.to_string(),
                features: vec![energy],
            })
            .collect();
        Dataset::new(vec!["Energy".into()], records).unwrap()
    }

    #[test]
    fn test_feature_mean_skips_missing() {
        let data = dataset();
        assert_relative_eq!(feature_mean(&data, "Energy").unwrap(), 20.0);
        assert_relative_eq!(
            cluster_feature_mean(&data, &[1, 2], "Energy").unwrap(),
            20.0
        );
    }

    #[test]
    fn test_feature_mean_missing_column() {
        let data = dataset();
        assert!(matches!(
            feature_mean(&data, "Tempo"),
            Err(Error::MissingColumn(_))
        ));
    }

    #[test]
    fn test_feature_mean_no_values() {
        let data = dataset();
        assert!(matches!(
            cluster_feature_mean(&data, &[2], "Energy"),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn test_genre_profile_first_family_wins() {
        let data = dataset();
        let profile = genre_profile(&data, &[0, 1, 2, 3]);

        assert_eq!(
            profile,
            vec![
                GenreShare {
                    genre: "alternative",
                    share: 0.25
                },
                GenreShare {
                    genre: "jazz",
                    share: 0.5
                },
                GenreShare {
                    genre: "other",
                    share: 0.25
                },
            ]
        );
    }

    #[test]
    fn test_genre_profile_empty_cluster() {
        assert!(genre_profile(&dataset(), &[]).is_empty());
    }
}
