//! Full pipeline on a synthetic track table: standardize, project, then
//! cluster with both the elbow-tuned k-means path and the delta-tuned
//! DBSCAN path.

use setlist::pipeline::{run_clustering, run_density_clustering, PipelineConfig};
use setlist::record::{Dataset, Record};
use setlist::report::{cluster_feature_mean, feature_mean, genre_profile};

fn main() {
    // Three sonic families over (Energy, Danceability, Acousticness).
    let families: [(&str, &str, [f64; 3]); 3] = [
        ("ballad", "folk rock", [15.0, 25.0, 85.0]),
        ("club", "electro house", [90.0, 80.0, 5.0]),
        ("groove", "funk soul", [60.0, 70.0, 30.0]),
    ];

    let mut records = Vec::new();
    for (family, genre, center) in &families {
        for i in 0..12 {
            let jitter = |c: f64| c + (i % 4) as f64 - 1.5;
            records.push(Record {
                id: records.len(),
                title: format!("{family} {i}"),
                artist: format!("{family} artist"),
                genre: genre.to_string(),
                features: center.iter().map(|&c| Some(jitter(c))).collect(),
            });
        }
    }

    let columns = vec![
        "Energy".to_string(),
        "Danceability".to_string(),
        "Acousticness".to_string(),
    ];
    let dataset = Dataset::new(columns, records).unwrap();

    let config = PipelineConfig {
        variance_threshold: 0.70,
        k_range: (2, 8),
        epsilon_range: (0.2, 2.0, 0.2),
        min_points: 4,
        seed: Some(42),
        ..PipelineConfig::default()
    };

    // --- Centroid path ---
    let run = run_clustering(&dataset, &config).unwrap();
    let index = run.index(&dataset).unwrap();
    println!("=== K-means (elbow-selected k={}) ===", run.k);
    println!("retained {} principal components", run.projection.retained);

    let overall = feature_mean(&dataset, "Energy").unwrap();
    for (id, cluster) in run.clusters.iter().enumerate() {
        let energy = cluster_feature_mean(&dataset, &cluster.members, "Energy").unwrap();
        let genres: Vec<String> = genre_profile(&dataset, &cluster.members)
            .iter()
            .map(|s| format!("{} {:.0}%", s.genre, s.share * 100.0))
            .collect();
        println!(
            "  cluster {id}: {} tracks, mean energy {energy:.1} (dataset {overall:.1}), {}",
            cluster.members.len(),
            genres.join(", ")
        );
        for &member in cluster.members.iter().take(3) {
            let record = index.record(member).unwrap();
            println!("    - {} ({})", record.title, record.genre);
        }
    }

    // --- Density path ---
    let run = run_density_clustering(&dataset, &config).unwrap();
    println!("\n=== DBSCAN (delta-selected eps={:.2}) ===", run.epsilon);
    for (id, members) in run.clusters.iter().enumerate() {
        println!("  cluster {id}: {} tracks", members.len());
    }
    println!("  noise: {} tracks", run.noise.len());
}
