//! Results persistence module

use crate::config::AnalysisConfig;
use crate::error::{AnalyzerError, Result};
use crate::metrics::{CumulativeDistribution, FrequencyTable, MetricsReport};
use itertools::Itertools;
use serde_json::{json, to_string_pretty};
use statrs::statistics::Statistics;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// File name of the cumulative strength distribution
pub const STRENGTH_DISTRIBUTION_FILE: &str = "StrengthDistribution.txt";

/// Render `threshold fraction` lines joined by newlines, with no trailing newline
pub fn format_two_column(distribution: &CumulativeDistribution) -> String {
    distribution
        .iter()
        .map(|(threshold, fraction)| format!("{} {}", threshold, fraction))
        .join("\n")
}

/// Parse whitespace-separated `threshold fraction` lines; blank lines are ignored
pub fn parse_two_column(input: &str) -> Result<CumulativeDistribution> {
    let mut pairs = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != 2 {
            return Err(AnalyzerError::Parse {
                line: line_no,
                message: format!("expected 2 columns, found {}", fields.len()),
            });
        }

        let parse = |field: &str| {
            field.parse::<f64>().map_err(|e| AnalyzerError::Parse {
                line: line_no,
                message: format!("{:?}: {}", field, e),
            })
        };
        pairs.push((parse(fields[0])?, parse(fields[1])?));
    }

    Ok(pairs.into_iter().collect())
}

/// Write the cumulative distribution in two-column text form
pub fn write_cumulative_distribution(
    path: impl AsRef<Path>,
    distribution: &CumulativeDistribution,
) -> Result<()> {
    let path = path.as_ref();
    log::info!("Writing cumulative strength distribution to {}", path.display());

    let mut file = File::create(path)?;
    file.write_all(format_two_column(distribution).as_bytes())?;

    Ok(())
}

/// Read a distribution written by [`write_cumulative_distribution`]
pub fn read_cumulative_distribution(path: impl AsRef<Path>) -> Result<CumulativeDistribution> {
    parse_two_column(&fs::read_to_string(path)?)
}

/// Save analysis results to the specified directory
pub fn save_results(report: &MetricsReport, config: &AnalysisConfig, output_dir: &str) -> Result<()> {
    log::info!("Saving results for {} nodes to {}", report.processed, output_dir);

    fs::create_dir_all(output_dir)?;
    let dir = Path::new(output_dir);

    save_summary(report, config, dir)?;
    save_nodes(report, dir)?;
    save_table(&report.distributions.strength, "strength", &dir.join("strength_distribution.csv"))?;
    save_table(
        &report.distributions.clustering,
        "clustering",
        &dir.join("clustering_distribution.csv"),
    )?;
    write_cumulative_distribution(dir.join(STRENGTH_DISTRIBUTION_FILE), &report.cumulative_strength())?;

    log::info!("Results saved successfully");

    Ok(())
}

/// Save summary information
fn save_summary(report: &MetricsReport, config: &AnalysisConfig, dir: &Path) -> Result<()> {
    let coefficients: Vec<f64> = report.computed().map(|(_, m)| m.clustering).collect();
    let strengths: Vec<f64> = report.computed().map(|(_, m)| m.strength).collect();

    let summary = json!({
        "mode": report.mode,
        "status": report.status,
        "node_count": report.total,
        "processed_nodes": report.processed,
        "partial": report.is_partial(),
        "average_clustering_coefficient": report.average_clustering,
        "average_strength": report.average_strength,
        "clustering_std_dev": coefficients.iter().std_dev(),
        "strength_std_dev": strengths.iter().std_dev(),
        "max_strength": report.distributions.strength.max_key(),
        "distinct_strengths": report.distributions.strength.len(),
        "distinct_coefficients": report.distributions.clustering.len(),
        "config": config,
    });

    let mut file = File::create(dir.join("summary.json"))?;
    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}

/// Quote a CSV field when it needs it
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Save per-node results for every computed node
fn save_nodes(report: &MetricsReport, dir: &Path) -> Result<()> {
    let mut file = File::create(dir.join("nodes.csv"))?;

    writeln!(file, "id,label,strength,degree,clustering")?;
    for (node, m) in report.computed() {
        writeln!(
            file,
            "{},{},{},{},{}",
            node,
            csv_field(&report.label(node)),
            m.strength,
            m.degree,
            m.clustering
        )?;
    }

    Ok(())
}

fn save_table(table: &FrequencyTable, value_name: &str, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "{},count", value_name)?;
    for (value, count) in table.iter() {
        writeln!(file, "{},{}", value, count)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphMode;
    use crate::metrics::compute_weighted_clustering;
    use crate::tests::build;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    fn sample() -> CumulativeDistribution {
        [(1.0, 1.0), (2.5, 0.6), (10.125, 0.2)].into_iter().collect()
    }

    #[test]
    fn two_column_format_has_no_trailing_newline() {
        assert_eq!(format_two_column(&sample()), "1 1\n2.5 0.6\n10.125 0.2");
        assert_eq!(format_two_column(&CumulativeDistribution::default()), "");
    }

    #[test]
    fn two_column_roundtrip_through_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(STRENGTH_DISTRIBUTION_FILE);
        let original: CumulativeDistribution =
            [(0.1 + 0.2, 1.0), (1.0 / 3.0, 2.0 / 3.0), (7.0, 1.0 / 3.0)].into_iter().collect();

        write_cumulative_distribution(&path, &original).unwrap();
        let loaded = read_cumulative_distribution(&path).unwrap();

        assert_eq!(loaded.len(), original.len());
        for ((k1, v1), (k2, v2)) in original.iter().zip(loaded.iter()) {
            assert_relative_eq!(k1, k2, epsilon = 1e-12);
            assert_relative_eq!(v1, v2, epsilon = 1e-12);
        }
    }

    #[test]
    fn parse_rejects_malformed_lines() {
        assert!(matches!(
            parse_two_column("1 0.5\n2 0.25 9"),
            Err(AnalyzerError::Parse { line: 2, .. })
        ));
        assert!(matches!(
            parse_two_column("x 0.5"),
            Err(AnalyzerError::Parse { line: 1, .. })
        ));
        assert_eq!(parse_two_column("\n1\t0.5\n\n").unwrap().get(1.0), Some(0.5));
    }

    #[test]
    fn save_results_writes_all_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let out = temp_dir.path().join("results");
        let graph = build(
            GraphMode::Undirected,
            &[("a", "b", 1.0), ("b", "c", 1.0), ("c", "a", 1.0), ("c", "d", 2.0)],
        );
        let config = AnalysisConfig::new(GraphMode::Undirected);
        let report = compute_weighted_clustering(&graph, &config).unwrap();

        save_results(&report, &config, out.to_str().unwrap()).unwrap();

        let summary: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("summary.json")).unwrap()).unwrap();
        assert_eq!(summary["node_count"], 4);
        assert_eq!(summary["partial"], false);
        assert_eq!(summary["mode"], "undirected");

        let nodes = fs::read_to_string(out.join("nodes.csv")).unwrap();
        assert_eq!(nodes.lines().count(), 5);
        assert!(nodes.lines().nth(1).unwrap().starts_with("0,a,2,2,1"));

        let cumulative = read_cumulative_distribution(out.join(STRENGTH_DISTRIBUTION_FILE)).unwrap();
        assert_eq!(cumulative.get(2.0), Some(1.0));
        assert!(out.join("strength_distribution.csv").exists());
        assert!(out.join("clustering_distribution.csv").exists());
    }
}
