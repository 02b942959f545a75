//! Parquet edge-list loading

use crate::config::{EdgeColumns, GraphMode};
use crate::error::{AnalyzerError, Result};
use crate::graph::{GraphBuilder, WeightedGraph};
use polars::prelude::*;
use std::path::Path;

/// Load a weighted edge list from a Parquet file
pub fn load_edge_list(path: &str, columns: &EdgeColumns, mode: GraphMode) -> Result<WeightedGraph> {
    log::info!("Reading parquet file: {}", path);

    if !Path::new(path).exists() {
        return Err(AnalyzerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("file not found: {}", path),
        )));
    }

    let df = LazyFrame::scan_parquet(path, Default::default())?.collect()?;

    log::info!("File schema: {:?}", df.schema());
    log::info!("Loaded {} edge rows", df.height());

    graph_from_frame(&df, columns, mode)
}

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name)
        .map_err(|_| AnalyzerError::MissingColumn(name.to_string()))
}

/// Build a graph from a frame with source, target and optional weight columns.
///
/// Ids of any type are read as strings. Rows with a null endpoint are
/// skipped; a null weight counts as 1.0.
pub fn graph_from_frame(
    df: &DataFrame,
    columns: &EdgeColumns,
    mode: GraphMode,
) -> Result<WeightedGraph> {
    let sources = column(df, &columns.source)?.cast(&DataType::String)?;
    let targets = column(df, &columns.target)?.cast(&DataType::String)?;
    let weights = match &columns.weight {
        Some(name) => Some(column(df, name)?.cast(&DataType::Float64)?),
        None => None,
    };

    let sources = sources.str()?;
    let targets = targets.str()?;
    let weights = weights.as_ref().map(|w| w.f64()).transpose()?;

    let mut builder = GraphBuilder::with_capacity(mode, df.height());
    let mut skipped = 0;

    for row in 0..df.height() {
        let (Some(src), Some(dst)) = (sources.get(row), targets.get(row)) else {
            skipped += 1;
            continue;
        };
        let weight = weights.and_then(|w| w.get(row)).unwrap_or(1.0);
        builder.add_edge(src, dst, weight)?;
    }

    if skipped > 0 {
        log::warn!("Skipped {} rows with a missing endpoint", skipped);
    }

    let graph = builder.build();
    log::info!(
        "Built graph with {} nodes and {} edges",
        graph.node_count,
        graph.edge_count
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn builds_weighted_graph_from_frame() {
        let df = df!(
            "Source" => ["a", "b", "c"],
            "Target" => ["b", "c", "a"],
            "Weight" => [1.0, 2.5, 4.0]
        )
        .unwrap();

        let graph = graph_from_frame(&df, &EdgeColumns::default(), GraphMode::Undirected).unwrap();
        assert_eq!(graph.node_count, 3);
        assert_eq!(graph.edge_count, 3);
        assert_relative_eq!(graph.edge_weight(2, 1).unwrap(), 2.5);
    }

    #[test]
    fn integer_ids_and_missing_weight_column() {
        let df = df!(
            "from" => [1i64, 2, 3],
            "to" => [2i64, 3, 1]
        )
        .unwrap();
        let columns = EdgeColumns {
            source: "from".to_string(),
            target: "to".to_string(),
            weight: None,
        };

        let graph = graph_from_frame(&df, &columns, GraphMode::Directed).unwrap();
        assert_eq!(graph.index_of("3"), Some(2));
        assert_relative_eq!(graph.edge_weight(0, 1).unwrap(), 1.0);
        assert!(graph.edge_weight(1, 0).is_none());
    }

    #[test]
    fn missing_column_is_reported() {
        let df = df!("Source" => ["a"], "Target" => ["b"]).unwrap();
        let err = graph_from_frame(&df, &EdgeColumns::default(), GraphMode::Undirected).unwrap_err();
        assert!(matches!(err, AnalyzerError::MissingColumn(name) if name == "Weight"));
    }

    #[test]
    fn negative_weight_fails_fast() {
        let df = df!(
            "Source" => ["a"],
            "Target" => ["b"],
            "Weight" => [-2.0]
        )
        .unwrap();
        assert!(matches!(
            graph_from_frame(&df, &EdgeColumns::default(), GraphMode::Undirected),
            Err(AnalyzerError::InvalidWeight { .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_edge_list(
            "/nonexistent/edges.parquet",
            &EdgeColumns::default(),
            GraphMode::Undirected,
        )
        .unwrap_err();
        assert!(matches!(err, AnalyzerError::Io(_)));
    }
}
