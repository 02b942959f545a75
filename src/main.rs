use anyhow::Result;
use clap::{Parser, ValueEnum};

use weighted_cluster_analyzer::config::{
    AnalysisConfig, AverageDivisor, EdgeColumns, GraphMode, KeyPolicy, Normalization,
    MAX_KEY_DECIMALS,
};
use weighted_cluster_analyzer::{data, metrics, storage};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NormalizationArg {
    Total,
    MaxKeyCount,
    MaxKey,
}

impl From<NormalizationArg> for Normalization {
    fn from(arg: NormalizationArg) -> Self {
        match arg {
            NormalizationArg::Total => Normalization::TotalCount,
            NormalizationArg::MaxKeyCount => Normalization::MaxKeyCount,
            NormalizationArg::MaxKey => Normalization::MaxKey,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AverageArg {
    Processed,
    Total,
}

impl From<AverageArg> for AverageDivisor {
    fn from(arg: AverageArg) -> Self {
        match arg {
            AverageArg::Processed => AverageDivisor::Processed,
            AverageArg::Total => AverageDivisor::Total,
        }
    }
}

#[derive(Parser, Debug)]
#[clap(
    name = "weighted-cluster-analyzer",
    about = "Weighted clustering coefficient and node strength of a weighted graph"
)]
struct Cli {
    /// Path to input Parquet edge list
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "wcc_results")]
    output_dir: String,

    /// Treat the edge list as directed
    #[clap(long)]
    directed: bool,

    /// Source node column
    #[clap(long, default_value = "Source")]
    source_col: String,

    /// Target node column
    #[clap(long, default_value = "Target")]
    target_col: String,

    /// Weight column; pass an empty string to give every edge weight 1.0
    #[clap(long, default_value = "Weight")]
    weight_col: String,

    /// Divisor of the cumulative strength distribution
    #[clap(long, value_enum, default_value = "total")]
    normalization: NormalizationArg,

    /// Node count the averages are divided by
    #[clap(long, value_enum, default_value = "processed")]
    average_over: AverageArg,

    /// Round distribution keys to this many decimals (0-15) instead of exact bucketing
    #[clap(long, value_parser = clap::value_parser!(u32).range(0..=MAX_KEY_DECIMALS as i64))]
    quantize: Option<u32>,

    /// Number of worker threads for graph construction (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    let mode = if args.directed {
        GraphMode::Directed
    } else {
        GraphMode::Undirected
    };

    let mut config = AnalysisConfig::new(mode)
        .with_normalization(args.normalization.into())
        .with_average_divisor(args.average_over.into());
    if let Some(decimals) = args.quantize {
        config = config.with_key_policy(KeyPolicy::Quantized { decimals });
    }

    let columns = EdgeColumns {
        source: args.source_col,
        target: args.target_col,
        weight: Some(args.weight_col).filter(|name| !name.is_empty()),
    };

    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    // 1. Load data
    let graph = data::load_edge_list(&args.input, &columns, mode)?;

    // 2. Compute per-node strength and clustering
    let report = metrics::compute_weighted_clustering(&graph, &config)?;

    // 3. Save results
    storage::save_results(&report, &config, &args.output_dir)?;

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
