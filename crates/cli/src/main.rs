//! SpatialStats CLI - spatial autocorrelation and point pattern statistics

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use spatialstats_algorithms::index::Point;
use spatialstats_algorithms::neighbors::{
    distance_band_weights, idw_band_weights, idw_knn_weights, knn_weights,
};
use spatialstats_algorithms::ppa::{CenterMedianParams, PointPattern, QuadratParams};
use spatialstats_algorithms::statistics::{
    fdr, GlobalBivariateMoran, GlobalMoran, GlobalStatistic, LocalBivariateMoran, LocalGeary,
    LocalGetisOrd, LocalMoran, LocalStatistic, MultivariateGeary, PermutationParams,
};
use spatialstats_core::WeightsMatrix;

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "spatialstats")]
#[command(author, version, about = "Spatial autocorrelation and point pattern statistics", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Global autocorrelation statistics
    Global {
        #[command(subcommand)]
        statistic: GlobalCommands,
    },
    /// Local indicators of spatial association
    Local {
        #[command(subcommand)]
        statistic: LocalCommands,
    },
    /// Point pattern analysis
    Ppa {
        #[command(subcommand)]
        analysis: PpaCommands,
    },
}

// ─── Shared arguments ───────────────────────────────────────────────────

#[derive(Args)]
struct TableArgs {
    /// CSV file with a header row
    #[arg(long)]
    values: PathBuf,
    /// Key column joining rows to neighbor lists
    #[arg(long, default_value = "id")]
    key: String,
    /// Numeric column(s) to analyse, in order
    #[arg(long = "field", required = true)]
    fields: Vec<String>,
}

#[derive(Args)]
struct WeightsArgs {
    /// JSON neighbor file: {"key": [["neighbor", weight], ...]}
    #[arg(long, conflicts_with_all = ["x", "y"])]
    neighbors: Option<PathBuf>,
    /// X coordinate column (builds point-based weights)
    #[arg(long, requires = "y")]
    x: Option<String>,
    /// Y coordinate column
    #[arg(long, requires = "x")]
    y: Option<String>,
    /// Point weights: knn, band, idw-knn, idw-band
    #[arg(short, long, default_value = "knn")]
    method: String,
    /// Number of neighbors for knn methods
    #[arg(short, long, default_value = "4")]
    k: usize,
    /// Distance threshold for band methods
    #[arg(short, long)]
    band: Option<f64>,
    /// Inverse-distance exponent
    #[arg(short, long, default_value = "1.0")]
    alpha: f64,
}

#[derive(Args)]
struct PermutationArgs {
    /// Number of random permutations
    #[arg(short, long, default_value = "99")]
    permutations: usize,
    /// Seed for reproducible p-values
    #[arg(short, long)]
    seed: Option<u64>,
    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct PointArgs {
    /// CSV file with a header row
    #[arg(long)]
    values: PathBuf,
    /// X coordinate column
    #[arg(long, default_value = "x")]
    x: String,
    /// Y coordinate column
    #[arg(long, default_value = "y")]
    y: String,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

// ─── Statistic subcommands ──────────────────────────────────────────────

#[derive(Subcommand)]
enum GlobalCommands {
    /// Global Moran's I of one field
    Moran {
        #[command(flatten)]
        table: TableArgs,
        #[command(flatten)]
        weights: WeightsArgs,
        #[command(flatten)]
        perm: PermutationArgs,
    },
    /// Global bivariate Moran's I of two fields
    BivariateMoran {
        #[command(flatten)]
        table: TableArgs,
        #[command(flatten)]
        weights: WeightsArgs,
        #[command(flatten)]
        perm: PermutationArgs,
    },
}

#[derive(Args)]
struct LocalArgs {
    #[command(flatten)]
    table: TableArgs,
    #[command(flatten)]
    weights: WeightsArgs,
    #[command(flatten)]
    perm: PermutationArgs,
    /// Significance level for the FDR cutoff
    #[arg(long, default_value = "0.05")]
    fdr: f64,
}

#[derive(Subcommand)]
enum LocalCommands {
    /// Local Moran's I
    Moran {
        #[command(flatten)]
        args: LocalArgs,
    },
    /// Local Geary's C
    Geary {
        #[command(flatten)]
        args: LocalArgs,
    },
    /// Getis-Ord G / G*
    GetisOrd {
        #[command(flatten)]
        args: LocalArgs,
        /// G* (true) or G (false); picked from the weights' trace when omitted
        #[arg(long)]
        star: Option<bool>,
    },
    /// Local bivariate Moran's I of two fields
    BivariateMoran {
        #[command(flatten)]
        args: LocalArgs,
    },
    /// Multivariate local Geary's C over all given fields
    MultivariateGeary {
        #[command(flatten)]
        args: LocalArgs,
    },
}

// ─── PPA subcommands ────────────────────────────────────────────────────

#[derive(Subcommand)]
enum PpaCommands {
    /// Centers, dispersion, ellipse and convex hull
    Centrography {
        #[command(flatten)]
        points: PointArgs,
    },
    /// Nearest-neighbor distance summary
    Nn {
        #[command(flatten)]
        points: PointArgs,
    },
    /// Quadrat chi-squared test against complete spatial randomness
    Quadrat {
        #[command(flatten)]
        points: PointArgs,
        /// Cells along x
        #[arg(long, default_value = "3")]
        nx: usize,
        /// Cells along y
        #[arg(long, default_value = "3")]
        ny: usize,
        /// Number of simulated patterns
        #[arg(short, long, default_value = "99")]
        permutations: usize,
        /// Seed for reproducible p-values
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Key column plus the requested numeric columns of a CSV table.
#[derive(Debug)]
struct Table {
    keys: Vec<String>,
    columns: Vec<Vec<f64>>,
}

fn read_table(path: &Path, key: Option<&str>, columns: &[String]) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let headers = reader.headers().context("Failed to read CSV header")?.clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("Column '{}' not found in {}", name, path.display()))
    };

    let key_idx = key.map(&position).transpose()?;
    let col_idx = columns
        .iter()
        .map(|c| position(c))
        .collect::<Result<Vec<_>>>()?;

    let mut keys = Vec::new();
    let mut values = vec![Vec::new(); columns.len()];
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Bad CSV record {}", line + 1))?;
        keys.push(match key_idx {
            Some(k) => record[k].to_string(),
            None => line.to_string(),
        });
        for (out, (&idx, name)) in values.iter_mut().zip(col_idx.iter().zip(columns)) {
            let raw = record[idx].trim();
            let v: f64 = raw
                .parse()
                .with_context(|| format!("Non-numeric '{}' in column '{}' (row {})", raw, name, line + 1))?;
            if !v.is_finite() {
                anyhow::bail!("Non-finite '{}' in column '{}' (row {})", raw, name, line + 1);
            }
            out.push(v);
        }
    }
    info!("Read {} rows from {}", keys.len(), path.display());
    Ok(Table { keys, columns: values })
}

fn read_neighbors(path: &Path) -> Result<HashMap<String, Vec<(String, f64)>>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file)).context("Failed to parse neighbor file")
}

fn build_weights(
    table: &TableArgs,
    args: &WeightsArgs,
) -> Result<(WeightsMatrix<String>, Table)> {
    if let Some(path) = &args.neighbors {
        let data = read_table(&table.values, Some(&table.key), &table.fields)?;
        let adjacency = read_neighbors(path)?;
        let w = WeightsMatrix::new(data.keys.clone(), adjacency).context("Invalid weights")?;
        return Ok((w, data));
    }

    let (Some(x), Some(y)) = (&args.x, &args.y) else {
        anyhow::bail!("Weights need either --neighbors or --x/--y coordinate columns");
    };
    let mut columns = table.fields.clone();
    columns.push(x.clone());
    columns.push(y.clone());
    let mut data = read_table(&table.values, Some(&table.key), &columns)?;
    let ys = data.columns.pop().unwrap_or_default();
    let xs = data.columns.pop().unwrap_or_default();
    let points: Vec<Point> = xs.into_iter().zip(ys).map(Point::from).collect();

    let keys = data.keys.clone();
    let band = || args.band.context("--band is required for band methods");
    let w = match args.method.to_lowercase().as_str() {
        "knn" => knn_weights(keys, &points, args.k),
        "band" | "distance-band" => distance_band_weights(keys, &points, band()?),
        "idw-knn" => idw_knn_weights(keys, &points, args.k, args.alpha),
        "idw-band" => idw_band_weights(keys, &points, band()?, args.alpha),
        other => anyhow::bail!(
            "Unknown method: {}. Use knn, band, idw-knn, or idw-band.",
            other
        ),
    }
    .context("Failed to build point weights")?;
    info!("Built {} weights over {} points", args.method, points.len());
    Ok((w, data))
}

fn fields<'a, const N: usize>(data: &'a Table, names: &[String]) -> Result<[&'a [f64]; N]> {
    if data.columns.len() < N {
        anyhow::bail!(
            "Expected {} --field value(s), got {} ({})",
            N,
            data.columns.len(),
            names.join(", ")
        );
    }
    Ok(std::array::from_fn(|i| data.columns[i].as_slice()))
}

fn params(perm: &PermutationArgs) -> PermutationParams {
    PermutationParams {
        permutations: perm.permutations,
        seed: perm.seed,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn report_global<S: GlobalStatistic>(statistic: &S, perm: &PermutationArgs) -> Result<()> {
    let pb = spinner("Running permutations...");
    let start = Instant::now();
    let summary = statistic
        .summary(&params(perm))
        .with_context(|| format!("Failed to evaluate {}", statistic.name()))?;
    pb.finish_and_clear();
    info!("{} done in {:.2?}", statistic.name(), start.elapsed());

    if perm.json {
        return print_json(&summary);
    }
    println!("{}", statistic.name());
    println!("  Statistic:   {:.6}", summary.stat);
    println!("  Expectation: {:.6}", summary.expectation);
    println!("  Variance:    {:.6}", summary.variance);
    println!("  z-score:     {:.6}", summary.z_score);
    println!("  p-value:     {:.4} ({} permutations)", summary.p, perm.permutations);
    Ok(())
}

fn report_local<S: LocalStatistic>(statistic: &S, keys: &[String], args: &LocalArgs) -> Result<()> {
    let pb = spinner("Running conditional permutations...");
    let start = Instant::now();
    let rows = statistic
        .summary(keys, &params(&args.perm))
        .with_context(|| format!("Failed to evaluate {}", statistic.name()))?;
    pb.finish_and_clear();
    info!("{} done in {:.2?}", statistic.name(), start.elapsed());

    let p: Vec<f64> = rows.iter().map(|r| r.p).collect();
    let cutoff = fdr(&p, args.fdr);
    let significant = p.iter().filter(|&&v| v <= cutoff).count();

    if args.perm.json {
        return print_json(&rows);
    }
    println!("{:<16} {:>12} {:>8} {:>6}", "key", "stat", "p", "group");
    for row in &rows {
        let group = row.group.map(|g| g.to_string()).unwrap_or_default();
        println!("{:<16} {:>12.6} {:>8.4} {:>6}", row.key, row.stat, row.p, group);
    }
    println!(
        "\nFDR cutoff at alpha {}: {:.6} ({} of {} significant)",
        args.fdr,
        cutoff,
        significant,
        rows.len()
    );
    Ok(())
}

fn read_pattern(points: &PointArgs) -> Result<PointPattern> {
    let data = read_table(&points.values, None, &[points.x.clone(), points.y.clone()])?;
    let pts = data.columns[0]
        .iter()
        .zip(&data.columns[1])
        .map(|(&x, &y)| Point::new(x, y))
        .collect();
    PointPattern::new(pts).context("Invalid point pattern")
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        // ── Global ───────────────────────────────────────────────────
        Commands::Global { statistic } => match statistic {
            GlobalCommands::Moran {
                table,
                weights,
                perm,
            } => {
                let (w, data) = build_weights(&table, &weights)?;
                let [x] = fields::<1>(&data, &table.fields)?;
                let moran = GlobalMoran::new(&w, x).context("Failed to compute Moran's I")?;
                report_global(&moran, &perm)?;
            }

            GlobalCommands::BivariateMoran {
                table,
                weights,
                perm,
            } => {
                let (w, data) = build_weights(&table, &weights)?;
                let [x, y] = fields::<2>(&data, &table.fields)?;
                let moran = GlobalBivariateMoran::new(&w, x, y)
                    .context("Failed to compute bivariate Moran's I")?;
                report_global(&moran, &perm)?;
            }
        },

        // ── Local ────────────────────────────────────────────────────
        Commands::Local { statistic } => match statistic {
            LocalCommands::Moran { args } => {
                let (w, data) = build_weights(&args.table, &args.weights)?;
                let [x] = fields::<1>(&data, &args.table.fields)?;
                let stat = LocalMoran::new(&w, x).context("Failed to compute local Moran")?;
                report_local(&stat, &data.keys, &args)?;
            }

            LocalCommands::Geary { args } => {
                let (w, data) = build_weights(&args.table, &args.weights)?;
                let [x] = fields::<1>(&data, &args.table.fields)?;
                let stat = LocalGeary::new(&w, x).context("Failed to compute local Geary")?;
                report_local(&stat, &data.keys, &args)?;
            }

            LocalCommands::GetisOrd { args, star } => {
                let (w, data) = build_weights(&args.table, &args.weights)?;
                let [x] = fields::<1>(&data, &args.table.fields)?;
                let stat =
                    LocalGetisOrd::new(&w, x, star).context("Failed to compute Getis-Ord")?;
                info!("Using G{}", if stat.star() { "*" } else { "" });
                report_local(&stat, &data.keys, &args)?;
            }

            LocalCommands::BivariateMoran { args } => {
                let (w, data) = build_weights(&args.table, &args.weights)?;
                let [x, y] = fields::<2>(&data, &args.table.fields)?;
                let stat = LocalBivariateMoran::new(&w, x, y)
                    .context("Failed to compute local bivariate Moran")?;
                report_local(&stat, &data.keys, &args)?;
            }

            LocalCommands::MultivariateGeary { args } => {
                let (w, data) = build_weights(&args.table, &args.weights)?;
                let stat = MultivariateGeary::new(&w, &data.columns)
                    .context("Failed to compute multivariate Geary")?;
                info!("{} fields", stat.m());
                report_local(&stat, &data.keys, &args)?;
            }
        },

        // ── PPA ──────────────────────────────────────────────────────
        Commands::Ppa { analysis } => match analysis {
            PpaCommands::Centrography { points } => {
                let pp = read_pattern(&points)?;
                let mean_center = pp.mean_center();
                let median_center = pp.center_median(&CenterMedianParams::default());
                let ellipse = pp.sd_ellipse().context("Failed to fit deviational ellipse")?;
                let hull = pp.convex_hull();

                if points.json {
                    print_json(&serde_json::json!({
                        "n": pp.n(),
                        "bbox": pp.bbox(),
                        "mean_center": mean_center,
                        "median": pp.median(),
                        "center_median": median_center,
                        "standard_distance": pp.standard_distance(),
                        "sd_ellipse": ellipse,
                        "convex_hull": hull,
                    }))?;
                } else {
                    let bbox = pp.bbox();
                    println!("Points: {}", pp.n());
                    println!(
                        "Bounds: ({:.6}, {:.6}) - ({:.6}, {:.6})",
                        bbox.min.x, bbox.min.y, bbox.max.x, bbox.max.y
                    );
                    println!("Mean center:       ({:.6}, {:.6})", mean_center.x, mean_center.y);
                    println!(
                        "Center median:     ({:.6}, {:.6})",
                        median_center.x, median_center.y
                    );
                    println!("Standard distance: {:.6}", pp.standard_distance());
                    println!(
                        "SD ellipse:        sx={:.6} sy={:.6} theta={:.6}",
                        ellipse.sx, ellipse.sy, ellipse.theta
                    );
                    println!("Convex hull:       {} vertices", hull.len());
                }
            }

            PpaCommands::Nn { points } => {
                let pp = read_pattern(&points)?;
                let nn = pp.nn_dist().context("Failed to compute nearest neighbors")?;
                let mean = pp.mean_nn_dist()?;
                let std = pp.stddev_nn_dist()?;
                let min = pp.min_nn_dist()?;
                let max = pp.max_nn_dist()?;

                if points.json {
                    print_json(&serde_json::json!({
                        "nn_dist": nn,
                        "mean": mean,
                        "stddev": std,
                        "min": min,
                        "max": max,
                    }))?;
                } else {
                    println!("Nearest-neighbor distances over {} points", pp.n());
                    println!("  Mean:    {:.6}", mean);
                    println!("  Std dev: {:.6}", std);
                    println!("  Min:     {:.6}", min);
                    println!("  Max:     {:.6}", max);
                }
            }

            PpaCommands::Quadrat {
                points,
                nx,
                ny,
                permutations,
                seed,
            } => {
                let pp = read_pattern(&points)?;
                let quadrat = pp
                    .quadrat(QuadratParams {
                        x_regions: nx,
                        y_regions: ny,
                    })
                    .context("Invalid quadrat grid")?;
                let pb = spinner("Simulating random patterns...");
                let p = quadrat.mc(permutations, seed)?;
                pb.finish_and_clear();

                if points.json {
                    print_json(&serde_json::json!({
                        "counts": quadrat.quadrat_counts(),
                        "df": quadrat.df(),
                        "expectation": quadrat.expectation(),
                        "chi2": quadrat.chi2(),
                        "p": p,
                    }))?;
                } else {
                    println!("Quadrat counts ({} x {}): {:?}", nx, ny, quadrat.quadrat_counts());
                    println!("  Expected per cell: {:.4}", quadrat.expectation());
                    println!("  Chi-squared:       {:.6} (df {})", quadrat.chi2(), quadrat.df());
                    println!("  p-value:           {:.4} ({} simulations)", p, permutations);
                }
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    fn table_args(path: &Path, fields: &[&str]) -> TableArgs {
        TableArgs {
            values: path.to_path_buf(),
            key: "id".into(),
            fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn weights_args() -> WeightsArgs {
        WeightsArgs {
            neighbors: None,
            x: None,
            y: None,
            method: "knn".into(),
            k: 1,
            band: None,
            alpha: 1.0,
        }
    }

    #[test]
    fn test_read_table_selects_columns() {
        let csv = write_tmp("id,a,b\nx,1.5,2\ny,3,4\n");
        let t = read_table(csv.path(), Some("id"), &["b".into(), "a".into()]).unwrap();
        assert_eq!(t.keys, vec!["x", "y"]);
        assert_eq!(t.columns, vec![vec![2.0, 4.0], vec![1.5, 3.0]]);
    }

    #[test]
    fn test_read_table_rejects_missing_column() {
        let csv = write_tmp("id,a\nx,1\n");
        assert!(read_table(csv.path(), Some("id"), &["nope".into()]).is_err());
    }

    #[test]
    fn test_read_table_rejects_text_value() {
        let csv = write_tmp("id,a\nx,abc\n");
        assert!(read_table(csv.path(), Some("id"), &["a".into()]).is_err());
    }

    #[test]
    fn test_read_table_rejects_non_finite_value() {
        for bad in ["NaN", "inf", "-inf"] {
            let csv = write_tmp(&format!("id,a\nx,1\ny,{}\n", bad));
            let err = read_table(csv.path(), Some("id"), &["a".into()]).unwrap_err();
            assert!(err.to_string().contains("Non-finite"), "{}", err);
        }
    }

    #[test]
    fn test_star_accepts_explicit_value() {
        let base = ["spatialstats", "local", "getis-ord", "--values", "v.csv", "--field", "v"];
        let star_of = |extra: &[&str]| {
            let args = base.iter().chain(extra).copied();
            match Cli::try_parse_from(args).unwrap().command {
                Commands::Local {
                    statistic: LocalCommands::GetisOrd { star, .. },
                } => star,
                _ => panic!("expected getis-ord"),
            }
        };
        assert_eq!(star_of(&[]), None);
        assert_eq!(star_of(&["--star", "true"]), Some(true));
        assert_eq!(star_of(&["--star", "false"]), Some(false));
    }

    #[test]
    fn test_neighbor_file_weights() {
        let csv = write_tmp("id,v\na,1\nb,2\nc,3\n");
        let json = write_tmp(r#"{"a": [["b", 1.0]], "b": [["a", 1.0], ["c", 1.0]], "c": [["b", 1.0]]}"#);
        let mut args = weights_args();
        args.neighbors = Some(json.path().to_path_buf());

        let (w, data) = build_weights(&table_args(csv.path(), &["v"]), &args).unwrap();
        assert_eq!(w.n(), 3);
        assert_eq!(w.weight_counts(), vec![1, 2, 1]);
        assert_eq!(data.columns[0], vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_neighbor_file_missing_key_fails() {
        let csv = write_tmp("id,v\na,1\nb,2\n");
        let json = write_tmp(r#"{"a": [["b", 1.0]]}"#);
        let mut args = weights_args();
        args.neighbors = Some(json.path().to_path_buf());
        assert!(build_weights(&table_args(csv.path(), &["v"]), &args).is_err());
    }

    #[test]
    fn test_coordinate_weights() {
        let csv = write_tmp("id,v,px,py\na,1,0,0\nb,2,1,0\nc,3,5,0\n");
        let mut args = weights_args();
        args.x = Some("px".into());
        args.y = Some("py".into());

        let (w, data) = build_weights(&table_args(csv.path(), &["v"]), &args).unwrap();
        assert_eq!(data.columns.len(), 1);
        assert_eq!(w.neighbors(&"c".to_string()).unwrap()[0].0, "b");
    }

    #[test]
    fn test_band_method_needs_band() {
        let csv = write_tmp("id,v,px,py\na,1,0,0\nb,2,1,0\n");
        let mut args = weights_args();
        args.x = Some("px".into());
        args.y = Some("py".into());
        args.method = "band".into();
        assert!(build_weights(&table_args(csv.path(), &["v"]), &args).is_err());
    }

    #[test]
    fn test_field_count_checked() {
        let t = Table {
            keys: vec!["a".into()],
            columns: vec![vec![1.0]],
        };
        assert!(fields::<2>(&t, &["v".into()]).is_err());
        assert_eq!(fields::<1>(&t, &["v".into()]).unwrap()[0], &[1.0]);
    }
}
