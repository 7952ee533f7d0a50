use std::path::PathBuf;

use clap::Parser;

/// Numeric tolerances governing plane-side classification and point
/// coincidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Signed-distance threshold below which a point is treated as lying
    /// on the cutting plane.
    pub eps_side: f64,
    /// Distance threshold below which two points are treated as the same
    /// vertex (used when collapsing degenerate cap slivers).
    pub eps_point: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            eps_side: 1e-6,
            eps_point: 1e-6,
        }
    }
}

/// Options governing the multi-plane driver and its optional collaborators.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipConfig {
    pub tolerances: Tolerances,
    /// Run `pruning::remove_outlier_triangles` on each cap before stitching.
    /// Disabled by default: the original leaves this call commented out,
    /// and enabling it changes which triangles survive a multi-loop cap.
    pub prune_outliers: bool,
    /// Use the `rayon`-backed parallel multi-plane driver.
    pub parallel: bool,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            prune_outliers: false,
            parallel: false,
        }
    }
}

/// CLI argument definition for the demo binary (clap derive), mirroring the
/// `CliArgs` → config conversion pattern used elsewhere in the pipeline.
#[derive(Parser, Debug)]
#[command(
    name = "mesh-clip",
    about = "Plane-clip a triangle mesh and write out the resulting fragments",
    version
)]
pub struct CliArgs {
    /// Input mesh (OBJ)
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Output directory for fragment OBJ files
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// A cut point as "x,y,z"; three consecutive occurrences define one
    /// plane, per the default cut_points→planes conversion.
    #[arg(long = "cut-point", value_parser = parse_point)]
    pub cut_points: Vec<[f64; 3]>,

    /// Plane-side classification tolerance
    #[arg(long, default_value_t = 1e-6)]
    pub eps_side: f64,

    /// Point-coincidence tolerance
    #[arg(long, default_value_t = 1e-6)]
    pub eps_point: f64,

    /// Remove small outlier triangles from each cap before stitching
    #[arg(long)]
    pub prune_outliers: bool,

    /// Use the parallel multi-plane driver
    #[arg(long)]
    pub parallel: bool,

    /// Optional JSON-lines stats file (one record per plane)
    #[arg(long)]
    pub stats_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

fn parse_point(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("expected \"x,y,z\", got \"{s}\""));
    }
    let mut out = [0.0; 3];
    for (i, p) in parts.iter().enumerate() {
        out[i] = p
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate \"{p}\": {e}"))?;
    }
    Ok(out)
}

impl From<&CliArgs> for ClipConfig {
    fn from(args: &CliArgs) -> Self {
        ClipConfig {
            tolerances: Tolerances {
                eps_side: args.eps_side,
                eps_point: args.eps_point,
            },
            prune_outliers: args.prune_outliers,
            parallel: args.parallel,
        }
    }
}
