use anyhow::Context;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use mesh_clip_core::clip::process;
use mesh_clip_core::config::{CliArgs, ClipConfig};
use mesh_clip_core::geometry::Vec3;
use mesh_clip_core::stats::JsonlStatsSink;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let filter = if args.verbose {
        EnvFilter::new("mesh_clip_core=debug")
    } else {
        EnvFilter::new("mesh_clip_core=info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ClipConfig::from(&args);

    let mesh = load_obj(&args.input).context("failed to load input mesh")?;
    let cut_points: Vec<Vec3> = args
        .cut_points
        .iter()
        .map(|p| Vec3::new(p[0], p[1], p[2]))
        .collect();

    std::fs::create_dir_all(&args.output).context("failed to create output directory")?;

    let mut sink = args
        .stats_file
        .as_ref()
        .map(|path| JsonlStatsSink::create(path))
        .transpose()
        .context("failed to open stats file")?;

    let fragments = process(
        &mesh,
        &cut_points,
        &config,
        sink.as_mut().map(|s| s as &mut dyn mesh_clip_core::stats::StatsSink),
    );

    for (i, fragment) in fragments.iter().enumerate() {
        let path = args.output.join(format!("fragment_{i:03}.obj"));
        write_obj(&path, fragment).with_context(|| format!("failed to write {}", path.display()))?;
    }

    println!("{} fragments written to {}", fragments.len(), args.output.display());
    Ok(())
}

fn load_obj(path: &std::path::Path) -> anyhow::Result<mesh_clip_core::Mesh> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .map_err(|e| {
        error!(error = %e, "obj load failed");
        mesh_clip_core::ClipError::Ingestion(e.to_string())
    })?;

    let mut vertices = Vec::new();
    let mut triangles = Vec::new();
    let mut offset = 0u32;
    for model in models {
        let mesh = model.mesh;
        for v in mesh.positions.chunks_exact(3) {
            vertices.push(Vec3::new(v[0] as f64, v[1] as f64, v[2] as f64));
        }
        for idx in mesh.indices.chunks_exact(3) {
            triangles.push([idx[0] + offset, idx[1] + offset, idx[2] + offset]);
        }
        offset = vertices.len() as u32;
    }
    Ok(mesh_clip_core::Mesh::new(vertices, triangles))
}

fn write_obj(path: &std::path::Path, mesh: &mesh_clip_core::Mesh) -> anyhow::Result<()> {
    use std::io::Write;
    let mut out = std::io::BufWriter::new(std::fs::File::create(path)?);
    for v in &mesh.vertices {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for tri in &mesh.triangles {
        writeln!(out, "f {} {} {}", tri[0] + 1, tri[1] + 1, tri[2] + 1)?;
    }
    Ok(())
}
