use criterion::{criterion_group, criterion_main, Criterion};

use mesh_clip_core::clip::clip;
use mesh_clip_core::{Mesh, Plane, Vec3};

/// Generate an `n x n x n` grid mesh spanning `[0, 1]^3`, triangulated on
/// each XY layer, matching the `make_3d_grid` generator used elsewhere in
/// the pack but built directly into `Mesh` instead of an attribute-buffer
/// `IndexedMesh`.
fn make_3d_grid(n: usize) -> Mesh {
    let verts_per_side = n + 1;
    let mut vertices = Vec::with_capacity(verts_per_side.pow(3));
    for z in 0..verts_per_side {
        for y in 0..verts_per_side {
            for x in 0..verts_per_side {
                vertices.push(Vec3::new(
                    x as f64 / n as f64,
                    y as f64 / n as f64,
                    z as f64 / n as f64,
                ));
            }
        }
    }

    let v = |x: usize, y: usize, z: usize| -> u32 {
        (z * verts_per_side * verts_per_side + y * verts_per_side + x) as u32
    };
    let mut triangles = Vec::new();
    for z in 0..verts_per_side {
        for y in 0..n {
            for x in 0..n {
                let tl = v(x, y, z);
                let tr = v(x + 1, y, z);
                let bl = v(x, y + 1, z);
                let br = v(x + 1, y + 1, z);
                triangles.push([tl, bl, tr]);
                triangles.push([tr, bl, br]);
            }
        }
    }

    Mesh::new(vertices, triangles)
}

fn bench_clip_mid_plane(c: &mut Criterion) {
    let mesh = make_3d_grid(35);
    let plane = Plane::new(Vec3::new(0.0, 0.0, 0.5), Vec3::Z);

    c.bench_function("clip_grid_88k_mid_plane", |b| {
        b.iter(|| clip(&mesh, &plane));
    });
}

fn bench_clip_grazing_plane(c: &mut Criterion) {
    let mesh = make_3d_grid(35);
    // Plane passing through a layer of existing vertices rather than
    // bisecting edges, exercising the all-on-plane / partial-on-plane path.
    let plane = Plane::new(Vec3::new(0.0, 0.0, 10.0 / 35.0), Vec3::Z);

    c.bench_function("clip_grid_88k_grazing_plane", |b| {
        b.iter(|| clip(&mesh, &plane));
    });
}

criterion_group!(benches, bench_clip_mid_plane, bench_clip_grazing_plane);
criterion_main!(benches);
