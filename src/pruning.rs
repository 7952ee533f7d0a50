//! Outlier-triangle removal for a triangulated cap.
//!
//! Grounded on the original's `RemoveOutlierTriangles`, which is present in
//! `clip.cpp` but never actually invoked (the call at the `clip()` site is
//! commented out). It performs a BFS flood fill over face adjacency starting
//! from the triangle nearest the polygon's centroid, then drops any
//! triangle the flood never reached. Kept here as a real, tested, opt-in
//! routine (see `ClipConfig::prune_outliers`) rather than dead code, since
//! whether it should run by default is an open question the original never
//! settled.

use std::collections::{HashSet, VecDeque};

/// Remove triangles not reachable, via shared-edge adjacency, from the
/// triangle closest to the polygon centroid. `triangles` index into `points`.
pub fn remove_outlier_triangles(points: &[[f64; 2]], triangles: &[[u32; 3]]) -> Vec<[u32; 3]> {
    if triangles.is_empty() {
        return Vec::new();
    }

    let centroid = {
        let (mut sx, mut sy) = (0.0, 0.0);
        for p in points {
            sx += p[0];
            sy += p[1];
        }
        let n = points.len().max(1) as f64;
        [sx / n, sy / n]
    };

    let seed = triangles
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            dist_to_centroid(points, **a, centroid)
                .partial_cmp(&dist_to_centroid(points, **b, centroid))
                .unwrap()
        })
        .map(|(i, _)| i)
        .expect("triangles is non-empty");

    let adjacency = build_adjacency(triangles);

    let mut visited = HashSet::new();
    let mut queue = VecDeque::new();
    visited.insert(seed);
    queue.push_back(seed);
    while let Some(i) = queue.pop_front() {
        for &n in &adjacency[i] {
            if visited.insert(n) {
                queue.push_back(n);
            }
        }
    }

    triangles
        .iter()
        .enumerate()
        .filter(|(i, _)| visited.contains(i))
        .map(|(_, t)| *t)
        .collect()
}

fn dist_to_centroid(points: &[[f64; 2]], tri: [u32; 3], centroid: [f64; 2]) -> f64 {
    let [a, b, c] = tri.map(|i| points[i as usize]);
    let cx = (a[0] + b[0] + c[0]) / 3.0;
    let cy = (a[1] + b[1] + c[1]) / 3.0;
    ((cx - centroid[0]).powi(2) + (cy - centroid[1]).powi(2)).sqrt()
}

fn build_adjacency(triangles: &[[u32; 3]]) -> Vec<Vec<usize>> {
    let mut edge_owner: std::collections::HashMap<(u32, u32), Vec<usize>> =
        std::collections::HashMap::new();
    for (i, t) in triangles.iter().enumerate() {
        for &(a, b) in &[(t[0], t[1]), (t[1], t[2]), (t[2], t[0])] {
            let key = if a < b { (a, b) } else { (b, a) };
            edge_owner.entry(key).or_default().push(i);
        }
    }
    let mut adjacency = vec![Vec::new(); triangles.len()];
    for owners in edge_owner.values() {
        if owners.len() == 2 {
            adjacency[owners[0]].push(owners[1]);
            adjacency[owners[1]].push(owners[0]);
        }
    }
    adjacency
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_connected_component_drops_isolated_triangle() {
        let points = vec![
            [0.0, 0.0],
            [1.0, 0.0],
            [1.0, 1.0],
            [0.0, 1.0],
            [10.0, 10.0],
            [11.0, 10.0],
            [10.0, 11.0],
        ];
        let triangles = vec![[0, 1, 2], [0, 2, 3], [4, 5, 6]];
        let kept = remove_outlier_triangles(&points, &triangles);
        assert_eq!(kept.len(), 2);
        assert!(kept.contains(&[0, 1, 2]));
        assert!(kept.contains(&[0, 2, 3]));
    }

    #[test]
    fn empty_input() {
        assert!(remove_outlier_triangles(&[], &[]).is_empty());
    }
}
