//! Manifold-repair collaborator hook.
//!
//! `clip.cpp::multiclip` calls a `manifold_preprocess(c)` step on every
//! emitted fragment, but the call is commented out at the only call site
//! (the repair routine it would call into lives outside the two files this
//! crate is grounded on). This crate keeps the hook as a trait with a no-op
//! default, so a real implementation can be plugged in by a caller without
//! `multiclip`/`multiclip_parallel` needing to change.

use crate::mesh::Mesh;

/// Repairs or otherwise post-processes a single clip fragment in place.
pub trait ManifoldPreprocessor {
    fn process(&self, mesh: &mut Mesh);
}

/// The default: does nothing. Non-manifold repair is explicitly out of
/// scope for this crate's core (see Non-goals).
pub struct NoopPreprocessor;

impl ManifoldPreprocessor for NoopPreprocessor {
    fn process(&self, _mesh: &mut Mesh) {}
}
