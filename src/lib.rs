pub mod boundary;
pub mod cdt;
pub mod clip;
pub mod config;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod preprocess;
pub mod pruning;
pub mod remap;
pub mod stats;
pub mod stitch;

pub use clip::{clip, multiclip, multiclip_parallel, process, ClipReport};
pub use config::ClipConfig;
pub use error::{ClipError, Result};
pub use geometry::{Plane, Side, Vec3};
pub use mesh::{Mesh, MeshList, TriIndex};
