/// meshalign core library - geometry, mesh formats and pose normalization
///
/// This library holds everything the alignment pipeline needs apart from the
/// terminal front end: OBJ/STL codecs, the vehicle config, transformation
/// matrices, the alignment steps and the camera used by the viewer.

pub mod align;
pub mod config;
pub mod error;
pub mod geometry;
pub mod io;
pub mod obj;
pub mod pipeline;
pub mod projection;
pub mod stl;
pub mod transform;

// Re-export commonly used types
pub use align::Dimensions;
pub use config::{AlignConfig, RotationSetting, VehicleEntry};
pub use error::{Error, Result};
pub use geometry::{Aabb, Geometry, Mesh, Scene};
pub use io::{load_mesh, load_scene, save_mesh, MeshFormat};
pub use pipeline::{AlignJob, AlignedMesh};
pub use projection::{Camera, ProjectionMode};
pub use transform::{Rotation, RotationState, Transform};
