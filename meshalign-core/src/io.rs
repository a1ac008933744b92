/// Format dispatch for loading and exporting meshes
use log::{debug, info, warn};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::error::{Error, Result};
use crate::geometry::{Mesh, Scene};
use crate::{obj, stl};

/// Mesh file formats understood by the loader and exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Obj,
    Stl,
}

impl MeshFormat {
    /// Pick a format from the file extension, ignoring case
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        match extension.as_str() {
            "obj" => Ok(Self::Obj),
            "stl" => Ok(Self::Stl),
            _ => Err(Error::UnknownFormat { extension }),
        }
    }
}

/// Load a file as a scene; STL files always yield a single geometry
pub fn load_scene(path: &Path) -> Result<Scene> {
    let format = MeshFormat::from_path(path)?;
    let data = fs::read(path).map_err(|e| Error::from_io(e, path))?;
    debug!("Read {} bytes from {}", data.len(), path.display());

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    match format {
        MeshFormat::Obj => {
            let text = String::from_utf8_lossy(&data);
            obj::parse_obj(&text)
        }
        MeshFormat::Stl => Ok(Scene::single(name, stl::parse_stl(&data)?)),
    }
}

/// Load a file and merge every sub-mesh into one mesh
pub fn load_mesh(path: &Path) -> Result<Mesh> {
    let scene = load_scene(path)?;
    info!("Loaded {} with {} geometries", path.display(), scene.len());

    if scene.len() > 1 {
        warn!(
            "Obtained {} meshes from the scene; attaching them into a single mesh",
            scene.len()
        );
        for geometry in &scene.geometries {
            debug!(
                "  {:?}: {} vertices, {} faces",
                geometry.name,
                geometry.mesh.vertices.len(),
                geometry.mesh.faces.len()
            );
        }
    }

    let mesh = scene.merge();
    if mesh.faces.is_empty() {
        warn!("{} contains no faces", path.display());
    }
    Ok(mesh)
}

/// Export a mesh, choosing the writer from the file extension
pub fn save_mesh(mesh: &Mesh, path: &Path) -> Result<()> {
    let format = MeshFormat::from_path(path)?;
    let writer = BufWriter::new(File::create(path)?);

    match format {
        MeshFormat::Obj => {
            let name = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            obj::write_obj(mesh, &name, writer)
        }
        MeshFormat::Stl => stl::write_binary_stl(mesh, writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(MeshFormat::from_path(Path::new("car.obj")).unwrap(), MeshFormat::Obj);
        assert_eq!(MeshFormat::from_path(Path::new("car.STL")).unwrap(), MeshFormat::Stl);
        assert!(matches!(
            MeshFormat::from_path(Path::new("car.ply")),
            Err(Error::UnknownFormat { extension }) if extension == "ply"
        ));
        assert!(MeshFormat::from_path(Path::new("car")).is_err());
    }

    #[test]
    fn test_missing_file() {
        let path = PathBuf::from("definitely/not/here.obj");
        match load_mesh(&path) {
            Err(Error::FileNotFound { path: missing }) => assert_eq!(missing, path),
            other => panic!("expected FileNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_save_and_reload_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let cube = Mesh::cube(3.0);

        for file in ["cube.obj", "cube.stl"] {
            let path = dir.path().join(file);
            save_mesh(&cube, &path).unwrap();

            let loaded = load_mesh(&path).unwrap();
            assert_eq!(loaded.faces.len(), cube.faces.len());
            assert_eq!(loaded.vertices.len(), cube.vertices.len());
            assert_eq!(loaded.bounds(), cube.bounds());
        }
    }

    #[test]
    fn test_multi_object_obj_merged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parts.obj");
        fs::write(
            &path,
            "o a\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\no b\nv 0 0 1\nv 1 0 1\nv 0 1 1\nf 4 5 6\n",
        )
        .unwrap();

        let scene = load_scene(&path).unwrap();
        assert_eq!(scene.len(), 2);

        let mesh = load_mesh(&path).unwrap();
        assert_eq!(mesh.faces, vec![[0, 1, 2], [3, 4, 5]]);
    }
}
