/// Wavefront OBJ reader and writer
///
/// Only geometry is kept: `v` positions and `f` faces, split into sub-meshes
/// at every `o` or `g` statement. Texture coordinates, normals, materials and
/// smoothing groups are skipped.
use nalgebra::Point3;
use nom::{
    bytes::complete::take_while,
    character::complete::{i64 as index, space0, space1},
    combinator::eof,
    multi::{many_m_n, separated_list1},
    number::complete::double,
    sequence::{preceded, terminated, tuple},
    IResult,
};
use std::io::Write;

use crate::error::{Error, Result};
use crate::geometry::{Geometry, Mesh, Scene};

/// Faces of one `o`/`g` block, indexing the file-wide vertex list
struct Group {
    name: String,
    faces: Vec<[usize; 3]>,
}

impl Group {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            faces: Vec::new(),
        }
    }

    /// Gather the referenced vertices into a standalone mesh, keeping file order
    fn into_geometry(self, positions: &[Point3<f64>]) -> Geometry {
        let mut used: Vec<usize> = self.faces.iter().flatten().copied().collect();
        used.sort_unstable();
        used.dedup();

        let local = |global: usize| used.binary_search(&global).unwrap_or_default();
        let faces = self
            .faces
            .iter()
            .map(|&[a, b, c]| [local(a), local(b), local(c)])
            .collect();
        let vertices = used.iter().map(|&global| positions[global]).collect();

        Geometry {
            name: self.name,
            mesh: Mesh { vertices, faces },
        }
    }
}

/// Parse OBJ text into a scene with one geometry per non-empty `o`/`g` block
pub fn parse_obj(input: &str) -> Result<Scene> {
    let mut positions: Vec<Point3<f64>> = Vec::new();
    let mut groups = vec![Group::new("")];

    for (i, raw) in input.lines().enumerate() {
        let line_no = i + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();

        let Some(keyword) = line.split_whitespace().next() else {
            continue;
        };
        let body = line[keyword.len()..].trim_start();

        match keyword {
            "v" => {
                let (_, point) = parse_position(body)
                    .map_err(|e| Error::parse(line_no, format!("bad vertex {body:?}: {e}")))?;
                positions.push(point);
            }
            "f" => {
                let (_, corners) = parse_face(body)
                    .map_err(|e| Error::parse(line_no, format!("bad face {body:?}: {e}")))?;
                if corners.len() < 3 {
                    return Err(Error::parse(
                        line_no,
                        format!("face needs at least 3 corners, got {}", corners.len()),
                    ));
                }

                let resolved = corners
                    .iter()
                    .map(|&c| resolve_index(c, positions.len()).ok_or(c))
                    .collect::<std::result::Result<Vec<_>, _>>()
                    .map_err(|c| {
                        Error::parse(
                            line_no,
                            format!("vertex index {c} out of range ({} vertices)", positions.len()),
                        )
                    })?;

                if let Some(group) = groups.last_mut() {
                    // Fan-triangulate polygons around the first corner
                    for pair in resolved[1..].windows(2) {
                        group.faces.push([resolved[0], pair[0], pair[1]]);
                    }
                }
            }
            "o" | "g" => groups.push(Group::new(body)),
            _ => {}
        }
    }

    let geometries = groups
        .into_iter()
        .filter(|group| !group.faces.is_empty())
        .map(|group| group.into_geometry(&positions))
        .collect();

    Ok(Scene { geometries })
}

/// 1-based indices count forward, negative ones back from the latest vertex
fn resolve_index(index: i64, vertex_count: usize) -> Option<usize> {
    let resolved = if index > 0 {
        usize::try_from(index - 1).ok()?
    } else if index < 0 {
        vertex_count.checked_sub(usize::try_from(index.unsigned_abs()).ok()?)?
    } else {
        return None;
    };
    (resolved < vertex_count).then_some(resolved)
}

fn parse_position(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, (x, _, y, _, z)) = tuple((double, space1, double, space1, double))(input)?;
    // Trailing weight or `r g b [a]` vertex colors are ignored
    let (input, _) = many_m_n(0, 4, preceded(space1, double))(input)?;
    let (input, _) = terminated(space0, eof)(input)?;
    Ok((input, Point3::new(x, y, z)))
}

fn parse_face(input: &str) -> IResult<&str, Vec<i64>> {
    let (input, corners) = separated_list1(space1, parse_corner)(input)?;
    let (input, _) = terminated(space0, eof)(input)?;
    Ok((input, corners))
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`; only the position index is kept
fn parse_corner(input: &str) -> IResult<&str, i64> {
    terminated(
        index,
        take_while(|c: char| c == '/' || c == '-' || c.is_ascii_digit()),
    )(input)
}

/// Write a mesh as OBJ text with 1-based face indices
pub fn write_obj<W: Write>(mesh: &Mesh, name: &str, mut writer: W) -> Result<()> {
    writeln!(writer, "# written by meshalign")?;
    writeln!(
        writer,
        "# {} vertices, {} faces",
        mesh.vertices.len(),
        mesh.faces.len()
    )?;
    if !name.is_empty() {
        writeln!(writer, "o {name}")?;
    }

    for v in &mesh.vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for [a, b, c] in &mesh.faces {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_OBJECTS: &str = "\
# two separate parts
mtllib car.mtl
o body
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vn 0 0 1
usemtl paint
f 1/1/1 2/1/1 3/1/1 4/1/1
o wheel
v 5 5 5
v 6 5 5
v 5 6 5
s off
f -3//1 -2//1 -1//1
";

    #[test]
    fn test_parse_objects_into_scene() {
        let scene = parse_obj(TWO_OBJECTS).unwrap();
        assert_eq!(scene.len(), 2);

        let body = &scene.geometries[0];
        assert_eq!(body.name, "body");
        assert_eq!(body.mesh.vertices.len(), 4);
        assert_eq!(body.mesh.faces, vec![[0, 1, 2], [0, 2, 3]]);

        let wheel = &scene.geometries[1];
        assert_eq!(wheel.name, "wheel");
        assert_eq!(wheel.mesh.vertices[0], Point3::new(5.0, 5.0, 5.0));
        assert_eq!(wheel.mesh.faces, vec![[0, 1, 2]]);
    }

    #[test]
    fn test_merged_scene_counts() {
        let mesh = parse_obj(TWO_OBJECTS).unwrap().merge();
        assert_eq!(mesh.vertices.len(), 7);
        assert_eq!(mesh.faces.len(), 3);
        assert_eq!(mesh.faces[2], [4, 5, 6]);
    }

    #[test]
    fn test_faces_before_any_group_use_default() {
        let scene = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0 1.0\nf 1 2 3\n").unwrap();
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.geometries[0].name, "");
    }

    #[test]
    fn test_empty_groups_dropped() {
        let scene = parse_obj("g empty\no part\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.geometries[0].name, "part");
    }

    #[test]
    fn test_zero_index_rejected() {
        let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 4, .. }));
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        assert!(parse_obj("v 0 0 0\nf 1 2 3\n").is_err());
        assert!(parse_obj("v 0 0 0\nf -1 -2 -3\n").is_err());
    }

    #[test]
    fn test_two_corner_face_rejected() {
        assert!(parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n").is_err());
    }

    #[test]
    fn test_malformed_vertex_rejected() {
        let err = parse_obj("v 0 zero 0\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn test_vertex_colors_ignored() {
        let scene = parse_obj(
            "v 0 0 0 1 0 0\nv 1 0 0 0 1 0\nv 0 1 0 0 0 1 0.5\nv 0 0 1 1.0\nf 1 2 3\nf 1 2 4\n",
        )
        .unwrap();
        let mesh = scene.merge();
        assert_eq!(mesh.faces.len(), 2);
        assert_eq!(mesh.vertices[1], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[3], Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_too_many_vertex_components_rejected() {
        assert!(parse_obj("v 0 0 0 1 2 3 4 5\n").is_err());
    }

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(1, 3), Some(0));
        assert_eq!(resolve_index(3, 3), Some(2));
        assert_eq!(resolve_index(4, 3), None);
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(-3, 3), Some(0));
        assert_eq!(resolve_index(-4, 3), None);
        assert_eq!(resolve_index(0, 3), None);
    }

    #[test]
    fn test_writer_output_parses() {
        let cube = Mesh::cube(2.0);
        let mut data = Vec::new();
        write_obj(&cube, "cube", &mut data).unwrap();

        let text = String::from_utf8(data).unwrap();
        assert!(text.contains("o cube"));

        let scene = parse_obj(&text).unwrap();
        assert_eq!(scene.geometries[0].name, "cube");
        assert_eq!(scene.merge(), cube);
    }
}
