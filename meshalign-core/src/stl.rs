/// STL reader for binary and ASCII files, and a binary writer
use nalgebra::Point3;
use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{multispace0, multispace1},
    multi::many0,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use std::io::Write;

use crate::error::{Error, Result};
use crate::geometry::Mesh;

const HEADER_SIZE: usize = 80;
const TRIANGLE_SIZE: usize = 50;

type Triangle = [Point3<f64>; 3];

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh> {
    if data.len() < HEADER_SIZE + 4 {
        return Err(Error::parse(0, "file too small to be a valid STL"));
    }

    // Skip 80-byte header
    let data = &data[HEADER_SIZE..];

    let triangle_count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let body = &data[4..];

    let mut triangles = Vec::with_capacity((triangle_count as usize).min(body.len() / TRIANGLE_SIZE));
    for record in body.chunks_exact(TRIANGLE_SIZE).take(triangle_count as usize) {
        // Normal occupies bytes 0..12; the 2-byte attribute count trails the vertices
        triangles.push([
            read_point(&record[12..24]),
            read_point(&record[24..36]),
            read_point(&record[36..48]),
        ]);
    }

    if triangles.len() < triangle_count as usize {
        return Err(Error::UnexpectedEof {
            expected: triangle_count,
            got: triangles.len() as u32,
        });
    }

    Ok(Mesh::from_triangles(&triangles))
}

fn read_point(buf: &[u8]) -> Point3<f64> {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Point3::new(f64::from(x), f64::from(y), f64::from(z))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<Mesh> {
    match parse_ascii_stl_impl(input) {
        Ok((_, triangles)) => Ok(Mesh::from_triangles(&triangles)),
        Err(e) => Err(Error::parse(0, format!("failed to parse ASCII STL: {e:?}"))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, Vec<Triangle>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    // Optional name runs to the end of the line
    let (input, _) = take_till(|c: char| c == '\n' || c == '\r')(input)?;
    let (input, triangles) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;

    Ok((input, triangles))
}

fn parse_facet(input: &str) -> IResult<&str, Triangle> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, _normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, v1) = parse_vertex(input)?;
    let (input, v2) = parse_vertex(input)?;
    let (input, v3) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, [v1, v2, v3]))
}

fn parse_vertex(input: &str) -> IResult<&str, Point3<f64>> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    let (input, (x, y, z)) = parse_vector3(input)?;
    Ok((input, Point3::new(f64::from(x), f64::from(y), f64::from(z))))
}

fn parse_vector3(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<Mesh> {
    // Binary files may also open with "solid", so fall back when ASCII fails
    let start = data
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(data.len());
    if data[start..].starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

/// Write a binary STL with computed face normals
pub fn write_binary_stl<W: Write>(mesh: &Mesh, mut writer: W) -> Result<()> {
    let mut header = [b' '; HEADER_SIZE];
    let text = b"binary STL written by meshalign";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    writer.write_all(&(mesh.faces.len() as u32).to_le_bytes())?;

    for face in 0..mesh.faces.len() {
        let normal = mesh.face_normal(face);
        write_f32_triple(&mut writer, normal.x, normal.y, normal.z)?;
        for vertex in mesh.triangle(face) {
            write_f32_triple(&mut writer, vertex.x, vertex.y, vertex.z)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    writer.flush()?;
    Ok(())
}

fn write_f32_triple<W: Write>(writer: &mut W, x: f64, y: f64, z: f64) -> Result<()> {
    writer.write_all(&(x as f32).to_le_bytes())?;
    writer.write_all(&(y as f32).to_le_bytes())?;
    writer.write_all(&(z as f32).to_le_bytes())?;
    Ok(())
}
