// src/mesh/vtk.rs
//! Restricted legacy VTK (ASCII) mesh reader and writer
//!
//! Supports the subset of the legacy VTK polydata format needed to exchange
//! triangle meshes: a `POINTS` section and a `POLYGONS` section of 3-vertex
//! cells. On write, optional scalar arrays may be attached per vertex
//! (`POINT_DATA`) or per triangle (`CELL_DATA`). Binary VTK files and
//! non-triangular cells are rejected.

use crate::mesh::TriangleMesh;
use crate::utils::errors::{EngineError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::debug;

const HEADER_PREFIX: &str = "# vtk DataFile Version";

/// Load a triangle mesh from a legacy ASCII VTK file.
///
/// Every vertex coordinate is multiplied by `scaling`, e.g. `1e-3` to read a
/// mesh authored in millimetres as metres. The file's title line becomes the
/// mesh name.
pub fn load_vtk(path: impl AsRef<Path>, scaling: f64) -> Result<TriangleMesh> {
    let path = path.as_ref();
    debug!("Loading VTK mesh from {:?} (scaling {})", path, scaling);

    let file = fs::File::open(path)?;
    let mut lines = BufReader::new(file).lines();

    let header = next_line(&mut lines)?;
    if !header.starts_with(HEADER_PREFIX) {
        return Err(format_err("missing VTK DataFile header"));
    }

    let title = next_line(&mut lines)?;
    let name = (!title.is_empty()).then_some(title);

    match next_line(&mut lines)?.as_str() {
        "ASCII" => {}
        "BINARY" => return Err(format_err("binary VTK files are not supported")),
        other => return Err(format_err(&format!("unrecognised encoding '{}'", other))),
    }

    if next_line(&mut lines)? != "DATASET POLYDATA" {
        return Err(format_err("only POLYDATA datasets are supported"));
    }

    let vertices = read_vertices(&mut lines, scaling)?;
    let triangles = read_triangles(&mut lines)?;

    debug!(
        "Loaded VTK mesh: {} vertices, {} triangles",
        vertices.len(),
        triangles.len()
    );
    TriangleMesh::new(name, vertices, triangles)
}

/// Write a triangle mesh to a legacy ASCII VTK file.
///
/// `vertex_data` and `triangle_data` are optional scalar arrays keyed by
/// variable name; each array's length must match the vertex or triangle count
/// of the mesh. Keys are emitted in sorted order so output is deterministic.
pub fn write_vtk(
    mesh: &TriangleMesh,
    path: impl AsRef<Path>,
    vertex_data: Option<&BTreeMap<String, Vec<f64>>>,
    triangle_data: Option<&BTreeMap<String, Vec<f64>>>,
) -> Result<()> {
    let path = path.as_ref();
    debug!(
        "Writing VTK mesh to {:?}: {} vertices, {} triangles",
        path,
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    if let Some(data) = vertex_data {
        validate_data(data, mesh.vertex_count(), "vertex")?;
    }
    if let Some(data) = triangle_data {
        validate_data(data, mesh.triangle_count(), "triangle")?;
    }

    let file = fs::File::create(path)?;
    let mut out = BufWriter::new(file);

    writeln!(out, "{} 4.2", HEADER_PREFIX)?;
    writeln!(out, "{}", mesh.name().unwrap_or("vtk output"))?;
    writeln!(out, "ASCII")?;
    writeln!(out, "DATASET POLYDATA")?;

    writeln!(out, "POINTS {} float", mesh.vertex_count())?;
    for vertex in mesh.vertices() {
        writeln!(out, "{} {} {}", vertex[0], vertex[1], vertex[2])?;
    }

    // Each polygon row carries its arity plus three indices.
    writeln!(
        out,
        "POLYGONS {} {}",
        mesh.triangle_count(),
        4 * mesh.triangle_count()
    )?;
    for triangle in mesh.triangles() {
        writeln!(out, "3 {} {} {}", triangle[0], triangle[1], triangle[2])?;
    }

    if let Some(data) = vertex_data {
        writeln!(out, "POINT_DATA {}", mesh.vertex_count())?;
        write_scalar_sections(&mut out, data)?;
    }
    if let Some(data) = triangle_data {
        writeln!(out, "CELL_DATA {}", mesh.triangle_count())?;
        write_scalar_sections(&mut out, data)?;
    }

    out.flush()?;
    Ok(())
}

fn next_line<I>(lines: &mut I) -> Result<String>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    match lines.next() {
        Some(line) => Ok(line?.trim().to_string()),
        None => Err(format_err("unexpected end of file")),
    }
}

fn read_vertices<I>(lines: &mut I, scaling: f64) -> Result<Vec<[f64; 3]>>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    let declaration = next_line(&mut *lines)?;
    let mut tokens = declaration.split_whitespace();
    if tokens.next() != Some("POINTS") {
        return Err(format_err("expected POINTS declaration"));
    }
    let count: usize = tokens
        .next()
        .and_then(|token| token.parse().ok())
        .ok_or_else(|| format_err("invalid POINTS count"))?;

    // Coordinates may be wrapped across lines at any position.
    let mut coordinates = Vec::with_capacity(count * 3);
    while coordinates.len() < count * 3 {
        let line = next_line(&mut *lines)?;
        for token in line.split_whitespace() {
            let value: f64 = token
                .parse()
                .map_err(|_| format_err(&format!("invalid vertex coordinate '{}'", token)))?;
            coordinates.push(value * scaling);
        }
    }
    if coordinates.len() != count * 3 {
        return Err(format_err(
            "vertex coordinate count does not match POINTS declaration",
        ));
    }

    Ok(coordinates
        .chunks_exact(3)
        .map(|chunk| [chunk[0], chunk[1], chunk[2]])
        .collect())
}

fn read_triangles<I>(lines: &mut I) -> Result<Vec<[u32; 3]>>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    // Skip metadata sections until the POLYGONS declaration.
    let count = loop {
        let line = next_line(&mut *lines)?;
        if let Some(rest) = line.strip_prefix("POLYGONS") {
            let count: usize = rest
                .split_whitespace()
                .next()
                .and_then(|token| token.parse().ok())
                .ok_or_else(|| format_err("invalid POLYGONS count"))?;
            break count;
        }
    };

    let mut triangles = Vec::with_capacity(count);
    while triangles.len() < count {
        let line = next_line(&mut *lines)?;
        if line.is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let arity: usize = tokens
            .next()
            .and_then(|token| token.parse().ok())
            .ok_or_else(|| format_err("invalid polygon row"))?;
        if arity != 3 {
            return Err(format_err("only triangular cells are supported"));
        }

        let mut corners = [0u32; 3];
        for corner in &mut corners {
            *corner = tokens
                .next()
                .and_then(|token| token.parse().ok())
                .ok_or_else(|| format_err("invalid triangle index"))?;
        }
        triangles.push(corners);
    }

    Ok(triangles)
}

fn write_scalar_sections<W: Write>(out: &mut W, data: &BTreeMap<String, Vec<f64>>) -> Result<()> {
    for (variable, values) in data {
        writeln!(out, "SCALARS {} float 1", variable.replace(' ', "_"))?;
        writeln!(out, "LOOKUP_TABLE default")?;
        for value in values {
            writeln!(out, "{}", value)?;
        }
    }
    Ok(())
}

fn validate_data(data: &BTreeMap<String, Vec<f64>>, expected: usize, kind: &str) -> Result<()> {
    for (variable, values) in data {
        if values.len() != expected {
            return Err(EngineError::MeshData(format!(
                "{} data '{}' has {} values, expected {}",
                kind,
                variable,
                values.len(),
                expected
            )));
        }
    }
    Ok(())
}

fn format_err(message: &str) -> EngineError {
    EngineError::MeshFormat(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn unit_square() -> TriangleMesh {
        let vertices = vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ];
        TriangleMesh::new(
            Some("square".to_string()),
            vertices,
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_write_then_load_preserves_geometry_under_scaling() {
        let mesh = unit_square();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.vtk");

        write_vtk(&mesh, &path, None, None).unwrap();
        let loaded = load_vtk(&path, 2.0).unwrap();

        assert_eq!(loaded.name(), Some("square"));
        assert_eq!(loaded.triangles(), mesh.triangles());
        assert_eq!(loaded.vertex_count(), mesh.vertex_count());
        for (loaded, original) in loaded.vertices().iter().zip(mesh.vertices()) {
            for axis in 0..3 {
                assert!((loaded[axis] - 2.0 * original[axis]).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_loader_accepts_wrapped_coordinates_and_metadata() {
        let file = write_fixture(
            "# vtk DataFile Version 4.2\n\
             wrapped\n\
             ASCII\n\
             DATASET POLYDATA\n\
             POINTS 2 float\n\
             0.0 0.0 0.0 1.0\n\
             1.0 1.0\n\
             METADATA\n\
             INFORMATION 0\n\
             POLYGONS 0 0\n",
        );

        let mesh = load_vtk(file.path(), 1.0).unwrap();
        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.vertices()[1], [1.0, 1.0, 1.0]);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_loader_rejects_missing_header() {
        let file = write_fixture("not a vtk file\n");
        let result = load_vtk(file.path(), 1.0);
        assert!(matches!(result, Err(EngineError::MeshFormat(_))));
    }

    #[test]
    fn test_loader_rejects_binary_files() {
        let file = write_fixture(
            "# vtk DataFile Version 4.2\n\
             binary mesh\n\
             BINARY\n",
        );
        let result = load_vtk(file.path(), 1.0);
        assert!(matches!(result, Err(EngineError::MeshFormat(_))));
    }

    #[test]
    fn test_loader_rejects_non_triangle_cells() {
        let file = write_fixture(
            "# vtk DataFile Version 4.2\n\
             quads\n\
             ASCII\n\
             DATASET POLYDATA\n\
             POINTS 4 float\n\
             0 0 0 1 0 0 1 1 0 0 1 0\n\
             POLYGONS 1 5\n\
             4 0 1 2 3\n",
        );
        let result = load_vtk(file.path(), 1.0);
        assert!(matches!(result, Err(EngineError::MeshFormat(_))));
    }

    #[test]
    fn test_writer_rejects_mismatched_data_arrays() {
        let mesh = unit_square();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.vtk");

        let mut triangle_data = BTreeMap::new();
        triangle_data.insert("area".to_string(), vec![0.5]);

        let result = write_vtk(&mesh, &path, None, Some(&triangle_data));
        assert!(matches!(result, Err(EngineError::MeshData(_))));
    }

    #[test]
    fn test_writer_emits_scalar_sections() {
        let mesh = unit_square();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.vtk");

        let mut vertex_data = BTreeMap::new();
        vertex_data.insert("height".to_string(), vec![0.0, 0.1, 0.2, 0.3]);
        let mut triangle_data = BTreeMap::new();
        triangle_data.insert("area".to_string(), vec![0.5, 0.5]);

        write_vtk(&mesh, &path, Some(&vertex_data), Some(&triangle_data)).unwrap();
        let contents = fs::read_to_string(&path).unwrap();

        assert!(contents.contains("POINT_DATA 4"));
        assert!(contents.contains("CELL_DATA 2"));
        assert!(contents.contains("SCALARS height float 1"));
        assert!(contents.contains("SCALARS area float 1"));

        // Attached data must not confuse the geometry loader.
        let loaded = load_vtk(&path, 1.0).unwrap();
        assert_eq!(loaded.triangles(), mesh.triangles());
    }
}
