//! Binary STL output

use std::io::{BufWriter, Write};
use std::path::Path;

use super::{TessellatedMesh, triangle_normal};
use crate::kernel::{KernelError, KernelResult};

/// Write a mesh as binary STL with per-facet normals
pub fn write_binary_stl(mesh: &TessellatedMesh, path: &Path) -> KernelResult<()> {
    let triangles: Vec<stl_io::Triangle> = mesh
        .triangles()
        .map(|[v0, v1, v2]| stl_io::Triangle {
            normal: stl_io::Normal::new(triangle_normal(v0, v1, v2)),
            vertices: [
                stl_io::Vertex::new(v0),
                stl_io::Vertex::new(v1),
                stl_io::Vertex::new(v2),
            ],
        })
        .collect();

    let file = std::fs::File::create(path).map_err(|e| KernelError::FileIo(e.to_string()))?;
    let mut writer = BufWriter::new(file);
    stl_io::write_stl(&mut writer, triangles.iter())
        .map_err(|e| KernelError::StlExport(e.to_string()))?;
    writer
        .flush()
        .map_err(|e| KernelError::FileIo(e.to_string()))?;

    Ok(())
}
