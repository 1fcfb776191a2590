//! Custom Bevy AssetLoader for PLY (Polygon File Format) files.
//!
//! Supports ASCII and binary PLY via the `ply-rs` crate. Files with a `face`
//! element become indexed triangle meshes with smooth vertex normals; files
//! with only a `vertex` element become point clouds.

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext, RenderAssetUsages};
use bevy::mesh::{Indices, Mesh, PrimitiveTopology};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use thiserror::Error;

/// Settings for the PLY asset loader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlyLoaderSettings {
    /// Skip normal generation for triangle meshes and keep whatever normals
    /// the file carries (if any).
    #[serde(default)]
    pub keep_file_normals: bool,
}

/// Errors that can occur when loading a PLY file.
#[derive(Debug, Error)]
pub enum PlyLoaderError {
    #[error("IO error reading PLY data: {0}")]
    Io(#[from] std::io::Error),

    #[error("vertex {index} has no usable '{axis}' coordinate")]
    MissingCoordinate { index: usize, axis: &'static str },

    #[error("face {face} has no vertex index list")]
    MissingFaceIndices { face: usize },

    #[error("face {face} references vertex {index} but the file has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: i64,
        vertex_count: usize,
    },

    #[error("PLY file contains no vertices")]
    EmptyMesh,
}

/// Geometry decoded from a PLY file, before it becomes a Bevy [`Mesh`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlyGeometry {
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals stored in the file (`nx`, `ny`, `nz`)
    pub normals: Option<Vec<[f32; 3]>>,
    /// Triangle corner indices, three per triangle
    pub indices: Vec<u32>,
}

impl PlyGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// A file without faces is rendered as a point cloud.
    pub fn is_point_cloud(&self) -> bool {
        self.indices.is_empty()
    }

    /// Axis-aligned bounds as (min, max), `None` for empty geometry
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(mut min, mut max), p| {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
            (min, max)
        }))
    }

    /// Convert to a Bevy [`Mesh`].
    ///
    /// Triangle meshes get smooth normals recomputed from the connectivity
    /// unless `keep_file_normals` is set. Point clouds keep the file normals
    /// when present since there are no faces to derive them from.
    pub fn into_mesh(self, settings: &PlyLoaderSettings) -> Mesh {
        if self.is_point_cloud() {
            let mut mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default())
                .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);
            if let Some(normals) = self.normals {
                mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
            }
            return mesh;
        }

        let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions)
            .with_inserted_indices(Indices::U32(self.indices));

        match self.normals {
            Some(normals) if settings.keep_file_normals => {
                mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
            }
            _ => mesh.compute_normals(),
        }

        mesh
    }
}

/// Bevy [`AssetLoader`] that reads `.ply` files and produces [`Mesh`] assets.
#[derive(Default, Debug, Clone, Copy, bevy::reflect::TypePath)]
pub struct PlyLoader;

impl AssetLoader for PlyLoader {
    type Asset = Mesh;
    type Settings = PlyLoaderSettings;
    type Error = PlyLoaderError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        settings: &PlyLoaderSettings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Mesh, PlyLoaderError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;

        let geometry = decode_ply(&bytes)?;
        Ok(geometry.into_mesh(settings))
    }

    fn extensions(&self) -> &[&str] {
        &["ply"]
    }
}

/// Parse PLY bytes (ASCII or binary) into [`PlyGeometry`].
pub fn decode_ply(bytes: &[u8]) -> Result<PlyGeometry, PlyLoaderError> {
    let mut cursor = Cursor::new(bytes);
    let ply = Parser::<DefaultElement>::new().read_ply(&mut cursor)?;

    let vertices = ply.payload.get("vertex").map(Vec::as_slice).unwrap_or(&[]);
    if vertices.is_empty() {
        return Err(PlyLoaderError::EmptyMesh);
    }

    let mut positions = Vec::with_capacity(vertices.len());
    for (index, vertex) in vertices.iter().enumerate() {
        let coordinate = |axis: &'static str| {
            scalar(vertex, axis).ok_or(PlyLoaderError::MissingCoordinate { index, axis })
        };
        positions.push([coordinate("x")?, coordinate("y")?, coordinate("z")?]);
    }

    // Normals only count when every vertex has all three components
    let normals: Option<Vec<[f32; 3]>> = vertices
        .iter()
        .map(|v| Some([scalar(v, "nx")?, scalar(v, "ny")?, scalar(v, "nz")?]))
        .collect();

    let mut indices = Vec::new();
    if let Some(faces) = ply.payload.get("face") {
        for (face, element) in faces.iter().enumerate() {
            let corners = face_indices(element)
                .ok_or(PlyLoaderError::MissingFaceIndices { face })?;

            let mut checked = Vec::with_capacity(corners.len());
            for index in corners {
                if index < 0 || index as usize >= positions.len() {
                    return Err(PlyLoaderError::FaceIndexOutOfRange {
                        face,
                        index,
                        vertex_count: positions.len(),
                    });
                }
                checked.push(index as u32);
            }

            // Fan triangulation; degenerate faces with < 3 corners are skipped
            for i in 1..checked.len().saturating_sub(1) {
                indices.extend_from_slice(&[checked[0], checked[i], checked[i + 1]]);
            }
        }
    }

    Ok(PlyGeometry {
        positions,
        normals,
        indices,
    })
}

/// Read a scalar vertex property as f32, whatever its stored type.
fn scalar(element: &DefaultElement, name: &str) -> Option<f32> {
    match element.get(name)? {
        Property::Float(v) => Some(*v),
        Property::Double(v) => Some(*v as f32),
        Property::Int(v) => Some(*v as f32),
        Property::UInt(v) => Some(*v as f32),
        Property::Short(v) => Some(*v as f32),
        Property::UShort(v) => Some(*v as f32),
        Property::Char(v) => Some(*v as f32),
        Property::UChar(v) => Some(*v as f32),
        _ => None,
    }
}

/// Read a face's corner list, accepting both common property names.
fn face_indices(element: &DefaultElement) -> Option<Vec<i64>> {
    let list = element
        .get("vertex_indices")
        .or_else(|| element.get("vertex_index"))?;

    let indices = match list {
        Property::ListInt(v) => v.iter().map(|&i| i as i64).collect(),
        Property::ListUInt(v) => v.iter().map(|&i| i as i64).collect(),
        Property::ListShort(v) => v.iter().map(|&i| i as i64).collect(),
        Property::ListUShort(v) => v.iter().map(|&i| i as i64).collect(),
        Property::ListChar(v) => v.iter().map(|&i| i as i64).collect(),
        Property::ListUChar(v) => v.iter().map(|&i| i as i64).collect(),
        _ => return None,
    };
    Some(indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRAHEDRON: &str = "ply
format ascii 1.0
element vertex 4
property float x
property float y
property float z
element face 4
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
0 1 0
0 0 1
3 0 2 1
3 0 1 3
3 0 3 2
3 1 2 3
";

    #[test]
    fn test_decode_triangle_mesh() {
        let geometry = decode_ply(TETRAHEDRON.as_bytes()).unwrap();
        assert_eq!(geometry.vertex_count(), 4);
        assert_eq!(geometry.triangle_count(), 4);
        assert!(!geometry.is_point_cloud());
        assert!(geometry.normals.is_none());
        assert_eq!(geometry.bounds(), Some(([0.0; 3], [1.0; 3])));
    }

    #[test]
    fn test_triangle_mesh_gets_computed_normals() {
        let mesh = decode_ply(TETRAHEDRON.as_bytes())
            .unwrap()
            .into_mesh(&PlyLoaderSettings::default());
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::TriangleList);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
        assert_eq!(mesh.indices().map(|i| i.len()), Some(12));
    }

    #[test]
    fn test_quads_are_fan_triangulated() {
        let quad = "ply
format ascii 1.0
element vertex 4
property double x
property double y
property double z
element face 1
property list uchar uint vertex_indices
end_header
0 0 0
1 0 0
1 1 0
0 1 0
4 0 1 2 3
";
        let geometry = decode_ply(quad.as_bytes()).unwrap();
        assert_eq!(geometry.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_point_cloud_keeps_file_normals() {
        let cloud = "ply
format ascii 1.0
element vertex 2
property float x
property float y
property float z
property float nx
property float ny
property float nz
end_header
0 0 0 0 1 0
1 2 3 0 0 1
";
        let geometry = decode_ply(cloud.as_bytes()).unwrap();
        assert!(geometry.is_point_cloud());
        assert_eq!(
            geometry.normals,
            Some(vec![[0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
        );

        let mesh = geometry.into_mesh(&PlyLoaderSettings::default());
        assert_eq!(mesh.primitive_topology(), PrimitiveTopology::PointList);
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
        assert!(mesh.indices().is_none());
    }

    #[test]
    fn test_rejects_out_of_range_face() {
        let broken = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
0 1 0
3 0 1 7
";
        match decode_ply(broken.as_bytes()) {
            Err(PlyLoaderError::FaceIndexOutOfRange {
                face,
                index,
                vertex_count,
            }) => {
                assert_eq!(face, 0);
                assert_eq!(index, 7);
                assert_eq!(vertex_count, 3);
            }
            other => panic!("expected out of range error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_empty_and_garbage_input() {
        let empty = "ply
format ascii 1.0
element vertex 0
property float x
property float y
property float z
end_header
";
        assert!(matches!(
            decode_ply(empty.as_bytes()),
            Err(PlyLoaderError::EmptyMesh)
        ));
        assert!(decode_ply(b"not a ply file").is_err());
    }

    #[test]
    fn test_missing_coordinate() {
        let flat = "ply
format ascii 1.0
element vertex 1
property float x
property float y
end_header
0.5 0.25
";
        assert!(matches!(
            decode_ply(flat.as_bytes()),
            Err(PlyLoaderError::MissingCoordinate { index: 0, axis: "z" })
        ));
    }
}
