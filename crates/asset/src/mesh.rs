//! CPU-side mesh representation.

/// Vertex with position/uv. Values are in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub const fn new(position: [f32; 3], uv: [f32; 2]) -> Self {
        Self { position, uv }
    }
}

/// Indexed triangle mesh with tightly-packed vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// 2x2 card in the XZ plane (y = 0), facing -Y.
    ///
    /// Texture v runs top to bottom, so +Z maps to v = 0 and the texture
    /// shows upright to a camera on -Y with Z up.
    pub fn card() -> Self {
        let vertices = vec![
            // bottom-left triangle
            MeshVertex::new([-1.0, 0.0, -1.0], [0.0, 1.0]),
            MeshVertex::new([1.0, 0.0, -1.0], [1.0, 1.0]),
            MeshVertex::new([-1.0, 0.0, 1.0], [0.0, 0.0]),
            // top-right triangle
            MeshVertex::new([-1.0, 0.0, 1.0], [0.0, 0.0]),
            MeshVertex::new([1.0, 0.0, -1.0], [1.0, 1.0]),
            MeshVertex::new([1.0, 0.0, 1.0], [1.0, 0.0]),
        ];
        let indices = (0..vertices.len() as u32).collect();
        Self::new(vertices, indices)
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_is_two_triangles() {
        let card = MeshData::card();
        assert!(card.is_valid());
        assert_eq!(card.vertices.len(), 6);
        assert_eq!(card.triangle_count(), 2);
        assert!(card.indices.iter().all(|&i| (i as usize) < card.vertices.len()));
    }

    #[test]
    fn card_lies_in_xz_plane() {
        let card = MeshData::card();
        assert!(card.vertices.iter().all(|v| v.position[1] == 0.0));
        assert!(
            card.vertices
                .iter()
                .all(|v| v.position[0].abs() == 1.0 && v.position[2].abs() == 1.0)
        );
    }

    #[test]
    fn card_uvs_are_upright() {
        for v in MeshData::card().vertices {
            let expected_u = (v.position[0] + 1.0) * 0.5;
            let expected_v = (1.0 - v.position[2]) * 0.5;
            assert_eq!(v.uv, [expected_u, expected_v]);
        }
    }

    #[test]
    fn empty_mesh_is_invalid() {
        assert!(!MeshData::default().is_valid());
    }
}
