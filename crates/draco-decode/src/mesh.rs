//! Decoded triangle meshes.

use std::ops::Deref;

use crate::point_cloud::PointCloud;
use crate::types::Face;

/// A point cloud plus triangle connectivity.
///
/// Dereferences to the underlying [`PointCloud`] for attribute access.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    point_cloud: PointCloud,
    faces: Vec<Face>,
}

impl Mesh {
    /// An empty, unpopulated mesh.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut PointCloud, &mut Vec<Face>) {
        (&mut self.point_cloud, &mut self.faces)
    }

    #[must_use]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Copy the faces into `buffer` and return it.
    ///
    /// Existing elements are overwritten, only the missing ones are
    /// appended, and the result holds exactly [`num_faces`](Self::num_faces)
    /// triangles.
    #[must_use]
    pub fn faces(&self, mut buffer: Vec<Face>) -> Vec<Face> {
        let n = self.faces.len();
        let reused = buffer.len().min(n);
        buffer[..reused].copy_from_slice(&self.faces[..reused]);
        buffer.truncate(n);
        buffer.extend_from_slice(&self.faces[reused..]);
        buffer
    }

    /// Borrow the faces without copying.
    #[must_use]
    pub fn face_slice(&self) -> &[Face] {
        &self.faces
    }
}

impl Deref for Mesh {
    type Target = PointCloud;

    fn deref(&self) -> &PointCloud {
        &self.point_cloud
    }
}
