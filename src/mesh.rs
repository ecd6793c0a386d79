use cgmath::{Deg, InnerSpace, Matrix4, Vector3};

/// Floats per cube vertex: position (3) and texture coordinates (2).
pub const CUBE_VERTEX_SIZE: usize = 5;

// One quad per face so every face gets the full texture.
#[rustfmt::skip]
pub const CUBE_VERTICES: [f32; 24 * CUBE_VERTEX_SIZE] = [
    // back
     0.5, -0.5, -0.5,  0.0, 0.0,
    -0.5, -0.5, -0.5,  1.0, 0.0,
    -0.5,  0.5, -0.5,  1.0, 1.0,
     0.5,  0.5, -0.5,  0.0, 1.0,
    // front
    -0.5, -0.5,  0.5,  0.0, 0.0,
     0.5, -0.5,  0.5,  1.0, 0.0,
     0.5,  0.5,  0.5,  1.0, 1.0,
    -0.5,  0.5,  0.5,  0.0, 1.0,
    // left
    -0.5, -0.5, -0.5,  0.0, 0.0,
    -0.5, -0.5,  0.5,  1.0, 0.0,
    -0.5,  0.5,  0.5,  1.0, 1.0,
    -0.5,  0.5, -0.5,  0.0, 1.0,
    // right
     0.5, -0.5,  0.5,  0.0, 0.0,
     0.5, -0.5, -0.5,  1.0, 0.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
     0.5,  0.5,  0.5,  0.0, 1.0,
    // bottom
    -0.5, -0.5, -0.5,  0.0, 0.0,
     0.5, -0.5, -0.5,  1.0, 0.0,
     0.5, -0.5,  0.5,  1.0, 1.0,
    -0.5, -0.5,  0.5,  0.0, 1.0,
    // top
    -0.5,  0.5,  0.5,  0.0, 0.0,
     0.5,  0.5,  0.5,  1.0, 0.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
    -0.5,  0.5, -0.5,  0.0, 1.0,
];

/// Two counter-clockwise triangles per face.
pub fn cube_indices() -> Vec<u32> {
    (0..6_u32)
        .flat_map(|face| {
            let base = face * 4;
            [base, base + 1, base + 2, base + 2, base + 3, base]
        })
        .collect()
}

#[rustfmt::skip]
pub const CUBE_POSITIONS: [[f32; 3]; 10] = [
    [ 0.0,  0.0,   0.0],
    [ 2.0,  5.0, -15.0],
    [-1.5, -2.2,  -2.5],
    [-3.8, -2.0, -12.3],
    [ 2.4, -0.4,  -3.5],
    [-1.7,  3.0,  -7.5],
    [ 1.3, -2.0,  -2.5],
    [ 1.5,  2.0,  -2.5],
    [ 1.5,  0.2,  -1.5],
    [-1.3,  1.0,  -1.5],
];

/// Model matrix of the `index`-th cube of the field.
pub fn cube_model(index: usize, position: [f32; 3]) -> Matrix4<f32> {
    let axis = Vector3::new(1.0, 0.3, 0.5);
    let angle = Deg(20.0 * index as f32);

    Matrix4::from_translation(position.into())
        * Matrix4::from_axis_angle(axis.normalize(), angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, SquareMatrix, Transform};

    #[test]
    fn indices_stay_in_range() {
        let indices = cube_indices();
        let vertices = (CUBE_VERTICES.len() / CUBE_VERTEX_SIZE) as u32;

        assert_eq!(indices.len(), 36);
        assert!(indices.iter().all(|i| *i < vertices));
        assert_eq!(&indices[6..12], &[4, 5, 6, 6, 7, 4]);
    }

    #[test]
    fn first_cube_is_untransformed() {
        assert_eq!(cube_model(0, CUBE_POSITIONS[0]), Matrix4::identity());
    }

    #[test]
    fn model_translates_center() {
        let center = cube_model(3, CUBE_POSITIONS[3]).transform_point(Point3::new(0.0, 0.0, 0.0));

        assert!((center.x - -3.8).abs() < 1e-5);
        assert!((center.z - -12.3).abs() < 1e-5);
    }
}
