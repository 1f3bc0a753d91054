//! Mathematical utilities for frame calculations

use nalgebra::{DMatrix, DVector, Matrix3, Matrix6, SMatrix, SVector, Vector3, Vector6};

use crate::error::{FrameError, FrameResult};

pub type Mat = DMatrix<f64>;
pub type Vec = DVector<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Vec3 = Vector3<f64>;

/// 6x6 matrix for 2D beam stiffness/mass
pub type Mat6 = Matrix6<f64>;
/// 6-element vector for 2D beam forces/displacements
pub type Vec6 = Vector6<f64>;
/// 12x12 matrix for 3D beam stiffness
pub type Mat12 = SMatrix<f64, 12, 12>;
/// 12-element vector for 3D beam forces/displacements
pub type Vec12 = SVector<f64, 12>;

/// Smallest pivot, relative to the largest, that the reduced solve accepts
/// before reporting the system as singular.
pub const PIVOT_TOLERANCE: f64 = 1e-12;

/// Below this fraction of its own length, the part of a 3D orientation vector
/// orthogonal to the element axis is treated as zero.
pub const ORIENTATION_TOLERANCE: f64 = 1e-9;

/// Compute the local stiffness matrix for a 2D Euler-Bernoulli frame element
///
/// DOF order: [u1, v1, θ1, u2, v2, θ2]
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `a` - Cross-sectional area
/// * `i` - Second moment of area
/// * `length` - Element length
pub fn beam2d_local_stiffness(e: f64, a: f64, i: f64, length: f64) -> Mat6 {
    let l = length;
    let ea_l = e * a / l;
    let ei_l3 = e * i / l.powi(3);
    let ei_l2 = e * i / l.powi(2);
    let ei_l = e * i / l;

    #[rustfmt::skip]
    let data = [
        ea_l,  0.0,          0.0,         -ea_l, 0.0,          0.0,
        0.0,   12.0*ei_l3,   6.0*ei_l2,   0.0,   -12.0*ei_l3,  6.0*ei_l2,
        0.0,   6.0*ei_l2,    4.0*ei_l,    0.0,   -6.0*ei_l2,   2.0*ei_l,
        -ea_l, 0.0,          0.0,         ea_l,  0.0,          0.0,
        0.0,   -12.0*ei_l3,  -6.0*ei_l2,  0.0,   12.0*ei_l3,   -6.0*ei_l2,
        0.0,   6.0*ei_l2,    2.0*ei_l,    0.0,   -6.0*ei_l2,   4.0*ei_l,
    ];

    Mat6::from_row_slice(&data)
}

/// Compute the consistent mass matrix for a 2D frame element
///
/// # Arguments
/// * `rho` - Density
/// * `a` - Cross-sectional area
/// * `length` - Element length
pub fn beam2d_consistent_mass(rho: f64, a: f64, length: f64) -> Mat6 {
    let l = length;
    let l2 = l * l;

    #[rustfmt::skip]
    let data = [
        1.0/3.0, 0.0,              0.0,              1.0/6.0, 0.0,              0.0,
        0.0,     13.0/35.0,        11.0*l/210.0,     0.0,     9.0/70.0,         -13.0*l/420.0,
        0.0,     11.0*l/210.0,     l2/105.0,         0.0,     13.0*l/420.0,     -l2/140.0,
        1.0/6.0, 0.0,              0.0,              1.0/3.0, 0.0,              0.0,
        0.0,     9.0/70.0,         13.0*l/420.0,     0.0,     13.0/35.0,        -11.0*l/210.0,
        0.0,     -13.0*l/420.0,    -l2/140.0,        0.0,     -11.0*l/210.0,    l2/105.0,
    ];

    Mat6::from_row_slice(&data) * (rho * a * l)
}

/// Compute the 6x6 transformation matrix for a 2D frame element
///
/// `phi` is the angle of the element axis from global +X (radians).
/// Maps global DOFs to local DOFs: `d_local = T * d_global`.
pub fn beam2d_transformation_matrix(phi: f64) -> Mat6 {
    let (s, c) = phi.sin_cos();

    #[rustfmt::skip]
    let data = [
        c,   s,   0.0, 0.0, 0.0, 0.0,
        -s,  c,   0.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0, 0.0, 0.0,
        0.0, 0.0, 0.0, c,   s,   0.0,
        0.0, 0.0, 0.0, -s,  c,   0.0,
        0.0, 0.0, 0.0, 0.0, 0.0, 1.0,
    ];

    Mat6::from_row_slice(&data)
}

/// Build the local triad of a 3D frame element as a direction cosine matrix
///
/// Rows are `t` (unit axis), `n1` (reference vector with its axial component
/// removed) and `n2 = t × n1`.
///
/// # Arguments
/// * `axis` - Vector from node 1 to node 2 (need not be unit length)
/// * `reference` - Vector fixing the n1 bending direction
pub fn local_triad(axis: &Vec3, reference: &Vec3) -> FrameResult<Mat3> {
    let length = axis.norm();
    if !length.is_finite() || length < 1e-10 {
        return Err(FrameError::InvalidGeometry(
            "element has zero or non-finite length".to_string(),
        ));
    }
    let t = axis / length;

    let ref_norm = reference.norm();
    if ref_norm < 1e-10 || !ref_norm.is_finite() {
        return Err(FrameError::DegenerateOrientation);
    }

    // Gram-Schmidt: remove the axial component of the reference vector
    let n1_raw = reference - t * t.dot(reference);
    if n1_raw.norm() <= ORIENTATION_TOLERANCE * ref_norm {
        return Err(FrameError::DegenerateOrientation);
    }
    let n1 = n1_raw.normalize();
    let n2 = t.cross(&n1).normalize();

    Ok(Mat3::from_rows(&[t.transpose(), n1.transpose(), n2.transpose()]))
}

/// Compute the 12x12 transformation matrix for a 3D frame element
///
/// Four copies of the direction cosine matrix on the diagonal, one per
/// translation and rotation triple of each node.
pub fn beam3d_transformation_matrix(r: &Mat3) -> Mat12 {
    let mut t = Mat12::zeros();
    for block in 0..4 {
        t.fixed_view_mut::<3, 3>(block * 3, block * 3).copy_from(r);
    }
    t
}

/// Compute the local stiffness matrix for a 3D frame element
///
/// DOF order per node: [u, v, w, θt, θn1, θn2] along/about (t, n1, n2).
///
/// # Arguments
/// * `e` - Modulus of elasticity
/// * `g` - Shear modulus
/// * `a` - Cross-sectional area
/// * `i1` - Second moment resisting deflection along n1
/// * `i2` - Second moment resisting deflection along n2
/// * `j` - Torsion constant
/// * `length` - Element length
pub fn beam3d_local_stiffness(
    e: f64,
    g: f64,
    a: f64,
    i1: f64,
    i2: f64,
    j: f64,
    length: f64,
) -> Mat12 {
    let l = length;
    let mut k = Mat12::zeros();

    let bar = e * a / l;
    let twist = g * j / l;
    for (p, sp) in [(0, 1.0), (6, -1.0)] {
        for (q, sq) in [(0, 1.0), (6, -1.0)] {
            k[(p, q)] += sp * sq * bar;
            k[(p + 3, q + 3)] += sp * sq * twist;
        }
    }

    // Deflection along n1 pairs with rotation about n2; deflection along n2
    // pairs with rotation about n1, whose positive sense is -dw/dx.
    let plane_n1 = [(1, 1.0), (5, 1.0), (7, 1.0), (11, 1.0)];
    let plane_n2 = [(2, 1.0), (4, -1.0), (8, 1.0), (10, -1.0)];
    for (inertia, dofs) in [(i1, plane_n1), (i2, plane_n2)] {
        let block = bending_block(e * inertia, l);
        for (r, &(p, sp)) in dofs.iter().enumerate() {
            for (c, &(q, sq)) in dofs.iter().enumerate() {
                k[(p, q)] += sp * sq * block[(r, c)];
            }
        }
    }

    k
}

/// Canonical 4x4 Euler-Bernoulli bending block on [v1, θ1, v2, θ2]
fn bending_block(ei: f64, l: f64) -> SMatrix<f64, 4, 4> {
    let l2 = l * l;

    #[rustfmt::skip]
    let data = [
        12.0,    6.0*l,    -12.0,   6.0*l,
        6.0*l,   4.0*l2,   -6.0*l,  2.0*l2,
        -12.0,   -6.0*l,   12.0,    -6.0*l,
        6.0*l,   2.0*l2,   -6.0*l,  4.0*l2,
    ];

    SMatrix::<f64, 4, 4>::from_row_slice(&data) * (ei / l.powi(3))
}

/// Scatter-add an element matrix into a global matrix
///
/// `dofs[a]` is the global row/column of element row/column `a`.
pub fn scatter_add(global: &mut Mat, dofs: &[usize], element: &Mat) {
    for (a, &ga) in dofs.iter().enumerate() {
        for (b, &gb) in dofs.iter().enumerate() {
            global[(ga, gb)] += element[(a, b)];
        }
    }
}

/// Solve a linear system using LU decomposition
///
/// Returns `None` when the matrix is singular or so ill-conditioned that
/// its smallest pivot vanishes relative to its largest.
pub fn solve_linear_system(a: &Mat, b: &Vec) -> Option<Vec> {
    let lu = a.clone().lu();

    let pivots = lu.u().diagonal();
    let max_pivot = pivots.amax();
    let min_pivot = pivots.iter().fold(f64::INFINITY, |m, p| m.min(p.abs()));
    if max_pivot == 0.0 || min_pivot <= max_pivot * PIVOT_TOLERANCE {
        return None;
    }

    lu.solve(b).filter(|x| x.iter().all(|v| v.is_finite()))
}

/// Replace every entry with magnitude below `tolerance` by exactly zero
pub fn snap_to_zero(v: &mut Vec, tolerance: f64) {
    for x in v.iter_mut() {
        if x.abs() < tolerance {
            *x = 0.0;
        }
    }
}

/// Check whether a square matrix is symmetric to within `tolerance`,
/// relative to its largest entry
pub fn is_symmetric(m: &Mat, tolerance: f64) -> bool {
    if m.nrows() != m.ncols() {
        return false;
    }
    let scale = m.amax().max(1.0);
    (0..m.nrows()).all(|i| (0..i).all(|j| (m[(i, j)] - m[(j, i)]).abs() <= tolerance * scale))
}
