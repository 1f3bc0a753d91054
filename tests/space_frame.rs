use std::rc::Rc;

use approx::assert_relative_eq;
use frame_solver::math::{self, Mat3, Vec3};
use frame_solver::prelude::*;

fn rectangle(b: f64, h: f64) -> Section3D {
    Section3D::new(Rc::new(Material::steel()), Shape3D::rectangle(b, h).unwrap())
}

fn build_cantilever(length: f64) -> Frame3D {
    let mut frame = Frame3D::new();
    frame.add_node(0.0, 0.0, 0.0);
    frame.add_node(length, 0.0, 0.0);
    frame.add_element(1, 2, [0.0, 1.0, 0.0], &rectangle(0.1, 0.2)).unwrap();
    frame.add_fixed_sup(&[1]).unwrap();
    frame
}

// Portal in the XZ plane with a beam along Y off the top corner
fn build_space_frame() -> Frame3D {
    let mut frame = Frame3D::new();
    for (x, y, z) in [
        (0.0, 0.0, 0.0),
        (4.0, 0.0, 0.0),
        (0.0, 0.0, 3.0),
        (4.0, 0.0, 3.0),
        (4.0, 5.0, 3.0),
        (4.0, 5.0, 0.0),
    ] {
        frame.add_node(x, y, z);
    }
    let column = rectangle(0.2, 0.2);
    let beam = rectangle(0.15, 0.3);
    frame.add_element(1, 3, [1.0, 0.0, 0.0], &column).unwrap();
    frame.add_element(2, 4, [1.0, 0.0, 0.0], &column).unwrap();
    frame.add_element(3, 4, [0.0, 0.0, 1.0], &beam).unwrap();
    frame.add_element(4, 5, [0.0, 0.0, 1.0], &beam).unwrap();
    frame.add_element(6, 5, [1.0, 1.0, 0.0], &column).unwrap();
    frame.add_fixed_sup(&[1, 2, 6]).unwrap();
    frame.add_single_force(3, 10000.0, 5000.0, -20000.0).unwrap();
    frame.add_single_force(5, -3000.0, 0.0, -15000.0).unwrap();
    frame.add_single_moment(4, 0.0, 2000.0, 1000.0).unwrap();
    frame
}

#[test]
fn cantilever_matches_beam_theory() {
    let length = 2.0;
    let mut frame = build_cantilever(length);
    frame.add_single_force(2, 0.0, -1000.0, -500.0).unwrap();
    frame.add_single_moment(2, 300.0, 0.0, 0.0).unwrap();

    let element = frame.element(1).unwrap();
    let props = element.section().shape().properties();
    let e = 210e9;
    let g = e / (2.0 * 1.3);

    let u = frame.solve_disp(DEFAULT_TOLERANCE).unwrap();
    assert_eq!(u.len(), 12);
    assert_relative_eq!(u[6], 0.0);
    assert_relative_eq!(u[7], -1000.0 * length.powi(3) / (3.0 * e * props.i1), max_relative = 1e-9);
    assert_relative_eq!(u[8], -500.0 * length.powi(3) / (3.0 * e * props.i2), max_relative = 1e-9);
    assert_relative_eq!(u[9], 300.0 * length / (g * props.j), max_relative = 1e-9);
    assert_relative_eq!(u[10], 500.0 * length.powi(2) / (2.0 * e * props.i2), max_relative = 1e-9);
    assert_relative_eq!(u[11], -1000.0 * length.powi(2) / (2.0 * e * props.i1), max_relative = 1e-9);

    let r = frame.solve_reaction(DEFAULT_TOLERANCE).unwrap();
    let expected = [0.0, 1000.0, 500.0, -300.0, -500.0 * length, 1000.0 * length];
    for (dof, value) in expected.into_iter().enumerate() {
        assert_relative_eq!(r[dof], value, epsilon = 1e-6, max_relative = 1e-9);
    }
}

#[test]
fn cantilever_stress_is_biaxial() {
    let length = 2.0;
    let mut frame = build_cantilever(length);
    frame.add_single_force(2, 2000.0, -1000.0, -500.0).unwrap();

    let props = frame.element(1).unwrap().section().shape().properties();
    // Root section: M_n2 = 1000 L, M_n1 = 500 L, c1 = h/2, c2 = b/2
    let expected = 2000.0 / props.area
        + 1000.0 * length * 0.1 / props.i1
        + 500.0 * length * 0.05 / props.i2;
    assert_relative_eq!(frame.max_stress().unwrap(), expected, max_relative = 1e-9);
}

#[test]
fn element_triads_are_orthonormal() {
    let frame = build_space_frame();
    for element in frame.elements() {
        let r = element.rotation();
        assert_relative_eq!(r * r.transpose(), Mat3::identity(), epsilon = 1e-12);
        assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
    }
    // Column 6-5 runs along +Z with a skewed reference
    let skew = frame.element(5).unwrap();
    let half = std::f64::consts::FRAC_1_SQRT_2;
    assert_relative_eq!(skew.n1(), Vec3::new(half, half, 0.0), epsilon = 1e-12);
}

#[test]
fn space_frame_equilibrium() {
    let frame = build_space_frame();
    let results = frame
        .analyze(&AnalysisOptions::default().with_symmetry_check())
        .unwrap();
    assert_eq!(results.node_dofs, 6);

    let nodes = frame.nodes();
    let r = &results.reactions;
    let f = frame.loads();

    let mut force = Vec3::zeros();
    let mut moment = Vec3::zeros();
    for (i, node) in nodes.iter().enumerate() {
        let base = 6 * i;
        let total = Vec3::new(r[base] + f[base], r[base + 1] + f[base + 1], r[base + 2] + f[base + 2]);
        force += total;
        moment += node.coords().cross(&total);
        moment += Vec3::new(r[base + 3] + f[base + 3], r[base + 4] + f[base + 4], r[base + 5] + f[base + 5]);
    }
    assert!(force.norm() < 1e-6, "unbalanced force {force}");
    assert!(moment.norm() < 1e-5, "unbalanced moment {moment}");
}

#[test]
fn space_frame_stiffness_is_symmetric() {
    let frame = build_space_frame();
    let k = frame.assemble_global_stiffness();
    assert_eq!(k.shape(), (36, 36));
    assert!(math::is_symmetric(&k, 1e-12));
}

#[test]
fn element_end_forces_balance() {
    let frame = build_space_frame();
    let results = frame.analyze(&AnalysisOptions::default()).unwrap();
    for id in 1..=frame.elements().len() {
        let [start, end] = results.forces_3d(id).unwrap();
        // Axial force and torsion are constant along an unloaded element
        assert_relative_eq!(start.axial, end.axial, epsilon = 1e-6, max_relative = 1e-9);
        assert_relative_eq!(start.torsion, end.torsion, epsilon = 1e-6, max_relative = 1e-9);
    }
    assert!(results.forces_2d(1).is_none());
}

#[test]
fn parallel_reference_is_rejected() {
    let mut frame = build_cantilever(2.0);
    assert!(matches!(
        frame.add_element(1, 2, [-3.0, 0.0, 0.0], &rectangle(0.1, 0.1)),
        Err(FrameError::DegenerateOrientation)
    ));
    assert_eq!(frame.elements().len(), 1);
}

#[test]
fn non_finite_node_is_rejected() {
    let mut frame = build_cantilever(2.0);
    let bad = frame.add_node(0.0, f64::INFINITY, 0.0);
    assert!(matches!(
        frame.add_element(2, bad, [1.0, 0.0, 0.0], &rectangle(0.1, 0.1)),
        Err(FrameError::InvalidGeometry(_))
    ));
    assert_eq!(frame.elements().len(), 1);
}

#[test]
fn unsupported_frame_is_singular() {
    let mut frame = Frame3D::new();
    frame.add_node(0.0, 0.0, 0.0);
    frame.add_node(1.0, 2.0, 2.0);
    frame.add_element(1, 2, [0.0, 0.0, 1.0], &rectangle(0.1, 0.2)).unwrap();
    frame.add_single_force(2, 1.0, 0.0, 0.0).unwrap();

    assert!(matches!(frame.solve_disp(DEFAULT_TOLERANCE), Err(FrameError::SingularMatrix)));
    assert!(matches!(frame.max_stress(), Err(FrameError::SingularMatrix)));
}

#[test]
fn pinned_ends_leave_torsion_unrestrained() {
    // Both ends pinned: the bar is free to twist about its own axis
    let mut frame = Frame3D::new();
    frame.add_node(0.0, 0.0, 0.0);
    frame.add_node(3.0, 0.0, 0.0);
    frame.add_element(1, 2, [0.0, 1.0, 0.0], &rectangle(0.1, 0.2)).unwrap();
    frame.add_simple_sup(&[1, 2]).unwrap();
    assert_eq!(
        frame.fixed_dofs().iter().copied().collect::<Vec<_>>(),
        vec![0, 1, 2, 6, 7, 8]
    );
    frame.add_single_moment(2, 0.0, 100.0, 0.0).unwrap();

    assert!(matches!(frame.solve_disp(DEFAULT_TOLERANCE), Err(FrameError::SingularMatrix)));
}

#[test]
fn propped_cantilever_reaction() {
    let mut frame = Frame3D::new();
    for x in [0.0, 2.0, 4.0] {
        frame.add_node(x, 0.0, 0.0);
    }
    let section = rectangle(0.1, 0.2);
    frame.add_element(1, 2, [0.0, 1.0, 0.0], &section).unwrap();
    frame.add_element(2, 3, [0.0, 1.0, 0.0], &section).unwrap();
    frame.add_fixed_sup(&[1]).unwrap();
    frame.add_simple_sup(&[3]).unwrap();
    frame.add_single_force(2, 0.0, 0.0, -1000.0).unwrap();

    // R_prop = 5P/16 at the pinned end, no moment there
    let r = frame.solve_reaction(DEFAULT_TOLERANCE).unwrap();
    assert_relative_eq!(r[14], 5.0 * 1000.0 / 16.0, max_relative = 1e-9);
    assert_relative_eq!(r[2], 11.0 * 1000.0 / 16.0, max_relative = 1e-9);
    for dof in 15..18 {
        assert!(r[dof].abs() < 1e-6, "pinned dof {dof} has reaction {}", r[dof]);
    }
}

#[test]
fn missing_poisson_ratio_is_rejected() {
    let mut frame = build_cantilever(2.0);
    let section = Section3D::new(Rc::new(Material::new(70e9)), Shape3D::circle(0.05).unwrap());
    assert!(matches!(
        frame.add_element(1, 2, [0.0, 1.0, 0.0], &section),
        Err(FrameError::MissingProperty(_))
    ));
}

#[test]
fn update_and_resolve() {
    let mut frame = build_space_frame();
    let before = frame.max_stress().unwrap();
    let weight = frame.structural_weight().unwrap();

    for id in 1..=frame.elements().len() {
        frame.update_shape_params(id, &[("b", 0.4), ("h", 0.4)]).unwrap();
    }
    assert!(frame.max_stress().unwrap() < before);
    assert!(frame.structural_weight().unwrap() > weight);

    assert!(matches!(
        frame.update_shape_params(1, &[("R", 0.1)]),
        Err(FrameError::UnknownParameter { .. })
    ));
}
