//! End-to-end scenario tests exercising the assembled `Simulation` plus the
//! CPU compute backend, rather than any single module in isolation.

use maxwell::backend::cpu;
use maxwell::boundary::{BoundaryPolicy, PmlParams};
use maxwell::fdtd;
use maxwell::grid::{FieldComponent, Simulation};
use maxwell::materials::Material;
use maxwell::source::Source;

const EPSILON_0: f32 = 8.854e-12;
const DX: f32 = 1.0;
const DY: f32 = 1.0;
const DT: f32 = 1e-12;

fn run_steps(sim: &mut Simulation, n: u64) {
    for _ in 0..n {
        fdtd::step(sim).expect("step should not violate CFL");
    }
}

#[test]
fn empty_grid_stays_all_zero_with_no_sources() {
    let mut sim = Simulation::new(100, 100, DX, DY, DT, BoundaryPolicy::Natural, PmlParams::default()).unwrap();
    run_steps(&mut sim, 1000);

    assert!(sim.ez.iter().all(|&v| v == 0.0));
    assert!(sim.hx.iter().all(|&v| v == 0.0));
    assert!(sim.hy.iter().all(|&v| v == 0.0));
}

#[test]
fn pec_boundary_keeps_corner_zero_while_source_excites_center() {
    let mut sim = Simulation::new(200, 200, DX, DY, DT, BoundaryPolicy::Pec, PmlParams::default()).unwrap();
    sim.add_source(Source::SineLinFreq {
        x: 100,
        y: 100,
        frequency: 1.5e6,
        phase: 0.0,
        component: FieldComponent::Ez,
    })
    .unwrap();

    run_steps(&mut sim, 500);

    let corner = sim.index(0, 0);
    assert_eq!(sim.ez[corner].abs(), 0.0);

    let center = sim.index(100, 100);
    assert!(sim.ez[center].abs() > 0.0);
}

#[test]
fn pml_boundary_attenuates_field_near_outer_ring_relative_to_source() {
    let mut sim = Simulation::new(300, 300, DX, DY, DT, BoundaryPolicy::Pml, PmlParams::default()).unwrap();
    sim.add_source(Source::SineLinFreq {
        x: 150,
        y: 150,
        frequency: 1.5e6,
        phase: 0.0,
        component: FieldComponent::Ez,
    })
    .unwrap();

    run_steps(&mut sim, 2000);

    let near_source_max = (145..=155)
        .map(|y| (145..=155usize).map(|x| sim.ez[sim.index(x, y)].abs()).fold(0.0_f32, f32::max))
        .fold(0.0_f32, f32::max);

    let near_edge_max = (0..=5)
        .chain(294..=299)
        .map(|y| (0..300).map(|x| sim.ez[sim.index(x, y)].abs()).fold(0.0_f32, f32::max))
        .fold(0.0_f32, f32::max);

    if near_source_max > 0.0 {
        assert!(near_edge_max / near_source_max < 0.1);
    }
}

#[test]
fn triangle_rasterizes_with_centroid_inside_and_corner_outside() {
    let mut sim = Simulation::new(50, 50, DX, DY, DT, BoundaryPolicy::Natural, PmlParams::default()).unwrap();
    sim.add_material(Material::triangle((10.0, 10.0), (40.0, 10.0), (25.0, 40.0), 4.0, 1.0))
        .unwrap();

    let centroid = sim.index(25, 25);
    let corner = sim.index(0, 0);
    assert!((sim.epsilon[centroid] - 4.0 * EPSILON_0).abs() < 1e-19);
    assert_eq!(sim.epsilon[corner], EPSILON_0);
}

#[test]
fn overlapping_triangle_and_circle_multiply_relative_epsilon() {
    let mut sim = Simulation::new(50, 50, DX, DY, DT, BoundaryPolicy::Natural, PmlParams::default()).unwrap();
    sim.add_material(Material::triangle((10.0, 10.0), (40.0, 10.0), (25.0, 40.0), 4.0, 1.0))
        .unwrap();
    sim.add_material(Material::circle(25.0, 25.0, 5.0, 2.0, 1.0)).unwrap();

    let centroid = sim.index(25, 25);
    assert!((sim.epsilon[centroid] - 8.0 * EPSILON_0).abs() < 1e-18);
}

#[test]
fn two_symmetric_sources_produce_ez_symmetric_about_midline() {
    // Height 201 (rows 0..=200) so row 100 is a true reflection axis.
    let mut sim = Simulation::new(200, 201, DX, DY, DT, BoundaryPolicy::Pec, PmlParams::default()).unwrap();
    sim.add_source(Source::SineLinFreq {
        x: 100,
        y: 95,
        frequency: 1.5e6,
        phase: 0.0,
        component: FieldComponent::Ez,
    })
    .unwrap();
    sim.add_source(Source::SineLinFreq {
        x: 100,
        y: 105,
        frequency: 1.5e6,
        phase: 0.0,
        component: FieldComponent::Ez,
    })
    .unwrap();

    run_steps(&mut sim, 1000);

    let max_amplitude = sim.ez.iter().fold(0.0_f32, |acc, &v| acc.max(v.abs())).max(1e-30);

    for x in 0..sim.width {
        for y in 0..=100usize {
            let mirrored = 200 - y;
            let a = sim.ez[sim.index(x, y)];
            let b = sim.ez[sim.index(x, mirrored)];
            assert!((a - b).abs() / max_amplitude < 1e-4, "asymmetry at x={x}, y={y}");
        }
    }
}

#[test]
fn cpu_backend_step_and_render_matches_direct_stepper_and_renderer() {
    let mut via_backend = Simulation::new(32, 32, DX, DY, DT, BoundaryPolicy::Natural, PmlParams::default()).unwrap();
    let mut via_direct = Simulation::new(32, 32, DX, DY, DT, BoundaryPolicy::Natural, PmlParams::default()).unwrap();

    let source = Source::SineLinFreq {
        x: 16,
        y: 16,
        frequency: 1.5e6,
        phase: 0.0,
        component: FieldComponent::Ez,
    };
    via_backend.add_source(source).unwrap();
    via_direct.add_source(source).unwrap();

    for _ in 0..10 {
        cpu::step_and_render(&mut via_backend, false).unwrap();
        fdtd::step(&mut via_direct).unwrap();
        maxwell::render::render(&mut via_direct, false);
    }

    for (a, b) in via_backend.ez.iter().zip(via_direct.ez.iter()) {
        assert_eq!(a, b);
    }
}
