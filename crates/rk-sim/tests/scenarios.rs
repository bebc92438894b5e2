//! End-to-end reactor scenarios.
//!
//! Covers:
//! - constant generation heating a lone component
//! - two-node conduction relaxing to the mean without overshoot
//! - energy conservation across a conduction pair, for random geometry
//! - external reactivity passed through unchanged when feedback is off
//! - steady kinetics at zero reactivity
//! - build-time rejection of dangling link targets
//! - the per-interval step ceiling

use std::sync::Arc;

use rk_core::Timer;
use rk_core::units::{j_per_kg_k, k, kg_per_m3, m, m2, m3, per_k, w, w_per_m_k};
use rk_graph::{ComponentRegistry, RegistryBuilder, ThermalComponent};
use rk_kinetics::{KineticsConfig, KineticsSolver, ReactivitySchedule};
use rk_materials::{ConductivityModel, ConstantMaterial, Material};
use rk_sim::{
    ErrorKind, IntegratorType, ReactorModel, SimError, SimOptions, TransientModel, run_reactor,
};

use proptest::prelude::*;

fn unit_material(k_val: f64) -> Arc<dyn Material> {
    Arc::new(ConstantMaterial::new(
        "unit",
        kg_per_m3(1.0),
        j_per_kg_k(1.0),
        ConductivityModel::constant(w_per_m_k(k_val)),
    ))
}

fn quiet_kinetics(n_pg: i64, n_dg: i64, feedback: bool) -> KineticsSolver {
    KineticsSolver::new(KineticsConfig {
        n_precursor_groups: n_pg,
        n_decay_groups: n_dg,
        feedback,
        ..KineticsConfig::default()
    })
    .unwrap()
}

/// A (400 K) and B (300 K) exchanging heat through one conduction edge.
fn conduction_pair(k_val: f64) -> ComponentRegistry {
    conduction_pair_with(k_val, 1.0, 1.0)
}

fn conduction_pair_with(k_val: f64, area: f64, length: f64) -> ComponentRegistry {
    let mut b = RegistryBuilder::new();
    b.add_component(ThermalComponent::new("A", unit_material(k_val), m3(1.0), k(400.0)));
    b.add_component(ThermalComponent::new("B", unit_material(k_val), m3(1.0), k(300.0)));
    b.add_conduction("A", "B", m2(area), m(length)).unwrap();
    b.add_conduction("B", "A", m2(area), m(length)).unwrap();
    b.build().unwrap()
}

fn options(t0: f64, tf: f64, dt: f64) -> SimOptions {
    SimOptions::new(Timer::from_seconds(t0, tf, dt).unwrap())
}

#[test]
fn constant_generation_heats_linearly() {
    let mut b = RegistryBuilder::new();
    b.add_component(
        ThermalComponent::new("slab", unit_material(1.0), m3(1.0), k(300.0))
            .with_heat_generation(w(10.0)),
    );
    let model = ReactorModel::unperturbed(b.build().unwrap(), quiet_kinetics(0, 0, false));

    let trace = run_reactor(&model, &options(0.0, 1.0, 0.1)).unwrap();
    assert_eq!(trace.len(), 11);

    let temps = trace.temperature("slab").unwrap();
    assert_eq!(temps[0], 300.0);
    for (t, temp) in trace.times().iter().zip(temps) {
        assert!((temp - (300.0 + 10.0 * t)).abs() < 1e-9, "T({t}) = {temp}");
    }
    assert!((trace.final_temperature("slab").unwrap() - 310.0).abs() < 1e-9);
    assert!(trace.power().iter().all(|p| (p - 10.0).abs() < 1e-12));
}

#[test]
fn two_nodes_relax_monotonically_to_their_mean() {
    let model = ReactorModel::unperturbed(conduction_pair(1.0), quiet_kinetics(0, 0, false));
    let tight = |tf: f64, dt: f64| options(0.0, tf, dt).with_tolerances(1e-9, 1e-9);
    let trace = run_reactor(&model, &tight(2.0, 0.1)).unwrap();

    let a = trace.temperature("A").unwrap();
    let b = trace.temperature("B").unwrap();
    for i in 1..trace.len() {
        assert!(a[i] < a[i - 1], "A not decreasing at {i}");
        assert!(b[i] > b[i - 1], "B not increasing at {i}");
        assert!(a[i] > 350.0 && b[i] < 350.0, "overshoot at {i}");
    }

    // ΔT(t) = 100·exp(-2t)
    let t_end = *trace.times().last().unwrap();
    let gap = a.last().unwrap() - b.last().unwrap();
    assert!((gap - 100.0 * (-2.0 * t_end).exp()).abs() < 1e-3);

    let long = run_reactor(&model, &tight(20.0, 1.0)).unwrap();
    assert!((long.final_temperature("A").unwrap() - 350.0).abs() < 1e-3);
    assert!((long.final_temperature("B").unwrap() - 350.0).abs() < 1e-3);
}

#[test]
fn conduction_pair_conserves_energy() {
    let model = ReactorModel::unperturbed(conduction_pair(3.0), quiet_kinetics(0, 0, false));
    let trace = run_reactor(&model, &options(0.0, 5.0, 0.25)).unwrap();

    let a = trace.temperature("A").unwrap();
    let b = trace.temperature("B").unwrap();
    // unit ρ·cp·V on both sides
    for (ta, tb) in a.iter().zip(b) {
        assert!((ta + tb - 700.0).abs() < 1e-9);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn conduction_conserves_energy_for_any_geometry(
        k_val in 0.1_f64..5.0,
        area in 0.1_f64..1.0,
        length in 0.5_f64..2.0,
        method in prop::sample::select(vec![
            IntegratorType::DormandPrince,
            IntegratorType::RK4,
            IntegratorType::ForwardEuler,
        ]),
    ) {
        let model = ReactorModel::unperturbed(
            conduction_pair_with(k_val, area, length),
            quiet_kinetics(0, 0, false),
        );
        let trace = run_reactor(&model, &options(0.0, 1.0, 0.1).with_integrator(method)).unwrap();

        let a = trace.temperature("A").unwrap();
        let b = trace.temperature("B").unwrap();
        for (ta, tb) in a.iter().zip(b) {
            prop_assert!((ta + tb - 700.0).abs() < 1e-9, "sum {} with {:?}", ta + tb, method);
        }
    }
}

#[test]
fn reactivity_is_external_when_feedback_is_off() {
    let mut b = RegistryBuilder::new();
    b.add_component(
        ThermalComponent::new("fuel", unit_material(1.0), m3(1.0), k(900.0))
            .with_feedback(per_k(-5.0e-5))
            .with_heat_generation(w(50.0)),
    );
    b.add_component(ThermalComponent::new("sink", unit_material(1.0), m3(1.0), k(600.0)));
    b.add_conduction("fuel", "sink", m2(1.0), m(1.0)).unwrap();
    b.add_conduction("sink", "fuel", m2(1.0), m(1.0)).unwrap();

    let insertion = ReactivitySchedule::ramp(0.0, 1.0, 5.0e-4).unwrap();
    let model = ReactorModel::new(b.build().unwrap(), quiet_kinetics(6, 0, false), insertion);
    let trace = run_reactor(&model, &options(0.0, 1.0, 0.1)).unwrap();

    let fuel = trace.temperature("fuel").unwrap();
    assert!(fuel.last().unwrap() != &900.0);
    for (t, rho) in trace.times().iter().zip(trace.reactivity()) {
        assert_eq!(*rho, rk_kinetics::ReactivityInsertion::reactivity(&insertion, *t));
    }
}

#[test]
fn feedback_opposes_a_heating_transient() {
    let mut b = RegistryBuilder::new();
    b.add_component(
        ThermalComponent::new("fuel", unit_material(1.0), m3(1.0), k(900.0))
            .with_feedback(per_k(-1.0e-4))
            .with_heat_generation(w(100.0)),
    );
    b.add_component(ThermalComponent::new("sink", unit_material(1.0), m3(1.0), k(800.0)));
    b.add_conduction("fuel", "sink", m2(1.0), m(1.0)).unwrap();
    let registry = b.build().unwrap();

    let insertion = ReactivitySchedule::step(0.0, 1.0e-3).unwrap();
    let off = ReactorModel::new(registry.clone(), quiet_kinetics(6, 0, false), insertion);
    let on = ReactorModel::new(registry, quiet_kinetics(6, 0, true), insertion);
    let opts = options(0.0, 2.0, 0.1);

    let p_off = *run_reactor(&off, &opts).unwrap().power().last().unwrap();
    let p_on = *run_reactor(&on, &opts).unwrap().power().last().unwrap();
    assert!(p_off > 100.0);
    assert!(p_on < p_off);
}

#[test]
fn kinetics_hold_steady_without_reactivity() {
    let mut b = RegistryBuilder::new();
    b.add_component(ThermalComponent::new("core", unit_material(1.0), m3(1.0), k(600.0)));
    let model = ReactorModel::unperturbed(b.build().unwrap(), quiet_kinetics(6, 0, false));

    let trace = run_reactor(&model, &options(0.0, 10.0, 0.5)).unwrap();
    for n in trace.neutron_population() {
        assert!((n - 1.0).abs() < 1e-5, "n = {n}");
    }
}

#[test]
fn dangling_target_fails_before_integration() {
    let mut b = RegistryBuilder::new();
    b.add_component(ThermalComponent::new("fuel", unit_material(1.0), m3(1.0), k(900.0)));
    b.add_convection("fuel", "coolant", rk_core::units::w_per_m2_k(10.0), m2(1.0))
        .unwrap();

    let err = SimError::from(b.build().unwrap_err());
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
fn step_ceiling_raises_convergence_error() {
    let model = ReactorModel::unperturbed(conduction_pair(1000.0), quiet_kinetics(0, 0, false));
    let opts = options(0.0, 1.0, 1.0).with_nsteps(1);

    let err = run_reactor(&model, &opts).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Convergence);
    assert!(matches!(err, SimError::ConvergenceFailed { nsteps: 1, .. }));

    // Finer output intervals fit under the default ceiling.
    let trace = run_reactor(&model, &options(0.0, 1.0, 0.1)).unwrap();
    assert!((trace.final_temperature("A").unwrap() - 350.0).abs() < 1e-2);
}

#[test]
fn fixed_step_integrators_agree_with_adaptive() {
    let model = ReactorModel::unperturbed(conduction_pair(1.0), quiet_kinetics(0, 0, false));
    let adaptive = run_reactor(&model, &options(0.0, 1.0, 0.01)).unwrap();
    let rk4 = run_reactor(
        &model,
        &options(0.0, 1.0, 0.01).with_integrator(IntegratorType::RK4),
    )
    .unwrap();
    let euler = run_reactor(
        &model,
        &options(0.0, 1.0, 0.01).with_integrator(IntegratorType::ForwardEuler),
    )
    .unwrap();

    let exact = 350.0 + 50.0 * (-2.0_f64).exp();
    let a = adaptive.final_temperature("A").unwrap();
    let r = rk4.final_temperature("A").unwrap();
    let e = euler.final_temperature("A").unwrap();
    assert!((a - exact).abs() < 1e-4);
    assert!((r - exact).abs() < 1e-6);
    assert!((e - exact).abs() < 0.2);
}

#[test]
fn state_starts_at_initial_temperatures() {
    let model = ReactorModel::unperturbed(conduction_pair(1.0), quiet_kinetics(6, 11, false));
    let x = model.initial_state();
    assert_eq!(x.len(), model.dim());
    assert_eq!(&x[..2], &[400.0, 300.0]);
}
