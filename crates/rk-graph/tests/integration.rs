//! Integration tests for rk-graph.

use std::sync::Arc;

use rk_core::units::{j_per_kg_k, k, kg_per_m3, kgps, m, m2, m3, w, w_per_m2_k, w_per_m_k};
use rk_graph::{GraphError, RegistryBuilder, ThermalComponent};
use rk_materials::{ConductivityModel, ConstantMaterial, Material, builtin};

fn unit_material() -> Arc<dyn Material> {
    Arc::new(ConstantMaterial::new(
        "unit",
        kg_per_m3(1.0),
        j_per_kg_k(1.0),
        ConductivityModel::constant(w_per_m_k(1.0)),
    ))
}

#[test]
fn fuel_coolant_reflector_network() {
    // fuel -> coolant by convection, coolant <-> reflector by conduction,
    // coolant fed by an inlet plenum through advection.
    let mut b = RegistryBuilder::new();
    b.add_component(
        ThermalComponent::new("fuel", builtin("uo2").unwrap(), m3(0.01), k(900.0))
            .with_heat_generation(w(1.0e5)),
    );
    b.add_component(ThermalComponent::new(
        "coolant",
        builtin("flibe").unwrap(),
        m3(0.1),
        k(850.0),
    ));
    b.add_component(ThermalComponent::new(
        "reflector",
        builtin("graphite").unwrap(),
        m3(1.0),
        k(850.0),
    ));
    b.add_component(ThermalComponent::new(
        "inlet",
        builtin("flibe").unwrap(),
        m3(1.0),
        k(800.0),
    ));

    b.add_convection("fuel", "coolant", w_per_m2_k(4700.0), m2(0.5))
        .unwrap();
    b.add_convection("coolant", "fuel", w_per_m2_k(4700.0), m2(0.5))
        .unwrap();
    b.add_conduction("coolant", "reflector", m2(1.0), m(0.5))
        .unwrap();
    b.add_conduction("reflector", "coolant", m2(1.0), m(0.5))
        .unwrap();
    b.add_advection("coolant", "inlet", kgps(2.0)).unwrap();

    let reg = b.build().unwrap();
    assert_eq!(reg.len(), 4);
    assert_eq!(reg.link_count(), 5);
    assert_eq!(reg.total_nominal_power().value, 1.0e5);

    let temps = reg.initial_state();
    let mut dtdt = vec![0.0; reg.len()];
    reg.temperature_derivatives(&temps, 1.0, &mut dtdt).unwrap();

    // convection loss 4700*0.5*50 W outweighs the 1e5 W source
    assert!(dtdt[0] < 0.0);
    // coolant gains from fuel, loses to cold inlet stream
    let q_cool = reg.net_heat(1, &temps, 1.0).unwrap();
    assert!(q_cool.is_finite());
    // reflector starts at the coolant temperature
    assert_eq!(dtdt[2], 0.0);
    // plenum has no links and no source
    assert_eq!(dtdt[3], 0.0);
}

#[test]
fn chain_of_components_conserves_link_heat() {
    let names = ["n0", "n1", "n2", "n3"];
    let mut b = RegistryBuilder::new();
    for (i, name) in names.iter().enumerate() {
        b.add_component(ThermalComponent::new(
            *name,
            unit_material(),
            m3(1.0),
            k(300.0 + 25.0 * i as f64),
        ));
    }
    for pair in names.windows(2) {
        b.add_conduction(pair[0], pair[1], m2(1.0), m(1.0)).unwrap();
        b.add_conduction(pair[1], pair[0], m2(1.0), m(1.0)).unwrap();
    }
    let reg = b.build().unwrap();

    let temps = reg.initial_state();
    let mut dtdt = vec![0.0; reg.len()];
    reg.temperature_derivatives(&temps, 1.0, &mut dtdt).unwrap();

    // unit capacitance: dT/dt equals net heat and sums to zero
    let total: f64 = dtdt.iter().sum();
    assert!(total.abs() < 1e-12);
    assert_eq!(dtdt[0], 25.0);
    assert_eq!(dtdt[3], -25.0);
}

#[test]
fn duplicate_names_are_rejected_at_build() {
    let mut b = RegistryBuilder::new();
    b.add_component(ThermalComponent::new("x", unit_material(), m3(1.0), k(300.0)));
    b.add_component(ThermalComponent::new("x", unit_material(), m3(1.0), k(310.0)));
    assert_eq!(
        b.build().unwrap_err(),
        GraphError::DuplicateName { name: "x".into() }
    );
}

#[test]
fn component_lookup_by_id_and_name() {
    let mut b = RegistryBuilder::new();
    let id = b.add_component(ThermalComponent::new("core", unit_material(), m3(1.0), k(600.0)));
    let reg = b.build().unwrap();
    assert_eq!(reg.component(id).unwrap().name(), "core");
    assert_eq!(reg.id_of("core"), Some(id));
    assert_eq!(reg.names().collect::<Vec<_>>(), vec!["core"]);
}
