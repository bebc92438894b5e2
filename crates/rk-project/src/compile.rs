//! Lowering of a validated `ModelDef` into a runnable reactor model.

use std::collections::HashMap;
use std::sync::Arc;

use rk_core::units::{j_per_kg_k, k, kg_per_m3, kgps, m, m2, m3, per_k, w, w_per_m2_k};
use rk_core::{Dimension, Timer, UnitValue};
use rk_graph::{RegistryBuilder, ThermalComponent};
use rk_kinetics::{KineticsConfig, KineticsSolver, ReactivitySchedule};
use rk_materials::{ConductivityModel, ConstantMaterial, LinearDensityMaterial, Material};
use rk_sim::{IntegratorType, ReactorModel, SimError, SimOptions};

use crate::ProjectResult;
use crate::schema::{LinkDef, MaterialDef, ModelDef, ReactivityDef};
use crate::validate::{DENSITY_SLOPE, quantity, validate_model};

/// A model ready to hand to `rk_sim::run_reactor`.
#[derive(Debug)]
pub struct CompiledModel {
    pub model: ReactorModel,
    pub options: SimOptions,
}

/// Validate `def` and assemble registry, kinetics, insertion and run options.
pub fn compile(def: &ModelDef) -> ProjectResult<CompiledModel> {
    validate_model(def)?;

    let materials = compile_materials(def)?;

    let mut builder = RegistryBuilder::new();
    for c in &def.components {
        let field = |f: &str| format!("components.{}.{f}", c.name);
        let material = materials
            .get(c.material.as_str())
            .cloned()
            .ok_or_else(|| SimError::InvalidArg {
                what: "component references an unknown material",
            })?;
        let mut component = ThermalComponent::new(
            c.name.clone(),
            material,
            m3(quantity(&field("volume"), &c.volume, Dimension::VOLUME)?),
            k(quantity(
                &field("initial_temperature"),
                &c.initial_temperature,
                Dimension::TEMPERATURE,
            )?),
        );
        if let Some(alpha) = &c.feedback_coefficient {
            component = component.with_feedback(per_k(quantity(
                &field("feedback_coefficient"),
                alpha,
                Dimension::TEMPERATURE_COEFFICIENT,
            )?));
        }
        if let Some(power) = &c.heat_generation {
            component = component.with_heat_generation(w(quantity(
                &field("heat_generation"),
                power,
                Dimension::POWER,
            )?));
        }
        builder.add_component(component);
    }

    for (i, link) in def.links.iter().enumerate() {
        let field = |f: &str| format!("links[{i}].{f}");
        let (from, to) = link.endpoints();
        match link {
            LinkDef::Conduction {
                area,
                length,
                reciprocal,
                ..
            } => {
                let area = m2(quantity(&field("area"), area, Dimension::AREA)?);
                let length = m(quantity(&field("length"), length, Dimension::LENGTH)?);
                builder.add_conduction(from, to, area, length).map_err(SimError::from)?;
                if *reciprocal {
                    builder.add_conduction(to, from, area, length).map_err(SimError::from)?;
                }
            }
            LinkDef::Convection {
                h, area, reciprocal, ..
            } => {
                let h = w_per_m2_k(quantity(&field("h"), h, Dimension::FILM_COEFFICIENT)?);
                let area = m2(quantity(&field("area"), area, Dimension::AREA)?);
                builder.add_convection(from, to, h, area).map_err(SimError::from)?;
                if *reciprocal {
                    builder.add_convection(to, from, h, area).map_err(SimError::from)?;
                }
            }
            LinkDef::Advection { mass_flow, .. } => {
                let flow = kgps(quantity(&field("mass_flow"), mass_flow, Dimension::MASS_RATE)?);
                builder.add_advection(from, to, flow).map_err(SimError::from)?;
            }
        }
    }
    let registry = builder.build().map_err(SimError::from)?;

    let kinetics = KineticsSolver::new(KineticsConfig {
        isotope: def.kinetics.fission_isotope.parse().map_err(SimError::from)?,
        spectrum: def.kinetics.spectrum.parse().map_err(SimError::from)?,
        n_precursor_groups: def.kinetics.n_precursor_groups,
        n_decay_groups: def.kinetics.n_decay_groups,
        feedback: def.kinetics.feedback,
    })
    .map_err(SimError::from)?;

    let insertion = compile_reactivity(&def.reactivity)?;

    let model = ReactorModel::new(registry, kinetics, insertion)
        .with_parallel(def.integrator.parallel);

    let timer = Timer::from_seconds(
        quantity("timer.t0", &def.timer.t0, Dimension::TIME)?,
        quantity("timer.tf", &def.timer.tf, Dimension::TIME)?,
        quantity("timer.dt", &def.timer.dt, Dimension::TIME)?,
    )
    .map_err(SimError::from)?;
    let integrator: IntegratorType = def.integrator.method.parse()?;
    let options = SimOptions::new(timer)
        .with_integrator(integrator)
        .with_nsteps(usize::try_from(def.integrator.nsteps).unwrap_or(usize::MAX))
        .with_tolerances(def.integrator.rtol, def.integrator.atol);

    tracing::debug!(
        name = %def.name,
        components = model.registry().len(),
        links = model.registry().link_count(),
        dim = rk_sim::TransientModel::dim(&model),
        integrator = integrator.as_str(),
        "model compiled"
    );

    Ok(CompiledModel { model, options })
}

fn compile_materials(def: &ModelDef) -> ProjectResult<HashMap<&str, Arc<dyn Material>>> {
    let mut out = HashMap::with_capacity(def.materials.len());
    for material in &def.materials {
        let built: Arc<dyn Material> = match material {
            MaterialDef::Builtin { name, .. } => rk_materials::builtin(name).map_err(SimError::from)?,
            MaterialDef::Custom {
                id,
                density,
                density_slope,
                specific_heat,
                conductivity,
            } => {
                let field = |f: &str| format!("materials.{id}.{f}");
                let rho = quantity(&field("density"), density, Dimension::DENSITY)?;
                let cp = j_per_kg_k(quantity(
                    &field("specific_heat"),
                    specific_heat,
                    Dimension::SPECIFIC_HEAT,
                )?);
                let a = quantity(&field("conductivity.a"), &conductivity.a, Dimension::CONDUCTIVITY)?;
                let b = quantity(
                    &field("conductivity.b"),
                    &conductivity.b,
                    Dimension::CONDUCTIVITY_SLOPE,
                )?;
                let cond = ConductivityModel::from_kind(
                    &conductivity.kind,
                    UnitValue::new(a, Dimension::CONDUCTIVITY),
                    UnitValue::new(b, Dimension::CONDUCTIVITY_SLOPE),
                )
                .map_err(SimError::from)?;
                let custom: Arc<dyn Material> = if let Some(slope) = density_slope {
                    let slope = quantity(&field("density_slope"), slope, DENSITY_SLOPE)?;
                    Arc::new(LinearDensityMaterial::new(id.clone(), rho, slope, cp, cond))
                } else {
                    Arc::new(ConstantMaterial::new(id.clone(), kg_per_m3(rho), cp, cond))
                };
                custom
            }
        };
        out.insert(material.id(), built);
    }
    Ok(out)
}

fn compile_reactivity(def: &ReactivityDef) -> ProjectResult<ReactivitySchedule> {
    let time = |field: &str, text: &str| quantity(&format!("reactivity.{field}"), text, Dimension::TIME);
    let rho = |text: &str| quantity("reactivity.rho", text, Dimension::DIMENSIONLESS);
    let schedule = match def {
        ReactivityDef::None => Ok(ReactivitySchedule::None),
        ReactivityDef::Step { time: t, rho: r } => ReactivitySchedule::step(time("time", t)?, rho(r)?),
        ReactivityDef::Ramp { start, end, rho: r } => {
            ReactivitySchedule::ramp(time("start", start)?, time("end", end)?, rho(r)?)
        }
        ReactivityDef::Impulse {
            start,
            duration,
            rho: r,
        } => ReactivitySchedule::impulse(time("start", start)?, time("duration", duration)?, rho(r)?),
    }
    .map_err(SimError::from)?;
    Ok(schedule)
}
