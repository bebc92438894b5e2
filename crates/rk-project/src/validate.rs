//! Model validation logic.

use std::collections::HashSet;

use rk_core::quantity::UnitParseError;
use rk_core::{Dimension, Timer, UnitValue};
use rk_kinetics::{FissionIsotope, Spectrum};
use rk_materials::ConductivityKind;
use rk_sim::IntegratorType;

use crate::schema::{ComponentDef, LinkDef, MaterialDef, ModelDef, ReactivityDef};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid quantity for {field}: {source}")]
    Quantity {
        field: String,
        source: UnitParseError,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

impl ValidationError {
    /// True when the failure is a dimension mismatch rather than bad syntax.
    pub fn is_dimension(&self) -> bool {
        matches!(
            self,
            ValidationError::Quantity {
                source: UnitParseError::Dimension(_),
                ..
            }
        )
    }
}

/// Parse `text` as a quantity of dimension `dim`, returning its SI magnitude.
pub fn quantity(field: &str, text: &str, dim: Dimension) -> Result<f64, ValidationError> {
    UnitValue::parse_as(text, dim)
        .map(|v| v.value())
        .map_err(|source| ValidationError::Quantity {
            field: field.to_string(),
            source,
        })
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_model(model: &ModelDef) -> Result<(), ValidationError> {
    if model.version == 0 || model.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: model.version,
        });
    }

    validate_timer(model)?;
    validate_kinetics(model)?;
    validate_integrator(model)?;

    let mut material_ids = HashSet::new();
    for material in &model.materials {
        if !material_ids.insert(material.id()) {
            return Err(ValidationError::DuplicateId {
                id: material.id().to_string(),
                context: "materials".to_string(),
            });
        }
        validate_material(material)?;
    }

    let mut component_names = HashSet::new();
    for component in &model.components {
        if !component_names.insert(component.name.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: component.name.clone(),
                context: "components".to_string(),
            });
        }
        validate_component(component, &material_ids)?;
    }

    for (i, link) in model.links.iter().enumerate() {
        validate_link(i, link, &component_names)?;
    }

    validate_reactivity(&model.reactivity)?;
    Ok(())
}

fn validate_timer(model: &ModelDef) -> Result<(), ValidationError> {
    let t0 = quantity("timer.t0", &model.timer.t0, Dimension::TIME)?;
    let tf = quantity("timer.tf", &model.timer.tf, Dimension::TIME)?;
    let dt = quantity("timer.dt", &model.timer.dt, Dimension::TIME)?;
    Timer::from_seconds(t0, tf, dt).map_err(|e| invalid("timer", format!("{t0}..{tf} by {dt}"), e.to_string()))?;
    Ok(())
}

fn validate_kinetics(model: &ModelDef) -> Result<(), ValidationError> {
    let k = &model.kinetics;
    k.fission_isotope
        .parse::<FissionIsotope>()
        .map_err(|e| invalid("kinetics.fission_isotope", &k.fission_isotope, e.to_string()))?;
    k.spectrum
        .parse::<Spectrum>()
        .map_err(|e| invalid("kinetics.spectrum", &k.spectrum, e.to_string()))?;
    if k.n_precursor_groups < 0 {
        return Err(invalid(
            "kinetics.n_precursor_groups",
            k.n_precursor_groups,
            "must not be negative",
        ));
    }
    if k.n_decay_groups < 0 {
        return Err(invalid(
            "kinetics.n_decay_groups",
            k.n_decay_groups,
            "must not be negative",
        ));
    }
    Ok(())
}

fn validate_integrator(model: &ModelDef) -> Result<(), ValidationError> {
    let i = &model.integrator;
    i.method
        .parse::<IntegratorType>()
        .map_err(|_| invalid("integrator.method", &i.method, format!("options: {}", IntegratorType::OPTIONS)))?;
    if i.nsteps <= 0 {
        return Err(invalid("integrator.nsteps", i.nsteps, "must be positive"));
    }
    if !(i.rtol.is_finite() && i.rtol > 0.0) {
        return Err(invalid("integrator.rtol", i.rtol, "must be positive"));
    }
    if !(i.atol.is_finite() && i.atol > 0.0) {
        return Err(invalid("integrator.atol", i.atol, "must be positive"));
    }
    Ok(())
}

fn validate_material(material: &MaterialDef) -> Result<(), ValidationError> {
    match material {
        MaterialDef::Builtin { id, name } => {
            if rk_materials::catalog().iter().all(|e| !e.matches(name)) {
                return Err(ValidationError::MissingReference {
                    id: name.clone(),
                    context: format!("material '{id}' builtin catalog"),
                });
            }
        }
        MaterialDef::Custom {
            id,
            density,
            density_slope,
            specific_heat,
            conductivity,
        } => {
            let ctx = |f: &str| format!("materials.{id}.{f}");
            quantity(&ctx("density"), density, Dimension::DENSITY)?;
            if let Some(slope) = density_slope {
                quantity(&ctx("density_slope"), slope, DENSITY_SLOPE)?;
            }
            quantity(&ctx("specific_heat"), specific_heat, Dimension::SPECIFIC_HEAT)?;
            conductivity
                .kind
                .parse::<ConductivityKind>()
                .map_err(|e| invalid(ctx("conductivity.kind"), &conductivity.kind, e.to_string()))?;
            quantity(&ctx("conductivity.a"), &conductivity.a, Dimension::CONDUCTIVITY)?;
            quantity(
                &ctx("conductivity.b"),
                &conductivity.b,
                Dimension::CONDUCTIVITY_SLOPE,
            )?;
        }
    }
    Ok(())
}

/// kg/(m³·K)
pub(crate) const DENSITY_SLOPE: Dimension = Dimension::new(-3, 1, 0, -1);

fn validate_component(
    component: &ComponentDef,
    material_ids: &HashSet<&str>,
) -> Result<(), ValidationError> {
    let ctx = |f: &str| format!("components.{}.{f}", component.name);
    if component.name.trim().is_empty() {
        return Err(invalid("components.name", "", "must not be empty"));
    }
    if !material_ids.contains(component.material.as_str()) {
        return Err(ValidationError::MissingReference {
            id: component.material.clone(),
            context: ctx("material"),
        });
    }
    let volume = quantity(&ctx("volume"), &component.volume, Dimension::VOLUME)?;
    if volume <= 0.0 {
        return Err(invalid(ctx("volume"), &component.volume, "must be positive"));
    }
    let t0 = quantity(
        &ctx("initial_temperature"),
        &component.initial_temperature,
        Dimension::TEMPERATURE,
    )?;
    if t0 <= 0.0 {
        return Err(invalid(
            ctx("initial_temperature"),
            &component.initial_temperature,
            "must be above absolute zero",
        ));
    }
    if let Some(alpha) = &component.feedback_coefficient {
        quantity(
            &ctx("feedback_coefficient"),
            alpha,
            Dimension::TEMPERATURE_COEFFICIENT,
        )?;
    }
    if let Some(power) = &component.heat_generation {
        let p = quantity(&ctx("heat_generation"), power, Dimension::POWER)?;
        if p < 0.0 {
            return Err(invalid(ctx("heat_generation"), power, "must not be negative"));
        }
    }
    Ok(())
}

fn validate_link(
    index: usize,
    link: &LinkDef,
    component_names: &HashSet<&str>,
) -> Result<(), ValidationError> {
    let ctx = |f: &str| format!("links[{index}].{f}");
    let (from, to) = link.endpoints();
    for (field, name) in [("from", from), ("to", to)] {
        if !component_names.contains(name) {
            return Err(ValidationError::MissingReference {
                id: name.to_string(),
                context: ctx(field),
            });
        }
    }
    if from == to {
        return Err(invalid(ctx("to"), to, "a link cannot point at its own component"));
    }

    let positive = |field: &str, text: &str, dim: Dimension| -> Result<(), ValidationError> {
        if quantity(&ctx(field), text, dim)? <= 0.0 {
            return Err(invalid(ctx(field), text, "must be positive"));
        }
        Ok(())
    };
    match link {
        LinkDef::Conduction { area, length, .. } => {
            positive("area", area, Dimension::AREA)?;
            positive("length", length, Dimension::LENGTH)?;
        }
        LinkDef::Convection { h, area, .. } => {
            positive("h", h, Dimension::FILM_COEFFICIENT)?;
            positive("area", area, Dimension::AREA)?;
        }
        LinkDef::Advection { mass_flow, .. } => {
            positive("mass_flow", mass_flow, Dimension::MASS_RATE)?;
        }
    }
    Ok(())
}

fn validate_reactivity(reactivity: &ReactivityDef) -> Result<(), ValidationError> {
    let time = |field: &str, text: &str| quantity(&format!("reactivity.{field}"), text, Dimension::TIME);
    let rho = |text: &str| quantity("reactivity.rho", text, Dimension::DIMENSIONLESS);
    match reactivity {
        ReactivityDef::None => {}
        ReactivityDef::Step { time: t, rho: r } => {
            time("time", t)?;
            rho(r)?;
        }
        ReactivityDef::Ramp { start, end, rho: r } => {
            let s = time("start", start)?;
            let e = time("end", end)?;
            rho(r)?;
            if e <= s {
                return Err(invalid("reactivity.end", end, "must be after start"));
            }
        }
        ReactivityDef::Impulse {
            start,
            duration,
            rho: r,
        } => {
            time("start", start)?;
            if time("duration", duration)? <= 0.0 {
                return Err(invalid("reactivity.duration", duration, "must be positive"));
            }
            rho(r)?;
        }
    }
    Ok(())
}
