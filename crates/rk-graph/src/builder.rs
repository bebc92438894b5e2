//! Incremental registry builder.

use rk_core::CompId;
use rk_core::units::{Area, FilmCoefficient, Length, MassRate};

use crate::component::ThermalComponent;
use crate::error::{GraphError, GraphResult};
use crate::registry::ComponentRegistry;
use crate::validate;

/// Builder for assembling a thermal network.
///
/// Components are added first; links can be attached either on the
/// component before it is added or by name through the builder. Link
/// targets are only resolved by `build()`, so forward references are fine.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    components: Vec<ThermalComponent>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component and return its ID (its slot in the state vector).
    pub fn add_component(&mut self, component: ThermalComponent) -> CompId {
        let id = CompId::from_slot(self.components.len());
        self.components.push(component);
        id
    }

    /// Mutable access to an already-added component by name.
    pub fn component_mut(&mut self, name: &str) -> GraphResult<&mut ThermalComponent> {
        self.components
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| GraphError::UnknownComponent {
                name: name.to_string(),
            })
    }

    /// Conduction link owned by `from`, pointing at `to`.
    pub fn add_conduction(
        &mut self,
        from: &str,
        to: &str,
        area: Area,
        length: Length,
    ) -> GraphResult<()> {
        self.component_mut(from)?.add_conduction(to, area, length)
    }

    /// Convection link owned by `from`, pointing at `to`.
    pub fn add_convection(
        &mut self,
        from: &str,
        to: &str,
        h: FilmCoefficient,
        area: Area,
    ) -> GraphResult<()> {
        self.component_mut(from)?.add_convection(to, h, area)
    }

    /// Advection link owned by `from`: a stream of `mass_flow` arriving from `to`.
    pub fn add_advection(&mut self, from: &str, to: &str, mass_flow: MassRate) -> GraphResult<()> {
        self.component_mut(from)?.add_advection(to, mass_flow)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Validate and freeze into a `ComponentRegistry`.
    pub fn build(self) -> GraphResult<ComponentRegistry> {
        let by_name = validate::validate_components(&self.components)?;
        let targets = validate::resolve_links(&self.components, &by_name)?;

        tracing::debug!(
            components = self.components.len(),
            links = targets.iter().map(Vec::len).sum::<usize>(),
            "thermal registry built"
        );

        Ok(ComponentRegistry::from_parts(self.components, targets, by_name))
    }
}
