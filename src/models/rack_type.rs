//! Rack type registry resolving a type tag to its capacity limits.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Capacity limits of a rack model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RackType {
    /// Type tag (e.g. "42u-standard")
    pub name: String,
    /// Number of rack units
    pub units: u32,
    /// Maximum static load in kilograms
    pub max_weight: f64,
}

impl RackType {
    /// Creates a rack type.
    pub fn new(name: impl Into<String>, units: u32, max_weight: f64) -> Self {
        Self {
            name: name.into(),
            units,
            max_weight,
        }
    }

    /// Checks that the type describes a usable rack.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            anyhow::bail!("Rack type name cannot be empty");
        }
        if self.units == 0 {
            anyhow::bail!("Rack type '{}' must have at least one unit", self.name);
        }
        if !self.max_weight.is_finite() || self.max_weight <= 0.0 {
            anyhow::bail!(
                "Rack type '{}' must have a positive maximum weight (got {})",
                self.name,
                self.max_weight
            );
        }
        Ok(())
    }
}

/// Lookup table of known rack types.
#[derive(Debug, Clone, PartialEq)]
pub struct RackTypeRegistry {
    types: BTreeMap<String, RackType>,
}

impl RackTypeRegistry {
    /// Registry holding only the built-in rack types.
    #[must_use]
    pub fn builtin() -> Self {
        let types = [
            RackType::new("42u-standard", 42, 1000.0),
            RackType::new("48u-tall", 48, 1200.0),
            RackType::new("24u-standard", 24, 600.0),
            RackType::new("12u-wall", 12, 100.0),
        ]
        .into_iter()
        .map(|rack_type| (rack_type.name.clone(), rack_type))
        .collect();

        Self { types }
    }

    /// Built-ins plus `custom`, with custom entries replacing built-ins of the same tag.
    ///
    /// # Errors
    ///
    /// Returns an error if any custom type fails validation.
    pub fn with_custom(custom: &[RackType]) -> Result<Self> {
        let mut registry = Self::builtin();
        for rack_type in custom {
            registry.register(rack_type.clone())?;
        }
        Ok(registry)
    }

    /// Adds or replaces a rack type.
    pub fn register(&mut self, rack_type: RackType) -> Result<()> {
        rack_type.validate()?;
        self.types.insert(rack_type.name.clone(), rack_type);
        Ok(())
    }

    /// Resolves a type tag.
    ///
    /// # Errors
    ///
    /// Returns an error naming the known tags if `tag` is not registered.
    pub fn resolve(&self, tag: &str) -> Result<&RackType> {
        self.types.get(tag).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown rack type '{tag}'. Known types: {}",
                self.names().collect::<Vec<_>>().join(", ")
            )
        })
    }

    /// Registered type tags in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

impl Default for RackTypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
