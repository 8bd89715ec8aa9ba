use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::effects::value::Value;

/// Descriptor of one external GPU transition program.
///
/// An effect is identified by its fragment name plus its parameter and
/// sampler maps; the backend resolves the name to an actual program at
/// render time. Structural equality over all three fields is the effect
/// identity the engine uses to decide whether the active
/// [`TransitionRenderer`](crate::TransitionRenderer) must be rebuilt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionEffect {
    fragment_name: String,
    /// Named numeric/vector/string program inputs.
    #[serde(default)]
    parameters: BTreeMap<String, Value>,
    /// Named auxiliary image samplers (for example a luma matte name).
    #[serde(default)]
    samplers: BTreeMap<String, String>,
}

impl TransitionEffect {
    /// Create an effect with no parameters or samplers.
    pub fn new(fragment_name: impl Into<String>) -> Self {
        Self {
            fragment_name: fragment_name.into(),
            parameters: BTreeMap::new(),
            samplers: BTreeMap::new(),
        }
    }

    /// A plain crossfade, understood by the built-in CPU backend.
    pub fn crossfade() -> Self {
        Self::new("CrossfadeFragment")
    }

    /// A directional wipe, understood by the built-in CPU backend.
    ///
    /// `direction` is one of `left_to_right`, `right_to_left`,
    /// `top_to_bottom`, `bottom_to_top` (plus the usual short aliases).
    pub fn wipe(direction: &str) -> Self {
        Self::new("WipeFragment").with_parameter("direction", direction)
    }

    /// Add or replace a named parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Add or replace a named sampler.
    pub fn with_sampler(mut self, name: impl Into<String>, image_name: impl Into<String>) -> Self {
        self.samplers.insert(name.into(), image_name.into());
        self
    }

    /// Program identity string.
    pub fn fragment_name(&self) -> &str {
        &self.fragment_name
    }

    /// Named program inputs.
    pub fn parameters(&self) -> &BTreeMap<String, Value> {
        &self.parameters
    }

    /// Named auxiliary samplers.
    pub fn samplers(&self) -> &BTreeMap<String, String> {
        &self.samplers
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transition.rs"]
mod tests;
