use std::fmt;

use crate::{
    foundation::error::{BelleError, BelleResult},
    scene::layer::Layer,
};

/// Named, ordered collection of layers extracted from one source file.
#[derive(Clone, Debug)]
pub struct Scene {
    name: String,
    layers: Vec<Layer>,
}

impl Scene {
    /// Create a scene from layers in drawing order.
    pub fn new(name: impl Into<String>, layers: Vec<Layer>) -> Self {
        Self {
            name: name.into(),
            layers,
        }
    }

    /// Scene name (the source file stem).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Layers in extraction order (bottom first).
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer_names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(Layer::name)
    }

    /// Look a layer up by name; a miss is logged and yields `None`.
    pub fn get_layer(&self, layer_name: &str) -> Option<&Layer> {
        let found = self.layers.iter().find(|l| l.name() == layer_name);
        if found.is_none() {
            tracing::warn!(
                scene = %self.name,
                layer = layer_name,
                "layer does not exist in scene"
            );
        }
        found
    }

    /// Like [`Scene::get_layer`], but a miss is a validation error.
    pub fn require_layer(&self, layer_name: &str) -> BelleResult<&Layer> {
        self.get_layer(layer_name).ok_or_else(|| {
            BelleError::validation(format!(
                "layer \"{layer_name}\" does not exist in scene \"{}\"",
                self.name
            ))
        })
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scene: \"{}\"", self.name)?;
        if self.layers.is_empty() {
            return Ok(());
        }
        let names: Vec<&str> = self.layer_names().collect();
        write!(f, " - [\"{}\"]", names.join("\", \""))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
