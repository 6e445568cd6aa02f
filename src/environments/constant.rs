// Copyright @yucwang 2026

use std::sync::Arc;

use crate::core::computation_node::{ generate_node_id, ComputationNode };
use crate::core::environment::{ EnvironmentShader, EnvironmentShaderFactory };
use crate::core::params::{
    EntityBinding, InputMetadata, InputType, InputUse, ParamError, ParamSet,
};
use crate::math::constants::Vector3f;
use crate::math::spectrum::RGBSpectrum;

const MODEL: &str = "constant_environment";

/// Environment emitting the same radiance in every direction.
pub struct ConstantEnvironmentShader {
    id: String,
    radiance: RGBSpectrum,
}

impl ConstantEnvironmentShader {
    pub fn new(id: Option<String>, radiance: RGBSpectrum) -> Self {
        Self {
            id: id.unwrap_or_else(|| generate_node_id("ConstantEnvironmentShader")),
            radiance,
        }
    }

    pub fn radiance(&self) -> &RGBSpectrum {
        &self.radiance
    }
}

impl ComputationNode for ConstantEnvironmentShader {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_string(&self) -> String {
        format!("ConstantEnvironmentShader [id={}]", self.id)
    }
}

impl EnvironmentShader for ConstantEnvironmentShader {
    fn model(&self) -> &'static str {
        MODEL
    }

    fn evaluate(&self, _direction: &Vector3f) -> RGBSpectrum {
        self.radiance
    }
}

pub struct ConstantEnvironmentShaderFactory;

impl EnvironmentShaderFactory for ConstantEnvironmentShaderFactory {
    fn model(&self) -> &'static str {
        MODEL
    }

    fn human_readable_model(&self) -> &'static str {
        "Constant Environment Shader"
    }

    fn input_metadata(&self) -> Vec<InputMetadata> {
        vec![
            InputMetadata {
                name: "radiance",
                label: "Radiance",
                input_type: InputType::Spectrum,
                entity_types: &[EntityBinding::Color],
                usage: InputUse::Required,
                default: Some("1.0"),
            },
        ]
    }

    fn create(&self, name: &str, params: &ParamSet)
        -> Result<Arc<dyn EnvironmentShader>, ParamError> {
        let radiance = params.spectrum("radiance")?;
        Ok(Arc::new(ConstantEnvironmentShader::new(Some(name.to_string()), radiance)))
    }
}
