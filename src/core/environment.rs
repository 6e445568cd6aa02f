// Copyright @yucwang 2026

use std::sync::Arc;

use crate::core::computation_node::ComputationNode;
use crate::core::params::{ InputMetadata, ParamError, ParamSet };
use crate::math::constants::Vector3f;
use crate::math::spectrum::RGBSpectrum;

/// Radiance arriving from infinity along a world-space direction.
pub trait EnvironmentShader: ComputationNode + Send + Sync {
    fn model(&self) -> &'static str;

    /// `direction` points away from the scene, toward the environment.
    fn evaluate(&self, direction: &Vector3f) -> RGBSpectrum;
}

pub trait EnvironmentShaderFactory: Send + Sync {
    fn model(&self) -> &'static str;

    fn human_readable_model(&self) -> &'static str;

    fn input_metadata(&self) -> Vec<InputMetadata>;

    fn create(&self, name: &str, params: &ParamSet)
        -> Result<Arc<dyn EnvironmentShader>, ParamError>;
}
