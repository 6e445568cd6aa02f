// Copyright @yucwang 2023

use std::any::Any;
use std::fmt;
use std::ops::{ BitOr, BitOrAssign };
use std::sync::Arc;

use crate::core::computation_node::ComputationNode;
use crate::core::params::{ InputMetadata, ParamError, ParamSet };
use crate::core::rng::SamplingContext;
use crate::math::constants::{ Float, Vector3f };
use crate::math::frame::Frame;
use crate::math::spectrum::RGBSpectrum;

// Definitions of types used in BSDF sampling and eval
// processes
pub type BSDFValue = RGBSpectrum;

/// Bit set classifying scattering events by lobe kind and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScatteringFlag(u8);

impl ScatteringFlag {
    pub const NONE: ScatteringFlag = ScatteringFlag(0);
    pub const DIFFUSE: ScatteringFlag = ScatteringFlag(1 << 0);
    pub const GLOSSY: ScatteringFlag = ScatteringFlag(1 << 1);
    pub const SPECULAR: ScatteringFlag = ScatteringFlag(1 << 2);
    pub const REFLECTIVE: ScatteringFlag = ScatteringFlag(1 << 3);
    pub const TRANSMISSIVE: ScatteringFlag = ScatteringFlag(1 << 4);
    pub const ALL_LOBES: ScatteringFlag = ScatteringFlag(0b0000_0111);

    /// True when the two sets share at least one bit.
    pub fn contains(&self, other: ScatteringFlag) -> bool {
        (self.0 & other.0) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ScatteringFlag {
    type Output = ScatteringFlag;

    fn bitor(self, rhs: ScatteringFlag) -> ScatteringFlag {
        ScatteringFlag(self.0 | rhs.0)
    }
}

impl BitOrAssign for ScatteringFlag {
    fn bitor_assign(&mut self, rhs: ScatteringFlag) {
        self.0 |= rhs.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BSDFSampleRecord {
    /// Sampled incoming direction, in the same space as `outgoing`.
    pub incoming: Vector3f,
    pub value: BSDFValue,
    pub pdf: Float,
    pub mode: ScatteringFlag,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BSDFEvalResult {
    pub value: BSDFValue,
    pub pdf: Float,
}

impl Default for BSDFEvalResult {
    fn default() -> Self {
        Self {
            value: BSDFValue::default(),
            pdf: 0.0,
        }
    }
}

/// `|cos|` weighting shared by every model.
///
/// In adjoint (light tracing) mode the factor also corrects for the
/// difference between shading and geometric normals. A grazing outgoing
/// direction yields zero rather than a division blow-up.
pub fn cosine_multiplier(
    adjoint: bool,
    geometric_normal: &Vector3f,
    shading_basis: &Frame,
    outgoing: &Vector3f,
    incoming: &Vector3f,
) -> Float {
    if adjoint {
        let cos_og = outgoing.dot(geometric_normal).abs();
        if cos_og <= 0.0 {
            return 0.0;
        }
        let cos_on = outgoing.dot(shading_basis.normal()).abs();
        let cos_ig = incoming.dot(geometric_normal).abs();
        cos_on * cos_ig / cos_og
    } else {
        incoming.dot(shading_basis.normal()).abs()
    }
}

/// A scattering model.
///
/// Models are stateless with respect to shading points: per-point inputs
/// arrive as an opaque block that each model downcasts to its own input
/// type. Directions point away from the surface and `incoming` lives in
/// the same space as `outgoing`.
pub trait BSDF: ComputationNode + Send + Sync {
    /// Machine-readable model identifier, unique across the registry.
    fn model(&self) -> &'static str;

    /// The scattering modes this model can produce.
    fn scattering_flag(&self) -> ScatteringFlag;

    /// Draw one incoming direction for `outgoing`.
    ///
    /// Returns `None` when no valid direction could be produced; any
    /// returned record carries a strictly positive pdf. When
    /// `cosine_mult` is set the `|cos|` factor is already folded into
    /// the returned value.
    fn sample(
        &self,
        sampling_context: &mut SamplingContext,
        inputs: &dyn Any,
        adjoint: bool,
        cosine_mult: bool,
        geometric_normal: &Vector3f,
        shading_basis: &Frame,
        outgoing: &Vector3f,
    ) -> Option<BSDFSampleRecord>;

    /// Evaluate value and pdf for a fixed direction pair, restricted to
    /// the scattering modes in `modes`.
    fn eval(
        &self,
        inputs: &dyn Any,
        adjoint: bool,
        cosine_mult: bool,
        geometric_normal: &Vector3f,
        shading_basis: &Frame,
        outgoing: &Vector3f,
        incoming: &Vector3f,
        modes: ScatteringFlag,
    ) -> BSDFEvalResult;

    /// Probability density `sample` would have used for this pair,
    /// restricted to the scattering modes in `modes`.
    fn pdf(
        &self,
        inputs: &dyn Any,
        geometric_normal: &Vector3f,
        shading_basis: &Frame,
        outgoing: &Vector3f,
        incoming: &Vector3f,
        modes: ScatteringFlag,
    ) -> Float;
}

/// Builds instances of one BSDF model and describes its inputs.
pub trait BSDFFactory: Send + Sync {
    fn model(&self) -> &'static str;

    fn human_readable_model(&self) -> &'static str;

    /// Declared inputs, in declaration order.
    fn input_metadata(&self) -> Vec<InputMetadata>;

    fn create(&self, name: &str, params: &ParamSet) -> Result<Arc<dyn BSDF>, ParamError>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum CreateError {
    UnknownModel(String),
    Param(ParamError),
}

impl fmt::Display for CreateError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CreateError::UnknownModel(model) => {
                write!(f, "no factory registered for model \"{}\"", model)
            }
            CreateError::Param(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CreateError {}

impl From<ParamError> for CreateError {
    fn from(err: ParamError) -> Self {
        CreateError::Param(err)
    }
}

/// Factories keyed by model identifier.
#[derive(Default)]
pub struct BSDFFactoryRegistry {
    factories: Vec<Box<dyn BSDFFactory>>,
}

impl BSDFFactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with every model shipped by this crate.
    pub fn built_in() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(crate::materials::lambertian_diffuse::LambertianDiffuseBSDFFactory));
        registry
    }

    /// Replaces any factory previously registered for the same model.
    pub fn register(&mut self, factory: Box<dyn BSDFFactory>) {
        self.factories.retain(|f| f.model() != factory.model());
        self.factories.push(factory);
    }

    pub fn lookup(&self, model: &str) -> Option<&dyn BSDFFactory> {
        self.factories.iter().find(|f| f.model() == model).map(|f| f.as_ref())
    }

    pub fn models(&self) -> Vec<&'static str> {
        self.factories.iter().map(|f| f.model()).collect()
    }

    pub fn create(&self, model: &str, name: &str, params: &ParamSet)
        -> Result<Arc<dyn BSDF>, CreateError> {
        let factory = self.lookup(model)
            .ok_or_else(|| CreateError::UnknownModel(model.to_string()))?;
        Ok(factory.create(name, params)?)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scattering_flag_bits() {
        let mut flag = ScatteringFlag::DIFFUSE;
        flag |= ScatteringFlag::REFLECTIVE;

        assert!(flag.contains(ScatteringFlag::DIFFUSE));
        assert!(flag.contains(ScatteringFlag::REFLECTIVE));
        assert!(!flag.contains(ScatteringFlag::GLOSSY));
        assert!(ScatteringFlag::NONE.is_empty());
        assert!(ScatteringFlag::ALL_LOBES.contains(ScatteringFlag::DIFFUSE));
        assert!(ScatteringFlag::ALL_LOBES.contains(ScatteringFlag::GLOSSY));
        assert!(ScatteringFlag::ALL_LOBES.contains(ScatteringFlag::SPECULAR));
        assert!(!ScatteringFlag::ALL_LOBES.contains(ScatteringFlag::REFLECTIVE));
    }

    #[test]
    fn test_cosine_multiplier_non_adjoint() {
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let basis = Frame::from_normal(&n);
        let outgoing = Vector3f::new(0.0, 0.0, 1.0);
        let incoming = Vector3f::new(0.6, 0.0, 0.8);

        let m = cosine_multiplier(false, &n, &basis, &outgoing, &incoming);
        assert!((m - 0.8).abs() < 1e-5);
    }

    #[test]
    fn test_cosine_multiplier_adjoint_matches_when_normals_agree() {
        // With shading normal == geometric normal the adjoint factor
        // reduces to |cos(incoming, n)|.
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let basis = Frame::from_normal(&n);
        let outgoing = Vector3f::new(0.48, 0.0, 0.877).normalize();
        let incoming = Vector3f::new(-0.3, 0.1, 0.948).normalize();

        let forward = cosine_multiplier(false, &n, &basis, &outgoing, &incoming);
        let adjoint = cosine_multiplier(true, &n, &basis, &outgoing, &incoming);
        assert!((forward - adjoint).abs() < 1e-5);
    }

    #[test]
    fn test_registry_create_unknown_model() {
        let registry = BSDFFactoryRegistry::new();
        let result = registry.create("no_such_model", "b0", &ParamSet::new());
        match result {
            Err(CreateError::UnknownModel(model)) => assert_eq!(model, "no_such_model"),
            _ => panic!("expected an unknown model error"),
        }
    }

    #[test]
    fn test_built_in_registry_lists_lambertian() {
        let registry = BSDFFactoryRegistry::built_in();
        assert!(registry.models().contains(&"lambertian_diffuse"));
        assert!(registry.lookup("lambertian_diffuse").is_some());
    }

    struct LabeledFactory {
        model: &'static str,
        label: &'static str,
    }

    impl BSDFFactory for LabeledFactory {
        fn model(&self) -> &'static str {
            self.model
        }

        fn human_readable_model(&self) -> &'static str {
            self.label
        }

        fn input_metadata(&self) -> Vec<InputMetadata> {
            Vec::new()
        }

        fn create(&self, name: &str, params: &ParamSet) -> Result<Arc<dyn BSDF>, ParamError> {
            crate::materials::lambertian_diffuse::LambertianDiffuseBSDFFactory
                .create(name, params)
        }
    }

    #[test]
    fn test_registry_replaces_same_model_and_lists_in_registration_order() {
        let mut registry = BSDFFactoryRegistry::new();
        registry.register(Box::new(LabeledFactory { model: "matte", label: "first" }));
        registry.register(Box::new(LabeledFactory { model: "gloss", label: "gloss" }));
        assert_eq!(registry.models(), vec!["matte", "gloss"]);

        // A second registration under the same model replaces the first
        // entry instead of shadowing it.
        registry.register(Box::new(LabeledFactory { model: "matte", label: "second" }));
        assert_eq!(registry.models(), vec!["gloss", "matte"]);
        assert_eq!(registry.lookup("matte").unwrap().human_readable_model(), "second");
        assert!(registry.lookup("gloss").is_some());
    }
}
