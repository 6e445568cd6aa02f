// Copyright @yucwang 2023

use std::any::Any;
use std::sync::Arc;

use crate::core::bsdf::{
    cosine_multiplier, BSDFEvalResult, BSDFFactory, BSDFSampleRecord, ScatteringFlag, BSDF,
};
use crate::core::computation_node::{ generate_node_id, ComputationNode };
use crate::core::params::{
    EntityBinding, InputMetadata, InputType, InputUse, ParamError, ParamSet,
};
use crate::core::rng::SamplingContext;
use crate::math::constants::{ Float, INV_PI, Vector3f };
use crate::math::frame::Frame;
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{ sample_cosine_hemisphere, sample_cosine_hemisphere_pdf };

const MODEL: &str = "lambertian_diffuse";

/// Per-shading-point inputs of the Lambertian model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertianDiffuseInputValues {
    pub reflectance: RGBSpectrum,
    pub reflectance_multiplier: Float,
}

impl Default for LambertianDiffuseInputValues {
    fn default() -> Self {
        Self {
            reflectance: RGBSpectrum::from_scalar(0.5),
            reflectance_multiplier: 1.0,
        }
    }
}

pub struct LambertianDiffuseBSDF {
    id: String,
    default_inputs: LambertianDiffuseInputValues,
}

impl LambertianDiffuseBSDF {
    pub fn new(id: Option<String>, default_inputs: LambertianDiffuseInputValues) -> Self {
        Self {
            id: id.unwrap_or_else(|| generate_node_id("LambertianDiffuseBSDF")),
            default_inputs,
        }
    }

    pub fn default_input_values(&self) -> &LambertianDiffuseInputValues {
        &self.default_inputs
    }

    fn resolve_inputs<'a>(&'a self, inputs: &'a dyn Any) -> &'a LambertianDiffuseInputValues {
        match inputs.downcast_ref::<LambertianDiffuseInputValues>() {
            Some(values) => values,
            None => {
                debug_assert!(false, "wrong input block type for {}", MODEL);
                &self.default_inputs
            }
        }
    }

    fn base_value(values: &LambertianDiffuseInputValues) -> RGBSpectrum {
        values.reflectance * (values.reflectance_multiplier * INV_PI)
    }
}

impl ComputationNode for LambertianDiffuseBSDF {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_string(&self) -> String {
        format!("LambertianDiffuseBSDF [id={}]", self.id)
    }
}

impl BSDF for LambertianDiffuseBSDF {
    fn model(&self) -> &'static str {
        MODEL
    }

    fn scattering_flag(&self) -> ScatteringFlag {
        ScatteringFlag::DIFFUSE | ScatteringFlag::REFLECTIVE
    }

    fn sample(
        &self,
        sampling_context: &mut SamplingContext,
        inputs: &dyn Any,
        adjoint: bool,
        cosine_mult: bool,
        geometric_normal: &Vector3f,
        shading_basis: &Frame,
        outgoing: &Vector3f,
    ) -> Option<BSDFSampleRecord> {
        let values = self.resolve_inputs(inputs);

        sampling_context.split_in_place(2, 1);
        let u = sampling_context.next_vector2();

        let wi_local = sample_cosine_hemisphere(&u);
        let pdf = sample_cosine_hemisphere_pdf(wi_local.z);
        if pdf <= 0.0 {
            return None;
        }

        let incoming = shading_basis.from_local(&wi_local);

        let mut value = Self::base_value(values);
        if cosine_mult {
            value *= cosine_multiplier(
                adjoint, geometric_normal, shading_basis, outgoing, &incoming);
        }

        debug_assert!(value.is_finite());

        Some(BSDFSampleRecord {
            incoming,
            value,
            pdf,
            mode: ScatteringFlag::DIFFUSE,
        })
    }

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
    ) -> BSDFEvalResult {
        if !modes.contains(ScatteringFlag::DIFFUSE) {
            return BSDFEvalResult::default();
        }

        let cos_in = incoming.dot(shading_basis.normal());
        if cos_in <= 0.0 {
            return BSDFEvalResult::default();
        }

        let values = self.resolve_inputs(inputs);
        let mut value = Self::base_value(values);
        if cosine_mult {
            value *= cosine_multiplier(
                adjoint, geometric_normal, shading_basis, outgoing, incoming);
        }

        BSDFEvalResult {
            value,
            pdf: cos_in * INV_PI,
        }
    }

    fn pdf(
        &self,
        _inputs: &dyn Any,
        _geometric_normal: &Vector3f,
        shading_basis: &Frame,
        _outgoing: &Vector3f,
        incoming: &Vector3f,
        modes: ScatteringFlag,
    ) -> Float {
        if !modes.contains(ScatteringFlag::DIFFUSE) {
            return 0.0;
        }

        let cos_in = incoming.dot(shading_basis.normal());
        if cos_in <= 0.0 {
            return 0.0;
        }

        cos_in * INV_PI
    }
}

pub struct LambertianDiffuseBSDFFactory;

impl BSDFFactory for LambertianDiffuseBSDFFactory {
    fn model(&self) -> &'static str {
        MODEL
    }

    fn human_readable_model(&self) -> &'static str {
        "Lambertian Diffuse BRDF"
    }

    fn input_metadata(&self) -> Vec<InputMetadata> {
        vec![
            InputMetadata {
                name: "reflectance",
                label: "Reflectance",
                input_type: InputType::Spectrum,
                entity_types: &[EntityBinding::Color, EntityBinding::TextureInstance],
                usage: InputUse::Required,
                default: Some("0.5"),
            },
            InputMetadata {
                name: "reflectance_multiplier",
                label: "Reflectance Multiplier",
                input_type: InputType::Scalar,
                entity_types: &[EntityBinding::TextureInstance],
                usage: InputUse::Optional,
                default: Some("1.0"),
            },
        ]
    }

    fn create(&self, name: &str, params: &ParamSet) -> Result<Arc<dyn BSDF>, ParamError> {
        let reflectance = params.spectrum("reflectance")?;
        let reflectance_multiplier = params.scalar_or("reflectance_multiplier", 1.0)?;
        Ok(Arc::new(LambertianDiffuseBSDF::new(
            Some(name.to_string()),
            LambertianDiffuseInputValues { reflectance, reflectance_multiplier },
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bsdf::testing::check_sample_eval_agreement;

    fn assert_close(a: f32, b: f32) {
        assert!((a - b).abs() < 1e-5, "expected {} close to {}", a, b);
    }

    fn test_bsdf() -> (LambertianDiffuseBSDF, LambertianDiffuseInputValues) {
        let inputs = LambertianDiffuseInputValues {
            reflectance: RGBSpectrum::new(0.5, 0.4, 0.25),
            reflectance_multiplier: 1.25,
        };
        (LambertianDiffuseBSDF::new(None, inputs), inputs)
    }

    #[test]
    fn test_sample_eval_agreement() {
        let (bsdf, inputs) = test_bsdf();
        check_sample_eval_agreement(&bsdf, &inputs);
    }

    #[test]
    fn test_eval_value_is_reflectance_over_pi() {
        let (bsdf, inputs) = test_bsdf();
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let basis = Frame::from_normal(&n);
        let outgoing = Vector3f::new(0.0, 0.0, 1.0);
        let incoming = Vector3f::new(0.6, 0.0, 0.8);

        let result = bsdf.eval(
            &inputs, false, false, &n, &basis,
            &outgoing, &incoming, ScatteringFlag::ALL_LOBES);

        assert_close(result.value[0], 0.5 * 1.25 * INV_PI);
        assert_close(result.value[1], 0.4 * 1.25 * INV_PI);
        assert_close(result.value[2], 0.25 * 1.25 * INV_PI);
        assert_close(result.pdf, 0.8 * INV_PI);
    }

    #[test]
    fn test_cosine_mult_folds_cosine_into_value() {
        let (bsdf, inputs) = test_bsdf();
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let basis = Frame::from_normal(&n);
        let outgoing = Vector3f::new(0.0, 0.0, 1.0);
        let incoming = Vector3f::new(0.6, 0.0, 0.8);

        let plain = bsdf.eval(
            &inputs, false, false, &n, &basis,
            &outgoing, &incoming, ScatteringFlag::ALL_LOBES);
        let weighted = bsdf.eval(
            &inputs, false, true, &n, &basis,
            &outgoing, &incoming, ScatteringFlag::ALL_LOBES);

        for channel in 0..3 {
            assert_close(weighted.value[channel], plain.value[channel] * 0.8);
        }
        assert_close(weighted.pdf, plain.pdf);
    }

    #[test]
    fn test_below_horizon_is_zero() {
        let (bsdf, inputs) = test_bsdf();
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let basis = Frame::from_normal(&n);
        let outgoing = Vector3f::new(0.0, 0.0, 1.0);
        let incoming = Vector3f::new(0.6, 0.0, -0.8);

        let result = bsdf.eval(
            &inputs, false, false, &n, &basis,
            &outgoing, &incoming, ScatteringFlag::ALL_LOBES);
        assert!(result.value.is_black());
        assert_close(result.pdf, 0.0);

        let pdf = bsdf.pdf(
            &inputs, &n, &basis, &outgoing, &incoming, ScatteringFlag::ALL_LOBES);
        assert_close(pdf, 0.0);
    }

    #[test]
    fn test_mode_mask_excludes_diffuse() {
        let (bsdf, inputs) = test_bsdf();
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let basis = Frame::from_normal(&n);
        let outgoing = Vector3f::new(0.0, 0.0, 1.0);
        let incoming = Vector3f::new(0.6, 0.0, 0.8);

        let result = bsdf.eval(
            &inputs, false, false, &n, &basis,
            &outgoing, &incoming, ScatteringFlag::GLOSSY);
        assert!(result.value.is_black());
        assert_close(result.pdf, 0.0);

        let pdf = bsdf.pdf(
            &inputs, &n, &basis, &outgoing, &incoming, ScatteringFlag::GLOSSY);
        assert_close(pdf, 0.0);
    }

    #[test]
    fn test_sample_is_deterministic_at_fixed_seed() {
        let (bsdf, inputs) = test_bsdf();
        let n = Vector3f::new(0.2, -0.3, 0.93).normalize();
        let basis = Frame::from_normal(&n);
        let outgoing = basis.from_local(&Vector3f::new(0.1, 0.2, 0.97).normalize());

        let mut first_context = SamplingContext::new(777);
        let mut second_context = SamplingContext::new(777);

        let first = bsdf.sample(
            &mut first_context, &inputs, false, true, &n, &basis, &outgoing);
        let second = bsdf.sample(
            &mut second_context, &inputs, false, true, &n, &basis, &outgoing);
        assert_eq!(first, second);
    }

    #[test]
    fn test_sample_reports_diffuse_mode() {
        let (bsdf, inputs) = test_bsdf();
        let n = Vector3f::new(0.0, 0.0, 1.0);
        let basis = Frame::from_normal(&n);
        let outgoing = Vector3f::new(0.0, 0.0, 1.0);

        let mut context = SamplingContext::new(4242);
        let record = bsdf.sample(
            &mut context, &inputs, false, true, &n, &basis, &outgoing)
            .expect("cosine sampling produced no direction");
        assert!(record.mode.contains(ScatteringFlag::DIFFUSE));
        assert!(record.pdf > 0.0);
        assert!(record.incoming.dot(&n) >= 0.0);
    }

    #[test]
    fn test_factory_create_and_defaults() {
        let factory = LambertianDiffuseBSDFFactory;
        assert_eq!(factory.model(), "lambertian_diffuse");
        assert_eq!(factory.human_readable_model(), "Lambertian Diffuse BRDF");

        let params = ParamSet::new()
            .with_spectrum("reflectance", RGBSpectrum::from_scalar(0.75));
        let bsdf = factory.create("walls_brdf", &params).unwrap();
        assert_eq!(bsdf.model(), "lambertian_diffuse");
        assert_eq!(bsdf.id(), "walls_brdf");
        assert!(bsdf.scattering_flag().contains(ScatteringFlag::DIFFUSE));
        assert!(bsdf.scattering_flag().contains(ScatteringFlag::REFLECTIVE));
    }

    #[test]
    fn test_factory_requires_reflectance() {
        let factory = LambertianDiffuseBSDFFactory;
        let result = factory.create("broken", &ParamSet::new());
        assert_eq!(result.err(), Some(ParamError::Missing("reflectance".to_string())));
    }

    #[test]
    fn test_factory_metadata_order() {
        let factory = LambertianDiffuseBSDFFactory;
        let metadata = factory.input_metadata();
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata[0].name, "reflectance");
        assert_eq!(metadata[0].usage, InputUse::Required);
        assert_eq!(metadata[0].default, Some("0.5"));
        assert_eq!(metadata[1].name, "reflectance_multiplier");
        assert_eq!(metadata[1].usage, InputUse::Optional);
        assert_eq!(metadata[1].default, Some("1.0"));
    }
}
