// Copyright @yucwang 2026

use std::sync::Arc;
use std::sync::atomic::{ AtomicU64, Ordering };

use crate::core::abort::AbortSwitch;
use crate::core::accumulation_buffer::{ Sample, SampleAccumulationBuffer };
use crate::core::bsdf::BSDF;
use crate::core::environment::EnvironmentShader;
use crate::core::rng::SamplingContext;
use crate::core::sample_generator::SampleGenerator;
use crate::materials::lambertian_diffuse::LambertianDiffuseInputValues;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::frame::Frame;
use crate::math::spectrum::RGBSpectrum;

const SPHERE_RADIUS: Float = 0.75;
const ABORT_POLL_INTERVAL: usize = 64;
const DEPOSIT_BATCH: usize = 256;

/// Sample generator for a fixed test scene: one diffuse sphere under a
/// constant environment, seen through an orthographic camera.
///
/// Each sample picks a random canvas position, intersects the sphere
/// analytically and scatters once toward the environment. With a
/// cosine-sampled diffuse model the cosine and pdf cancel, so sphere
/// pixels converge to reflectance times environment radiance and the
/// background to the radiance itself.
pub struct SphereSampleGenerator {
    bsdf: Arc<dyn BSDF>,
    bsdf_inputs: LambertianDiffuseInputValues,
    environment: Arc<dyn EnvironmentShader>,
    width: usize,
    height: usize,
    seed: u64,
    // Bumped once per generate_samples call so repeated passes on the
    // same generator draw fresh positions.
    invocation: AtomicU64,
}

impl SphereSampleGenerator {
    pub fn new(
        bsdf: Arc<dyn BSDF>,
        bsdf_inputs: LambertianDiffuseInputValues,
        environment: Arc<dyn EnvironmentShader>,
        width: usize,
        height: usize,
        seed: u64,
    ) -> Self {
        Self {
            bsdf,
            bsdf_inputs,
            environment,
            width,
            height,
            seed,
            invocation: AtomicU64::new(0),
        }
    }

    fn shade(&self, position: &Vector2f, context: &mut SamplingContext) -> RGBSpectrum {
        // Orthographic camera looking down +z, square pixels.
        let sx = (2.0 * position.x - self.width as Float) / self.height as Float;
        let sy = (2.0 * position.y - self.height as Float) / self.height as Float;
        let ray_direction = Vector3f::new(0.0, 0.0, 1.0);

        let r2 = sx * sx + sy * sy;
        if r2 >= SPHERE_RADIUS * SPHERE_RADIUS {
            // The ray misses and escapes to the environment.
            return self.environment.evaluate(&ray_direction);
        }

        let hit_z = -(SPHERE_RADIUS * SPHERE_RADIUS - r2).sqrt();
        let normal = Vector3f::new(sx, sy, hit_z) / SPHERE_RADIUS;
        let shading_basis = Frame::from_normal(&normal);
        let outgoing = -ray_direction;

        match self.bsdf.sample(
            context, &self.bsdf_inputs, false, true,
            &normal, &shading_basis, &outgoing) {
            Some(record) => {
                let radiance = self.environment.evaluate(&record.incoming);
                record.value * radiance / record.pdf
            }
            None => RGBSpectrum::default(),
        }
    }
}

impl SampleGenerator for SphereSampleGenerator {
    fn generate_samples(
        &self,
        sample_count: usize,
        buffer: &SampleAccumulationBuffer,
        abort_switch: &AbortSwitch,
    ) {
        let call = self.invocation.fetch_add(1, Ordering::Relaxed);
        let mut context = SamplingContext::new(
            self.seed ^ call.wrapping_mul(0x9e37_79b9_7f4a_7c15));

        let mut batch = Vec::with_capacity(DEPOSIT_BATCH);
        for index in 0..sample_count {
            if index % ABORT_POLL_INTERVAL == 0 && abort_switch.is_aborted() {
                break;
            }

            let mut pixel_context = context.split(2, 1);
            let u = pixel_context.next_vector2();
            // u can reach 1.0 exactly; keep the position on the canvas.
            let position = Vector2f::new(
                (u.x * self.width as Float).min(self.width as Float - 1e-3),
                (u.y * self.height as Float).min(self.height as Float - 1e-3));

            let value = self.shade(&position, &mut context);
            batch.push(Sample::new(position, value));
            if batch.len() >= DEPOSIT_BATCH {
                buffer.store_samples(&batch);
                batch.clear();
            }
        }

        if !batch.is_empty() {
            buffer.store_samples(&batch);
        }
    }
}
