// Copyright 2020 TwoCookingMice

#![allow(dead_code)]

pub extern crate nalgebra as na;

mod core;
mod environments;
mod generators;
mod io;
mod materials;
mod math;
mod renderers;

use self::core::bsdf::BSDFFactoryRegistry;
use self::core::environment::EnvironmentShaderFactory;
use self::core::params::ParamSet;
use self::core::tile_callback::TileCallback;
use self::environments::constant::ConstantEnvironmentShaderFactory;
use self::generators::sphere::SphereSampleGenerator;
use self::io::{ exr_utils, png_utils };
use self::materials::lambertian_diffuse::LambertianDiffuseInputValues;
use self::math::bitmap::Bitmap;
use self::math::spectrum::RGBSpectrum;
use self::renderers::progressive::{ ProgressiveRenderParams, ProgressiveRenderer, Renderer };
use self::renderers::sample_counter::SampleCounter;

use console::style;
use indicatif::{ ProgressBar, ProgressStyle };

use std::env;
use std::sync::Arc;

struct ConsoleTileCallback {
    progress: ProgressBar,
    sample_counter: Arc<SampleCounter>,
    sample_budget: usize,
}

impl TileCallback for ConsoleTileCallback {
    fn pre_render(&self, _x: usize, _y: usize, _width: usize, _height: usize) {}

    fn post_render(&self, _frame: &Bitmap) {
        let consumed = self.sample_budget - self.sample_counter.read();
        self.progress.set_position(consumed as u64);
    }
}

fn parse_spectrum(text: &str) -> Option<RGBSpectrum> {
    let parts: Vec<f32> = text
        .split(',')
        .filter_map(|v| v.trim().parse::<f32>().ok())
        .collect();
    match parts.len() {
        1 => Some(RGBSpectrum::from_scalar(parts[0])),
        3 => Some(RGBSpectrum::new(parts[0], parts[1], parts[2])),
        _ => None,
    }
}

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <output.exr> [--width N] [--height N] [--budget N] \
                   [--lanes N] [--threads N] [--seed N] [--reflectance R,G,B] \
                   [--multiplier X] [--radiance R,G,B] [--png FILE]", args[0]);
        std::process::exit(1);
    }

    let output_path = &args[1];
    let mut params = ProgressiveRenderParams::default();
    params.sample_budget = 2_000_000;
    let mut seed: u64 = 0;
    let mut reflectance = RGBSpectrum::from_scalar(0.5);
    let mut multiplier: f32 = 1.0;
    let mut radiance = RGBSpectrum::from_scalar(1.0);
    let mut png_path: Option<String> = None;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => {
                i += 1;
                params.width = args.get(i).and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(params.width);
            }
            "--height" => {
                i += 1;
                params.height = args.get(i).and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(params.height);
            }
            "--budget" => {
                i += 1;
                params.sample_budget = args.get(i).and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(params.sample_budget);
            }
            "--lanes" => {
                i += 1;
                params.job_count = args.get(i).and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(params.job_count);
            }
            "--threads" => {
                i += 1;
                params.thread_count = args.get(i).and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(params.thread_count);
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|v| v.parse::<u64>().ok()).unwrap_or(0);
            }
            "--reflectance" => {
                i += 1;
                reflectance = args.get(i).and_then(|v| parse_spectrum(v))
                    .unwrap_or(reflectance);
            }
            "--multiplier" => {
                i += 1;
                multiplier = args.get(i).and_then(|v| v.parse::<f32>().ok())
                    .unwrap_or(multiplier);
            }
            "--radiance" => {
                i += 1;
                radiance = args.get(i).and_then(|v| parse_spectrum(v))
                    .unwrap_or(radiance);
            }
            "--png" => {
                i += 1;
                png_path = args.get(i).cloned();
            }
            _ => {}
        }
        i += 1;
    }

    let registry = BSDFFactoryRegistry::built_in();
    let bsdf_params = ParamSet::new()
        .with_spectrum("reflectance", reflectance)
        .with_scalar("reflectance_multiplier", multiplier);
    let bsdf = match registry.create("lambertian_diffuse", "sphere_brdf", &bsdf_params) {
        Ok(bsdf) => bsdf,
        Err(e) => {
            log::error!("failed to create BSDF: {}", e);
            std::process::exit(1);
        }
    };

    let environment_params = ParamSet::new().with_spectrum("radiance", radiance);
    let environment = match ConstantEnvironmentShaderFactory.create("sky", &environment_params) {
        Ok(environment) => environment,
        Err(e) => {
            log::error!("failed to create environment shader: {}", e);
            std::process::exit(1);
        }
    };

    let generator = Arc::new(SphereSampleGenerator::new(
        bsdf,
        LambertianDiffuseInputValues { reflectance, reflectance_multiplier: multiplier },
        environment,
        params.width,
        params.height,
        seed,
    ));

    let sample_budget = params.sample_budget;
    let mut renderer = ProgressiveRenderer::new(generator, params);

    let progress = ProgressBar::new(sample_budget as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} samples")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    renderer.set_tile_callback(Arc::new(ConsoleTileCallback {
        progress: progress.clone(),
        sample_counter: renderer.sample_counter(),
        sample_budget,
    }));

    let image = renderer.render();
    progress.finish_and_clear();

    if let Err(e) = exr_utils::write_exr_to_file(
        &image.raw_copy(), image.width(), image.height(), output_path) {
        log::error!("failed to write {}: {}", output_path, e);
        std::process::exit(1);
    }
    println!("{} {}", style("EXR written to:").green(), output_path);

    if let Some(png_path) = png_path {
        if let Err(e) = png_utils::write_png_preview(
            &image.raw_copy(), image.width(), image.height(), &png_path) {
            log::error!("failed to write {}: {}", png_path, e);
            std::process::exit(1);
        }
        println!("{} {}", style("PNG preview written to:").green(), png_path);
    }
}
