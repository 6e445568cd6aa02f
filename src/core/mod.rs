// Copyright @yucwang 2021

pub mod abort;
pub mod accumulation_buffer;
pub mod bsdf;
pub mod computation_node;
pub mod environment;
pub mod job;
pub mod params;
pub mod rng;
pub mod sample_generator;
pub mod tile_callback;
