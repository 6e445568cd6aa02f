// Copyright @yucwang 2021

pub mod progressive;
pub mod renderer;
pub mod sample_counter;
pub mod sample_generator_job;
