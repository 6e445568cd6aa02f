// Copyright @yucwang 2021

#![allow(dead_code)]

pub mod core;
pub mod environments;
pub mod generators;
pub mod io;
pub mod materials;
pub mod math;
pub mod renderers;
