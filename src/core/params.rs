// Copyright @yucwang 2026

use std::collections::HashMap;
use std::fmt;

use crate::math::constants::Float;
use crate::math::spectrum::RGBSpectrum;

/// A single named value handed to a model factory.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Scalar(Float),
    Spectrum(RGBSpectrum),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    Missing(String),
    WrongType { name: String, expected: &'static str },
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParamError::Missing(name) => {
                write!(f, "missing required parameter \"{}\"", name)
            }
            ParamError::WrongType { name, expected } => {
                write!(f, "parameter \"{}\" is not a {}", name, expected)
            }
        }
    }
}

impl std::error::Error for ParamError {}

/// An unordered bag of named parameter values.
#[derive(Debug, Clone, Default)]
pub struct ParamSet {
    values: HashMap<String, ParamValue>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: ParamValue) {
        self.values.insert(name.to_string(), value);
    }

    pub fn with_scalar(mut self, name: &str, value: Float) -> Self {
        self.insert(name, ParamValue::Scalar(value));
        self
    }

    pub fn with_spectrum(mut self, name: &str, value: RGBSpectrum) -> Self {
        self.insert(name, ParamValue::Spectrum(value));
        self
    }

    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.insert(name, ParamValue::Text(value.to_string()));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    pub fn scalar(&self, name: &str) -> Result<Float, ParamError> {
        match self.values.get(name) {
            Some(ParamValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(ParamError::WrongType { name: name.to_string(), expected: "scalar" }),
            None => Err(ParamError::Missing(name.to_string())),
        }
    }

    /// Like `scalar`, but an absent parameter falls back to `default`.
    /// A present parameter of the wrong type is still an error.
    pub fn scalar_or(&self, name: &str, default: Float) -> Result<Float, ParamError> {
        match self.values.get(name) {
            Some(ParamValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(ParamError::WrongType { name: name.to_string(), expected: "scalar" }),
            None => Ok(default),
        }
    }

    pub fn spectrum(&self, name: &str) -> Result<RGBSpectrum, ParamError> {
        match self.values.get(name) {
            Some(ParamValue::Spectrum(v)) => Ok(*v),
            Some(_) => Err(ParamError::WrongType { name: name.to_string(), expected: "spectrum" }),
            None => Err(ParamError::Missing(name.to_string())),
        }
    }

    pub fn spectrum_or(&self, name: &str, default: RGBSpectrum) -> Result<RGBSpectrum, ParamError> {
        match self.values.get(name) {
            Some(ParamValue::Spectrum(v)) => Ok(*v),
            Some(_) => Err(ParamError::WrongType { name: name.to_string(), expected: "spectrum" }),
            None => Ok(default),
        }
    }

    pub fn text(&self, name: &str) -> Result<&str, ParamError> {
        match self.values.get(name) {
            Some(ParamValue::Text(v)) => Ok(v.as_str()),
            Some(_) => Err(ParamError::WrongType { name: name.to_string(), expected: "text" }),
            None => Err(ParamError::Missing(name.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Scalar,
    Spectrum,
    Text,
}

/// Entity kinds an input slot accepts when wired up in a project editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityBinding {
    Color,
    TextureInstance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputUse {
    Required,
    Optional,
}

/// Self-description of one factory input, for tooling and editors.
#[derive(Debug, Clone)]
pub struct InputMetadata {
    pub name: &'static str,
    pub label: &'static str,
    pub input_type: InputType,
    pub entity_types: &'static [EntityBinding],
    pub usage: InputUse,
    pub default: Option<&'static str>,
}
