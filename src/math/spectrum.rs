// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

use std::ops::{Add, AddAssign, Div, Index, Mul, MulAssign};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RGBSpectrum {
    rgb: Vector3f,
}

impl Default for RGBSpectrum {
    fn default() -> Self {
        Self { rgb: Vector3f::new(0.0, 0.0, 0.0) }
    }
}

impl RGBSpectrum {
    pub fn new(r: Float, g: Float, b: Float) -> Self {
        Self { rgb: Vector3f::new(r, g, b) }
    }

    pub fn from_scalar(v: Float) -> Self {
        Self::new(v, v, v)
    }

    pub fn is_black(&self) -> bool {
        for idx in 0..3 {
            if self.rgb[idx] != 0.0 {
                return false;
            }
        }

        true
    }

    pub fn is_finite(&self) -> bool {
        self.rgb.iter().all(|c| c.is_finite())
    }

    pub fn luminance(&self) -> Float {
        0.212671 * self.rgb[0] + 0.715160 * self.rgb[1] + 0.072169 * self.rgb[2]
    }

    pub fn max_component(&self) -> Float {
        self.rgb[0].max(self.rgb[1]).max(self.rgb[2])
    }

    pub fn to_vector3(&self) -> Vector3f {
        self.rgb
    }
}

impl Index<usize> for RGBSpectrum {
    type Output = Float;

    fn index(&self, index: usize) -> &Float {
        &self.rgb[index]
    }
}

impl Add for RGBSpectrum {
    type Output = RGBSpectrum;

    fn add(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum { rgb: self.rgb + rhs.rgb }
    }
}

impl AddAssign for RGBSpectrum {
    fn add_assign(&mut self, rhs: RGBSpectrum) {
        self.rgb += rhs.rgb;
    }
}

impl Mul<Float> for RGBSpectrum {
    type Output = RGBSpectrum;

    fn mul(self, rhs: Float) -> RGBSpectrum {
        RGBSpectrum { rgb: self.rgb * rhs }
    }
}

impl MulAssign<Float> for RGBSpectrum {
    fn mul_assign(&mut self, rhs: Float) {
        self.rgb *= rhs;
    }
}

impl Mul for RGBSpectrum {
    type Output = RGBSpectrum;

    fn mul(self, rhs: RGBSpectrum) -> RGBSpectrum {
        RGBSpectrum { rgb: self.rgb.component_mul(&rhs.rgb) }
    }
}

impl Div<Float> for RGBSpectrum {
    type Output = RGBSpectrum;

    fn div(self, rhs: Float) -> RGBSpectrum {
        RGBSpectrum { rgb: self.rgb / rhs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black() {
        assert!(RGBSpectrum::default().is_black());
        assert!(!RGBSpectrum::new(0.0, 0.1, 0.0).is_black());
    }

    #[test]
    fn test_arithmetic() {
        let a = RGBSpectrum::new(0.1, 0.2, 0.3);
        let b = RGBSpectrum::new(0.4, 0.5, 0.6);

        let sum = a + b;
        assert!((sum[0] - 0.5).abs() < 1e-6);
        assert!((sum[1] - 0.7).abs() < 1e-6);
        assert!((sum[2] - 0.9).abs() < 1e-6);

        let scaled = a * 2.0;
        assert_eq!(scaled, RGBSpectrum::new(0.2, 0.4, 0.6));

        let modulated = a * b;
        assert!((modulated[0] - 0.04).abs() < 1e-6);
        assert!((modulated[1] - 0.1).abs() < 1e-6);
        assert!((modulated[2] - 0.18).abs() < 1e-6);

        let halved = b / 2.0;
        assert_eq!(halved, RGBSpectrum::new(0.2, 0.25, 0.3));
    }

    #[test]
    fn test_luminance() {
        let white = RGBSpectrum::from_scalar(1.0);
        assert!((white.luminance() - 1.0).abs() < 1e-5);
    }
}
