// Copyright @yucwang 2026

use std::sync::{ Mutex, MutexGuard };

use crate::math::bitmap::Bitmap;
use crate::math::constants::{ Float, Vector2f, Vector3f };
use crate::math::spectrum::RGBSpectrum;

/// One deposited sample: a canvas position in pixel units and its
/// contribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: Vector2f,
    pub value: RGBSpectrum,
}

impl Sample {
    pub fn new(position: Vector2f, value: RGBSpectrum) -> Self {
        Self { position, value }
    }
}

#[derive(Debug, Clone, Copy)]
struct PixelAccum {
    sum: Vector3f,
    weight: Float,
}

impl PixelAccum {
    fn zero() -> Self {
        Self { sum: Vector3f::zeros(), weight: 0.0 }
    }
}

/// Unbounded per-pixel accumulation of weighted sample sums.
///
/// Deposits from concurrent lanes commute, so the buffer is sharded into
/// one lock per row instead of a single buffer-wide lock. Samples landing
/// outside the canvas are dropped.
pub struct SampleAccumulationBuffer {
    rows: Vec<Mutex<Vec<PixelAccum>>>,
    width: usize,
    height: usize,
}

impl SampleAccumulationBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let rows = (0..height)
            .map(|_| Mutex::new(vec![PixelAccum::zero(); width]))
            .collect();
        Self { rows, width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn lock_row(&self, y: usize) -> MutexGuard<Vec<PixelAccum>> {
        self.rows[y].lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn store_samples(&self, samples: &[Sample]) {
        for sample in samples {
            let x = sample.position.x.floor() as isize;
            let y = sample.position.y.floor() as isize;
            if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
                continue;
            }

            let mut row = self.lock_row(y as usize);
            let pixel = &mut row[x as usize];
            pixel.sum += sample.value.to_vector3();
            pixel.weight += 1.0;
        }
    }

    /// Total weight deposited so far, summed over all pixels.
    pub fn total_weight(&self) -> Float {
        let mut total = 0.0;
        for y in 0..self.height {
            let row = self.lock_row(y);
            for pixel in row.iter() {
                total += pixel.weight;
            }
        }
        total
    }

    /// Resolve accumulated sums into displayable radiance. Pixels that
    /// received no samples stay black.
    pub fn develop_to(&self, frame: &mut Bitmap) {
        debug_assert!(frame.width() == self.width && frame.height() == self.height);
        for y in 0..self.height {
            let row = self.lock_row(y);
            for x in 0..self.width {
                let pixel = &row[x];
                frame[(x, y)] = if pixel.weight > 0.0 {
                    pixel.sum / pixel.weight
                } else {
                    Vector3f::zeros()
                };
            }
        }
    }

    /// Drop everything deposited so far.
    pub fn clear(&self) {
        for y in 0..self.height {
            let mut row = self.lock_row(y);
            for pixel in row.iter_mut() {
                *pixel = PixelAccum::zero();
            }
        }
    }
}
