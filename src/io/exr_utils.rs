/* Copyright 2020 @TwoCookingMice */

use crate::math::constants::Float;

use exr::error::Error as ExrError;
use exr::prelude::write_rgb_file;

// Write EXR Image to file
pub fn write_exr_to_file(image: &std::vec::Vec<(Float, Float, Float)>,
                         width: usize,
                         height: usize,
                         file_path: &str) -> Result<(), ExrError> {
    log::info!("Starting writing openexr images: {}.", file_path);

    write_rgb_file(file_path, width, height, |x, y| {
        (
            image[y * width + x].0,
            image[y * width + x].1,
            image[y * width + x].2
        )
    })
}
