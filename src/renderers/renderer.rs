// Copyright @yucwang 2021

use crate::math::bitmap::Bitmap;

pub trait Renderer {
    fn render(&self) -> Bitmap;
}
