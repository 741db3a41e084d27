//! Raster surfaces and image decoding.
//!
//! This crate provides:
//! - An RGBA [`Canvas`] with a 2D context supporting Porter-Duff compositing
//! - Image decoding into canvases and PNG encoding

pub mod canvas;
pub mod image_decoder;

pub use canvas::{Canvas, CanvasContext2D, CompositeOperation, ContextType};
pub use image_decoder::{encode_png, ImageDecoder, ImageError};
