//! bulbtrace sphere-tracing renderer
//!
//! Renders implicit surfaces given by distance estimators (a Mandelbulb, a
//! rounded box, a sphere) with a conservative-step root finder, two-light
//! shading and 4x rotated-grid antialiasing. The root finders are also usable
//! on their own and drive the 2D function plotter.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod app;
pub mod camera;
pub mod config;
pub mod error;
pub mod field;
pub mod interval;
pub mod mandelbulb;
pub mod output;
pub mod plot;
pub mod ray;
pub mod roots;
pub mod rounded_box;
pub mod sink;
pub mod sphere;
