//! Planogram Library
//!
//! This library provides the core of a cooler planogram editor: the placement
//! tree model, row and stack geometry, placement validation and mutation, and
//! the bounding-box export consumed by the image-recognition backend.

// Module declarations
pub mod cli;
pub mod config;
pub mod models;
pub mod services;
