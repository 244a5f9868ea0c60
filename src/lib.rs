//! Sheetconv - Library for converting sprite sheet metadata
//!
//! This library provides functionality to:
//! - Discover `.png.txt` metadata files and their `.png` images in a tree
//! - Copy them into a flat output directory as `.flxspritesheet` files
//! - Prefix each sheet with the runtime path of its image

pub mod cli;
pub mod config;
pub mod convert;
