//! Sprite sheet conversion for sheetconv
//!
//! Turns `<base>.png.txt` metadata files found anywhere under a source tree
//! into `<base>.flxspritesheet` files in a flat output directory, copying the
//! matching `<base>.png` alongside.
//!
//! # Overview
//!
//! A conversion consists of:
//! - **Reset**: delete and recreate the output directory
//! - **Discovery**: find metadata files and their sibling images
//! - **Staging**: copy each file into the output directory under its new name
//! - **Prefixing**: write `<prefix><base>.png ` at the start of every sheet
//!
//! # Example
//!
//! ```ignore
//! use sheetconv::config::load_config;
//! use sheetconv::convert::{ConvertContext, Converter};
//!
//! let config = load_config(None)?;
//! let context = ConvertContext::new(config, project_root);
//! let result = Converter::new(context).run()?;
//! println!("{}", result.summary());
//! ```

pub mod context;
pub mod discovery;
pub mod error;
pub mod naming;
pub mod pipeline;
pub mod result;

pub use context::*;
pub use discovery::{create_convert_plan, ConvertPlan, SheetPair};
pub use error::*;
pub use pipeline::*;
pub use result::*;
