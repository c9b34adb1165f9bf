//! Source-synchronized call templates.
//!
//! Given the location of a reporting call, this crate finds the call's source
//! text, re-parses it, and compiles it into a [`Template`]: literal text
//! interleaved with slots for argument values and re-evaluated
//! sub-expressions.
//!
//! ## Module Structure
//!
//! - `locate`: finding the call on its line and parsing it incrementally
//! - `comments`: dropping comments from the parsed call text
//! - `collect`: the argument walk shared with the `showcall` proc macros
//! - `build`: laying out segments from the walk
//! - `normalize`: line splitting and indentation removal
//! - `canonical`: spacing-insensitive keys for captured expressions

pub mod build;
pub mod canonical;
pub mod collect;
pub mod comments;
pub mod error;
pub mod locate;
pub mod normalize;
pub mod position;
pub mod segment;

pub use build::{build_template, build_template_from_source};
pub use error::{Error, Result};
pub use locate::{TAB_WIDTH, resolve_source_path};
pub use segment::{Segment, Template};
