//! Showcall - call-site-aware diagnostic printing
//!
//! `show!(foo(bar(x)))` prints where it was called from, then the literal
//! source text of the call with the value of every argument and of every
//! nested sub-expression written inline:
//!
//! ```text
//! src/main.rs[main:12]:
//! foo(bar(x = 42.0) = 3.7) = 7.4
//! ```
//!
//! The call's source is read and compiled into a template once per call site;
//! later invocations only fill in the values.
//!
//! ## Module Structure
//!
//! - `site`: call-site identity captured by the macros
//! - `cache`: process-wide template cache
//! - `render`: slot resolution and the printed report
//! - `value`: value formatting used by the macro expansion
//! - `cli`: the `showcall` developer command
//! - `config`: `.showcallrc.json` loading
//! - `scanner`: finding reporting calls across a source tree

extern crate self as showcall;

pub mod cache;
pub mod cli;
pub mod config;
pub mod render;
pub mod scanner;
pub mod site;
mod value;

pub use cache::Cache;
pub use render::{Arguments, Body, Report, render, report};
pub use showcall_macros::{show, show_report, try_show};
pub use showcall_template::{Error, Result, Segment, Template};
pub use site::{CallSite, CallSiteKey};

#[doc(hidden)]
pub mod __private {
    pub use crate::render::{print, try_print};
    pub use crate::site::{enclosing_function, type_name_of};
    pub use crate::value::{DebugValue, OpaqueValue, Value};
}
