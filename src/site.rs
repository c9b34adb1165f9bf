use std::path::PathBuf;

use showcall_template::resolve_source_path;

/// Where a reporting macro was invoked, as captured by its expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    /// `file!()` at the call site.
    pub file: &'static str,
    /// `line!()` at the call site: the line holding the macro name.
    pub line: u32,
    /// `CARGO_MANIFEST_DIR` of the calling crate, when built by cargo.
    pub manifest_dir: Option<&'static str>,
    /// Name of the enclosing function.
    pub function: &'static str,
    /// Macro name to search the line for.
    pub name: &'static str,
}

/// Identity of a call site in the template cache.
///
/// The macro name is part of it: each reporting macro locates its own call,
/// so different macros on one line have different templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallSiteKey {
    pub file: &'static str,
    pub line: u32,
    pub name: &'static str,
}

impl CallSite {
    pub fn key(&self) -> CallSiteKey {
        CallSiteKey {
            file: self.file,
            line: self.line,
            name: self.name,
        }
    }

    /// The readable path of the calling source file.
    pub fn source_path(&self) -> PathBuf {
        resolve_source_path(self.file, self.manifest_dir)
    }

    /// Plain header line: `<file>[<function>:<line>]:`.
    pub fn header(&self) -> String {
        format!("{}[{}:{}]:", self.file, self.function, self.line)
    }
}

/// Type name of a value, used on a fn item to learn its full path.
pub fn type_name_of<T: ?Sized>(_: &T) -> &'static str {
    std::any::type_name::<T>()
}

/// Name of the function enclosing a marker fn item, given the item's path.
///
/// Closure frames are skipped, so a call inside a closure reports the function
/// the closure is written in.
pub fn enclosing_function(anchor_path: &'static str) -> &'static str {
    let path = anchor_path
        .rsplit_once("::")
        .map_or(anchor_path, |(parent, _)| parent);
    path.rsplit("::")
        .find(|segment| *segment != "{{closure}}")
        .unwrap_or(path)
}
