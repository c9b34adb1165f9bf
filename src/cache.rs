use std::{
    collections::HashMap,
    sync::{
        Arc, LazyLock, Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

use showcall_template::{Result, Template, build_template};

use crate::{
    render::{Arguments, Report, render},
    site::{CallSite, CallSiteKey},
};

static GLOBAL: LazyLock<Cache> = LazyLock::new(Cache::new);

/// Templates by call site. Entries are never invalidated.
#[derive(Debug, Default)]
pub struct Cache {
    templates: Mutex<HashMap<CallSiteKey, Arc<Template>>>,
    builds: AtomicUsize,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache used by the reporting macros.
    pub fn global() -> &'static Cache {
        &GLOBAL
    }

    /// The cached template of `site`, built on first use.
    ///
    /// The lock is held for the whole build, so a template is published once,
    /// complete. A failed build caches nothing.
    pub fn get_or_build(&self, site: &CallSite) -> Result<Arc<Template>> {
        let key = site.key();
        // Entries are inserted whole; a poisoned map is still consistent.
        let mut templates = self.templates.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(template) = templates.get(&key) {
            return Ok(Arc::clone(template));
        }

        let line = site.line as usize;
        let template = Arc::new(build_template(&site.source_path(), line, site.name)?);
        self.builds.fetch_add(1, Ordering::Relaxed);
        templates.insert(key, Arc::clone(&template));
        Ok(template)
    }

    /// Build (or reuse) the template of `site` and render it.
    pub fn report(&self, site: &CallSite, arguments: &Arguments<'_>) -> Result<Report> {
        let template = self.get_or_build(site)?;
        let body = if template.is_empty() {
            None
        } else {
            Some(render(&template, arguments)?)
        };
        Ok(Report::new(*site, body))
    }

    /// Number of templates built so far.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.templates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use showcall_template::Error;

    use super::*;

    fn site(file: &'static str, line: u32) -> CallSite {
        CallSite {
            file,
            line,
            manifest_dir: None,
            function: "main",
            name: "show",
        }
    }

    fn leak(path: std::path::PathBuf) -> &'static str {
        Box::leak(path.to_string_lossy().into_owned().into_boxed_str())
    }

    #[test]
    fn test_second_report_reuses_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.rs");
        fs::write(&path, "fn main() {\n    show!(foo(x));\n}\n").unwrap();
        let site = site(leak(path), 2);

        let cache = Cache::new();
        let positional = ["8".to_string()];
        let bindings = [("x", "4".to_string())];
        let arguments = Arguments::new(&positional, &[], &bindings);
        let first = cache.report(&site, &arguments).unwrap();
        let second = cache.report(&site, &arguments).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.body().as_deref(), Some("foo(x = 4) = 8"));
        assert_eq!(cache.builds(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failed_build_caches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let site = site(leak(dir.path().join("missing.rs")), 1);

        let cache = Cache::new();
        let err = cache.get_or_build(&site).unwrap_err();
        assert!(matches!(err, Error::SourceUnreadable { .. }));
        assert!(cache.is_empty());
        assert_eq!(cache.builds(), 0);
    }

    #[test]
    fn test_evaluation_failure_keeps_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.rs");
        fs::write(&path, "show!(foo(x));\n").unwrap();
        let site = site(leak(path), 1);

        let cache = Cache::new();
        let positional = ["8".to_string()];
        let missing = Arguments::new(&positional, &[], &[]);
        let err = cache.report(&site, &missing).unwrap_err();
        assert!(matches!(err, Error::Evaluation { ref snippet } if snippet == "x"));

        let bindings = [("x", "4".to_string())];
        let arguments = Arguments::new(&positional, &[], &bindings);
        assert!(cache.report(&site, &arguments).is_ok());
        assert_eq!(cache.builds(), 1);
    }

    #[test]
    fn test_macros_on_one_line_have_own_templates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.rs");
        fs::write(&path, "let (a, b) = (try_show!(x), show_report!(y * 10));\n").unwrap();
        let file = leak(path);
        let shown = CallSite {
            name: "try_show",
            ..site(file, 1)
        };
        let reported = CallSite {
            name: "show_report",
            ..site(file, 1)
        };

        let cache = Cache::new();
        let x = ["2".to_string()];
        let first = cache.report(&shown, &Arguments::new(&x, &[], &[])).unwrap();
        let twenty = ["20".to_string()];
        let second = cache.report(&reported, &Arguments::new(&twenty, &[], &[])).unwrap();

        assert_eq!(first.body().as_deref(), Some("x = 2"));
        assert_eq!(second.body().as_deref(), Some("y * 10 = 20"));
        assert_eq!(cache.builds(), 2);
    }
}
