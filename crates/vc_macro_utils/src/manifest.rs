use std::collections::{BTreeMap, BTreeSet};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item};

/// The dependency names declared by the invoking crate's `Cargo.toml`.
///
/// Proc-macros use it to emit paths that resolve from the invoking crate,
/// whether it depends on a member crate directly or only on the
/// `vc_assembly` facade.
///
/// # Example
///
/// ```rust
/// # use vc_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.get_crate_path("vc_assembler"));
/// ```
///
/// # Resolution rules
///
/// 1. If the requested crate is a dependency, return `::crate_name`.
/// 2. If the requested crate name begins with `vc_` and the facade
///    `vc_assembly` is a dependency, return `::vc_assembly::short_name`
///    (e.g. `vc_settings` -> `::vc_assembly::settings`).
/// 3. Repeat steps 1-2 with `dev-dependencies`.
/// 4. Otherwise, fall back to `::crate_name`.
///
/// A crate referencing itself through the macro should declare
/// `extern crate self as crate_name;` in its root so that rule 4 resolves.
#[derive(Debug)]
pub struct Manifest {
    dependencies: BTreeSet<String>,
    dev_dependencies: BTreeSet<String>,
    modified_time: SystemTime,
}

const FACADE_NAME: &str = "vc_assembly";
const MEMBER_PREFIX: &str = "vc_";

impl Manifest {
    #[inline(never)]
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .expect("CARGO_MANIFEST_DIR should be auto-defined by cargo.");
        let path = PathBuf::from(dir).join("Cargo.toml");
        assert!(
            path.exists(),
            "Cargo manifest does not exist at path {}",
            path.display(),
        );
        path
    }

    #[inline(never)]
    fn load(path: &Path, modified_time: SystemTime) -> Self {
        let text = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()));
        let document = Document::parse(text)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()));

        let names = |table: &str| -> BTreeSet<String> {
            match document.get(table) {
                Some(Item::Table(deps)) => deps.iter().map(|(name, _)| name.to_owned()).collect(),
                _ => BTreeSet::new(),
            }
        };

        Self {
            dependencies: names("dependencies"),
            dev_dependencies: names("dev-dependencies"),
            modified_time,
        }
    }

    fn resolve(deps: &BTreeSet<String>, name: &str) -> Option<String> {
        if deps.contains(name) {
            return Some(format!("::{name}"));
        }
        let short = name.strip_prefix(MEMBER_PREFIX)?;
        deps.contains(FACADE_NAME)
            .then(|| format!("::{FACADE_NAME}::{short}"))
    }

    /// Return a [`syn::Path`] for the package named `name` as resolved from
    /// the invoking crate. See the type documentation for the rules.
    #[inline(never)]
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        let path = Self::resolve(&self.dependencies, name)
            .or_else(|| Self::resolve(&self.dev_dependencies, name))
            .unwrap_or_else(|| format!("::{name}"));
        syn::parse_str(&path).unwrap_or_else(|_| panic!("`{path}` is not a valid path"))
    }

    /// Runs `func` with the manifest of the invoking crate.
    ///
    /// Manifests are cached per path and re-read when the file changes.
    /// Reading is still relatively expensive, so call this once per macro
    /// invocation.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time = std::fs::metadata(&path)
            .and_then(|metadata| metadata.modified())
            .expect("The Cargo.toml should have a modified time.");

        {
            let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = manifests.get(&path)
                && manifest.modified_time == modified_time
            {
                return func(manifest);
            }
        }

        let manifest = Self::load(&path, modified_time);
        let result = func(&manifest);
        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);
        result
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::Manifest;

    fn deps(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| (*name).to_owned()).collect()
    }

    #[test]
    fn direct_dependency_wins() {
        let direct = deps(&["vc_assembler", "vc_assembly"]);
        assert_eq!(
            Manifest::resolve(&direct, "vc_assembler").as_deref(),
            Some("::vc_assembler")
        );
    }

    #[test]
    fn facade_dependency() {
        let facade = deps(&["vc_assembly"]);
        assert_eq!(
            Manifest::resolve(&facade, "vc_settings").as_deref(),
            Some("::vc_assembly::settings")
        );
        assert_eq!(Manifest::resolve(&facade, "serde"), None);
        assert_eq!(Manifest::resolve(&deps(&[]), "vc_assembler"), None);
    }
}
