use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Resolves logical script/asset names to on-disk files.
///
/// When a project root is configured it fully shadows the asset root: a name
/// is looked up in exactly one place per load attempt, never both. This keeps
/// reload behavior predictable while an operator iterates on a project copy
/// of a script that also ships as a default asset.
pub struct FileStore {
    asset_root: PathBuf,
    project_root: Option<PathBuf>,
}

impl FileStore {
    pub fn new(asset_root: impl Into<PathBuf>) -> Self {
        Self { asset_root: asset_root.into(), project_root: None }
    }

    pub fn set_project_root(&mut self, root: Option<PathBuf>) {
        self.project_root = root;
    }

    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    pub fn resolve(&self, logical: &str) -> PathBuf {
        match &self.project_root {
            Some(root) => root.join(logical),
            None => self.asset_root.join(logical),
        }
    }

    pub fn read(&self, logical: &str) -> Result<Vec<u8>> {
        let path = self.resolve(logical);
        fs::read(&path).with_context(|| format!("reading '{}'", path.display()))
    }

    pub fn read_text(&self, logical: &str) -> Result<String> {
        let path = self.resolve(logical);
        fs::read_to_string(&path).with_context(|| format!("reading '{}'", path.display()))
    }

    /// Writes always land in the asset root; the editing collaborator saves
    /// back to the shipped defaults.
    pub fn write_asset(&self, name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.asset_root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating '{}'", parent.display()))?;
        }
        fs::write(&path, bytes).with_context(|| format!("writing '{}'", path.display()))
    }

    pub fn list_assets(&self) -> Result<Vec<String>> {
        list_dir(&self.asset_root)
    }

    pub fn list_project(&self) -> Result<Vec<String>> {
        match &self.project_root {
            Some(root) => list_dir(root),
            None => Ok(Vec::new()),
        }
    }
}

fn list_dir(root: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let entries =
        fs::read_dir(root).with_context(|| format!("listing '{}'", root.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("listing '{}'", root.display()))?;
        if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut file = fs::File::create(dir.join(name)).expect("create file");
        write!(file, "{contents}").expect("write file");
    }

    #[test]
    fn project_root_fully_shadows_asset_root() {
        let assets = tempfile::tempdir().expect("asset dir");
        let project = tempfile::tempdir().expect("project dir");
        write_file(assets.path(), "main.rhai", "asset version");
        write_file(project.path(), "main.rhai", "project version");

        let mut store = FileStore::new(assets.path());
        assert_eq!(store.read_text("main.rhai").expect("asset read"), "asset version");

        store.set_project_root(Some(project.path().to_path_buf()));
        assert_eq!(store.read_text("main.rhai").expect("project read"), "project version");

        // Shadowing is total: a name missing from the project is not retried
        // against the assets.
        write_file(assets.path(), "only_asset.rhai", "x");
        assert!(store.read("only_asset.rhai").is_err(), "project root must shadow fully");
    }

    #[test]
    fn missing_file_reports_instead_of_panicking() {
        let assets = tempfile::tempdir().expect("asset dir");
        let store = FileStore::new(assets.path());
        let err = store.read("nope.rhai").unwrap_err();
        assert!(err.to_string().contains("nope.rhai"), "error should name the file");
    }

    #[test]
    fn asset_writes_land_in_the_asset_root_even_with_a_project() {
        let assets = tempfile::tempdir().expect("asset dir");
        let project = tempfile::tempdir().expect("project dir");
        let mut store = FileStore::new(assets.path());
        store.set_project_root(Some(project.path().to_path_buf()));
        store.write_asset("saved/flavor.json", b"{}").expect("write asset");
        assert!(assets.path().join("saved/flavor.json").exists());
        assert_eq!(store.asset_root(), assets.path());
        // Reads still resolve against the shadowing project root.
        assert!(store.read("saved/flavor.json").is_err());
    }

    #[test]
    fn listing_is_sorted_and_files_only() {
        let assets = tempfile::tempdir().expect("asset dir");
        write_file(assets.path(), "b.rhai", "");
        write_file(assets.path(), "a.rhai", "");
        fs::create_dir(assets.path().join("sub")).expect("subdir");
        let store = FileStore::new(assets.path());
        assert_eq!(store.list_assets().expect("list"), vec!["a.rhai", "b.rhai"]);
        assert!(store.list_project().expect("empty project list").is_empty());
    }
}
