//! Per-package build workspaces.
//!
//! Each package gets a fresh directory holding nothing but its recipe, used as
//! the engine's build context. The directory is removed when the workspace is
//! dropped, so no recipe outlives its package.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use super::ExecuteError;
use crate::consts::RECIPE_FILENAME;
use crate::recipe::BuildRecipe;

#[derive(Debug)]
pub struct PackageWorkspace {
  dir: TempDir,
  recipe_path: PathBuf,
}

impl PackageWorkspace {
  /// Create a workspace below `root` and write `recipe` into it.
  pub fn create(root: &Path, package: &str, recipe: &BuildRecipe) -> Result<Self, ExecuteError> {
    fs::create_dir_all(root)?;
    let dir = tempfile::Builder::new()
      .prefix(&format!("{}-", package))
      .tempdir_in(root)?;

    let recipe_path = dir.path().join(RECIPE_FILENAME);
    fs::write(&recipe_path, recipe.render())?;

    debug!(path = %dir.path().display(), "created workspace");
    Ok(Self { dir, recipe_path })
  }

  /// Build context directory.
  pub fn path(&self) -> &Path {
    self.dir.path()
  }

  pub fn recipe_path(&self) -> &Path {
    &self.recipe_path
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::recipe::{RecipeOptions, build_recipe};
  use crate::report::{BuildInfo, BuildReport};
  use chrono::NaiveDate;
  use tempfile::TempDir;

  fn recipe() -> BuildRecipe {
    let options = RecipeOptions {
      base_image: "debian:stretch".to_string(),
      suites: vec!["sid".to_string()],
      source_mirror: "http://deb.debian.org/debian".to_string(),
      snapshot_base_url: "http://snapshot.debian.org/archive/debian/".to_string(),
    };
    let report = BuildReport {
      package: "attr".to_string(),
      build_time: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap(),
      info: BuildInfo::default(),
    };
    build_recipe(&options, &report, &[])
  }

  #[test]
  fn writes_recipe_into_fresh_directory() {
    let root = TempDir::new().unwrap();
    let recipe = recipe();

    let workspace = PackageWorkspace::create(root.path(), "attr", &recipe).unwrap();

    assert!(workspace.path().starts_with(root.path()));
    assert_eq!(workspace.recipe_path(), workspace.path().join("Dockerfile"));
    assert_eq!(fs::read_to_string(workspace.recipe_path()).unwrap(), recipe.render());
  }

  #[test]
  fn workspaces_do_not_share_recipes() {
    let root = TempDir::new().unwrap();
    let a = PackageWorkspace::create(root.path(), "attr", &recipe()).unwrap();
    let b = PackageWorkspace::create(root.path(), "attr", &recipe()).unwrap();

    assert_ne!(a.path(), b.path());
  }

  #[test]
  fn drop_removes_directory() {
    let root = TempDir::new().unwrap();
    let workspace = PackageWorkspace::create(&root.path().join("nested"), "attr", &recipe()).unwrap();
    let path = workspace.path().to_path_buf();

    drop(workspace);

    assert!(!path.exists());
  }
}
