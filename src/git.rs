//! Git repository access via libgit2.
//!
//! Two consumers: compare mode materializes the tree of a ref into a
//! temp directory, and `--git-diff` restricts CI annotations to files
//! changed against a ref.

use std::collections::HashSet;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use git2::{DiffOptions, ObjectType, Repository, Tree};

/// Wrapper around a `git2::Repository` with its resolved root path.
pub struct GitRepo {
    repo: Repository,
    root: PathBuf,
}

impl GitRepo {
    /// Open the git repository that contains `path`.
    pub fn open(path: &Path) -> Result<Self, Box<dyn Error>> {
        let repo = Repository::discover(path)?;
        let root = repo
            .workdir()
            .ok_or("bare repositories are not supported")?
            .to_path_buf();
        Ok(Self { repo, root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files changed between the tree at `refspec` and the working
    /// directory (index included), as repository-relative paths.
    pub fn changed_files(&self, refspec: &str) -> Result<HashSet<PathBuf>, Box<dyn Error>> {
        let obj = self
            .repo
            .revparse_single(refspec)
            .map_err(|e| format!("cannot resolve ref '{refspec}': {e}"))?;
        let commit = obj
            .peel_to_commit()
            .map_err(|e| format!("'{refspec}' is not a commit: {e}"))?;
        let tree = commit.tree()?;

        let mut opts = DiffOptions::new();
        let diff = self
            .repo
            .diff_tree_to_workdir_with_index(Some(&tree), Some(&mut opts))?;

        let mut paths = HashSet::new();
        for delta in diff.deltas() {
            if let Some(path) = delta.new_file().path() {
                paths.insert(path.to_path_buf());
            }
        }
        Ok(paths)
    }

    /// Extract the file tree at a given git ref (e.g. "HEAD", "main~3")
    /// into a destination directory. Writes blobs as files and recurses
    /// into subtrees. Skips submodules and symlinks.
    pub fn extract_tree(&self, refspec: &str, dest: &Path) -> Result<(), Box<dyn Error>> {
        let obj = self
            .repo
            .revparse_single(refspec)
            .map_err(|e| format!("cannot resolve ref '{refspec}': {e}"))?;
        let commit = obj
            .peel_to_commit()
            .map_err(|e| format!("'{refspec}' is not a commit: {e}"))?;
        let tree = commit.tree()?;
        self.write_tree_recursive(&tree, dest)
    }

    fn write_tree_recursive(&self, tree: &Tree, dest: &Path) -> Result<(), Box<dyn Error>> {
        for entry in tree.iter() {
            let name = entry
                .name()
                .ok_or_else(|| format!("non-UTF-8 entry in tree: {:?}", entry.id()))?;
            let path = dest.join(name);

            match entry.kind() {
                Some(ObjectType::Blob) => {
                    let blob = self.repo.find_blob(entry.id())?;
                    fs::write(&path, blob.content())?;
                }
                Some(ObjectType::Tree) => {
                    let subtree = self.repo.find_tree(entry.id())?;
                    fs::create_dir_all(&path)?;
                    self.write_tree_recursive(&subtree, &path)?;
                }
                _ => {} // skip submodules, symlinks, etc.
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "git_test.rs"]
mod tests;
