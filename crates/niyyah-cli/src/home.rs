use anyhow::Context;
use std::path::{Path, PathBuf};

/// Resolve the directory holding `config.yaml` and `session.yaml`.
///
/// Priority:
/// 1. `--home` flag / `NIYYAH_HOME` env var (passed in as `explicit`)
/// 2. `~/.niyyah`
pub fn resolve_home(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }
    niyyah_core::paths::default_home().context("cannot locate a home directory for niyyah")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_home_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_home(Some(dir.path())).unwrap();
        assert_eq!(result, dir.path());
    }

    #[test]
    fn default_home_ends_in_dot_niyyah() {
        if let Ok(home) = resolve_home(None) {
            assert!(home.ends_with(".niyyah"));
        }
    }
}
