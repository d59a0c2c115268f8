use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// Clone a repository at a specific ref using shallow clone
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Personal access tokens
/// - Any authentication configured in ~/.gitconfig
pub fn clone_shallow(url: &str, ref_name: &str, target_dir: &Path) -> Result<()> {
    // git won't clone into an existing non-empty directory
    if target_dir.exists() {
        fs::remove_dir_all(target_dir)?;
    }
    if let Some(parent) = target_dir.parent() {
        fs::create_dir_all(parent)?;
    }

    debug!("Cloning {}@{} into {}", url, ref_name, target_dir.display());
    let output = Command::new("git")
        .args(["clone", "--depth=1", "--branch", ref_name, url])
        .arg(target_dir)
        .output()
        .map_err(|e| Error::GitClone {
            url: url.to_string(),
            r#ref: ref_name.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = if stderr.contains("Authentication failed")
            || stderr.contains("Permission denied")
            || stderr.contains("Could not read from remote repository")
        {
            format!(
                "Authentication failed. Make sure the objectionary is reachable.\n\
                Error: {}",
                stderr
            )
        } else {
            stderr.to_string()
        };
        return Err(Error::GitClone {
            url: url.to_string(),
            r#ref: ref_name.to_string(),
            message,
        });
    }

    Ok(())
}

/// Directory of the checkout of `url` at `ref_name` inside the cache root
pub fn checkout_path(cache_root: &Path, url: &str, ref_name: &str) -> PathBuf {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    url.hash(&mut hasher);
    let url_hash = format!("{:x}", hasher.finish());
    let safe_ref = ref_name.replace('/', "-");

    cache_root.join(format!("{}-{}", url_hash, safe_ref))
}

/// List all tags of a remote repository as `<hash> <tag>` rows
pub fn list_tag_hashes(url: &str) -> Result<String> {
    let output = Command::new("git")
        .args(["ls-remote", "--tags", url])
        .output()
        .map_err(|e| Error::GitCommand {
            command: "ls-remote --tags".to_string(),
            url: url.to_string(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(Error::GitCommand {
            command: "ls-remote --tags".to_string(),
            url: url.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(tag_rows(&String::from_utf8_lossy(&output.stdout)))
}

/// Convert `git ls-remote --tags` output (`<hash>\trefs/tags/<tag>`) into
/// `<hash> <tag>` rows. An annotated tag also has a peeled `<tag>^{}` row
/// naming the commit; that hash wins over the tag object's.
pub fn tag_rows(ls_remote: &str) -> String {
    let mut rows: Vec<(&str, &str)> = Vec::new();
    for line in ls_remote.lines() {
        let Some((hash, reference)) = line.split_once('\t') else {
            continue;
        };
        let Some(tag) = reference.strip_prefix("refs/tags/") else {
            continue;
        };
        let (tag, peeled) = match tag.strip_suffix("^{}") {
            Some(tag) => (tag, true),
            None => (tag, false),
        };
        match rows.iter_mut().find(|(t, _)| *t == tag) {
            Some(row) if peeled => row.1 = hash,
            Some(_) => {}
            None => rows.push((tag, hash)),
        }
    }
    rows.iter()
        .map(|(tag, hash)| format!("{} {}", hash, tag))
        .collect::<Vec<_>>()
        .join("\n")
}
