use std::path::Path;

use crate::domain::models::{Release, ResolvedPin, Upstream};
use crate::services::github::Remote;

#[derive(thiserror::Error, Debug)]
pub enum PinError {
    #[error("no reference matching {branch} on {owner}/{repo}")]
    NoMatchingRef {
        owner: String,
        repo: String,
        branch: String,
    },
    #[error("no published release for {owner}/{repo}")]
    NoPublishedRelease { owner: String, repo: String },
}

/// The upstreams whose pins this tool maintains.
pub fn tracked_upstreams() -> Vec<Upstream> {
    vec![
        Upstream::Release {
            owner: "rustwasm".to_string(),
            repo: "wasm-pack".to_string(),
            asset_template:
                "https://github.com/rustwasm/wasm-pack/releases/download/{tag}/wasm-pack-init"
                    .to_string(),
            output: "wasm-pack".to_string(),
        },
        Upstream::Branch {
            owner: "NixOS".to_string(),
            repo: "nixpkgs".to_string(),
            branch: "nixpkgs-unstable".to_string(),
            output: "nixpkgs".to_string(),
        },
    ]
}

/// Pin `owner/repo` to the tip commit of `branch`.
///
/// The archive URL is derived from the commit id, and the hash covers the
/// unpacked archive contents, matching what the nix fetcher verifies.
pub fn resolve_repo_pin(
    remote: &dyn Remote,
    owner: &str,
    repo: &str,
    branch: &str,
) -> anyhow::Result<ResolvedPin> {
    let listing = remote.ls_remote(owner, repo, branch)?;
    let commit = listing
        .split_whitespace()
        .next()
        .ok_or_else(|| PinError::NoMatchingRef {
            owner: owner.to_string(),
            repo: repo.to_string(),
            branch: branch.to_string(),
        })?;

    let url = format!(
        "https://github.com/{}/{}/archive/{}.tar.gz",
        owner, repo, commit
    );
    let sha256 = remote.prefetch_hash(&url, true)?;

    Ok(ResolvedPin {
        url,
        sha256,
        version: None,
    })
}

/// Pin `owner/repo` to its newest published release.
///
/// Drafts and prereleases are skipped. The feed is re-sorted by creation
/// time instead of trusting its ordering. The artifact is a single binary,
/// so the hash covers the raw bytes.
pub fn resolve_release_pin(
    remote: &dyn Remote,
    owner: &str,
    repo: &str,
    asset_template: &str,
) -> anyhow::Result<ResolvedPin> {
    let mut published: Vec<Release> = remote
        .releases(owner, repo)?
        .into_iter()
        .filter(|r| !r.draft && !r.prerelease)
        .collect();
    published.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let latest = published
        .first()
        .ok_or_else(|| PinError::NoPublishedRelease {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })?;

    let url = asset_template.replace("{tag}", &latest.tag_name);
    let sha256 = remote.prefetch_hash(&url, false)?;

    Ok(ResolvedPin {
        url,
        sha256,
        version: Some(latest.tag_name.clone()),
    })
}

/// Overwrite `<output>.json` in `dir` with the pin record.
pub fn write_pin(pin: &ResolvedPin, dir: &Path, output: &str) -> anyhow::Result<()> {
    let path = dir.join(format!("{}.json", output));
    std::fs::write(path, serde_json::to_string_pretty(pin)?)?;
    Ok(())
}

/// Refresh every tracked upstream, strictly in order. The first failure
/// aborts the remaining updates.
pub fn update_all(
    remote: &dyn Remote,
    upstreams: &[Upstream],
    out_dir: &Path,
) -> anyhow::Result<()> {
    for upstream in upstreams {
        let (owner, repo) = upstream.coords();
        println!("Updating {}/{}...", owner, repo);
        let pin = match upstream {
            Upstream::Branch {
                owner,
                repo,
                branch,
                ..
            } => resolve_repo_pin(remote, owner, repo, branch)?,
            Upstream::Release {
                owner,
                repo,
                asset_template,
                ..
            } => resolve_release_pin(remote, owner, repo, asset_template)?,
        };
        write_pin(&pin, out_dir, upstream.output())?;
    }
    Ok(())
}
