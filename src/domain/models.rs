use serde::{Deserialize, Serialize};

/// One upstream dependency tracked by `stagehand pins`.
///
/// Branch upstreams are pinned to the tip commit of a branch; release
/// upstreams are pinned to the newest published (non-draft, non-prerelease)
/// release of a repository.
#[derive(Debug, Clone)]
pub enum Upstream {
    Branch {
        owner: String,
        repo: String,
        branch: String,
        output: String,
    },
    Release {
        owner: String,
        repo: String,
        /// Download URL template; `{tag}` is substituted with the release tag.
        asset_template: String,
        output: String,
    },
}

impl Upstream {
    pub fn coords(&self) -> (&str, &str) {
        match self {
            Upstream::Branch { owner, repo, .. } => (owner, repo),
            Upstream::Release { owner, repo, .. } => (owner, repo),
        }
    }

    pub fn output(&self) -> &str {
        match self {
            Upstream::Branch { output, .. } => output,
            Upstream::Release { output, .. } => output,
        }
    }
}

/// Pin record written to `<output>.json` and consumed by the nix build.
/// The file is always a full overwrite; `version` is only present for
/// release upstreams.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ResolvedPin {
    pub url: String,
    pub sha256: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Subset of a GitHub release object that the updater cares about.
#[derive(Debug, Deserialize, Clone)]
pub struct Release {
    pub tag_name: String,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub draft: bool,
    pub created_at: String,
}
