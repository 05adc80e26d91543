use std::process::Command;
use std::time::Duration;

use crate::domain::models::Release;

/// Narrow capability over the upstream hosting side effects (subprocesses
/// and the release API).
pub trait Remote {
    /// Raw `git ls-remote` output for one branch of `owner/repo`.
    fn ls_remote(&self, owner: &str, repo: &str, branch: &str) -> anyhow::Result<String>;

    /// The release feed of `owner/repo`, newest-first or not; callers must
    /// not rely on feed ordering.
    fn releases(&self, owner: &str, repo: &str) -> anyhow::Result<Vec<Release>>;

    /// Content hash of `url` in the scheme the nix build expects, of the
    /// unpacked archive when `unpack` is set and of the raw bytes otherwise.
    fn prefetch_hash(&self, url: &str, unpack: bool) -> anyhow::Result<String>;
}

pub struct GitHub;

impl Remote for GitHub {
    fn ls_remote(&self, owner: &str, repo: &str, branch: &str) -> anyhow::Result<String> {
        let out = Command::new("git")
            .arg("ls-remote")
            .arg(format!("git@github.com:{}/{}", owner, repo))
            .arg(branch)
            .output()?;
        if !out.status.success() {
            anyhow::bail!(
                "git ls-remote failed for {}/{}: {}",
                owner,
                repo,
                String::from_utf8_lossy(&out.stderr).trim()
            );
        }
        Ok(String::from_utf8(out.stdout)?)
    }

    fn releases(&self, owner: &str, repo: &str) -> anyhow::Result<Vec<Release>> {
        let url = format!("https://api.github.com/repos/{}/{}/releases", owner, repo);
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("stagehand")
            .build()?;
        let body = client.get(url).send()?.error_for_status()?.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn prefetch_hash(&self, url: &str, unpack: bool) -> anyhow::Result<String> {
        let mut cmd = Command::new("nix-prefetch-url");
        if unpack {
            cmd.arg("--unpack");
        }
        let out = cmd.arg(url).output()?;
        if !out.status.success() {
            anyhow::bail!(
                "nix-prefetch-url failed for {}: {}",
                url,
                String::from_utf8_lossy(&out.stderr).trim()
            );
        }
        Ok(String::from_utf8(out.stdout)?.trim().to_string())
    }
}
