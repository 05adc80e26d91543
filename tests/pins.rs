use std::cell::RefCell;
use std::fs;

use stagehand::domain::models::{Release, ResolvedPin, Upstream};
use stagehand::services::github::Remote;
use stagehand::services::pins::{resolve_release_pin, resolve_repo_pin, update_all, write_pin};
use tempfile::TempDir;

struct FakeRemote {
    listing: String,
    releases: anyhow::Result<Vec<Release>>,
    prefetched: RefCell<Vec<(String, bool)>>,
}

impl FakeRemote {
    fn with_listing(listing: &str) -> Self {
        Self {
            listing: listing.to_string(),
            releases: Ok(vec![]),
            prefetched: RefCell::new(vec![]),
        }
    }

    fn with_releases(releases: Vec<Release>) -> Self {
        Self {
            listing: String::new(),
            releases: Ok(releases),
            prefetched: RefCell::new(vec![]),
        }
    }
}

impl Remote for FakeRemote {
    fn ls_remote(&self, _owner: &str, _repo: &str, _branch: &str) -> anyhow::Result<String> {
        Ok(self.listing.clone())
    }

    fn releases(&self, _owner: &str, _repo: &str) -> anyhow::Result<Vec<Release>> {
        match &self.releases {
            Ok(r) => Ok(r.clone()),
            Err(e) => Err(anyhow::anyhow!("{}", e)),
        }
    }

    fn prefetch_hash(&self, url: &str, unpack: bool) -> anyhow::Result<String> {
        self.prefetched.borrow_mut().push((url.to_string(), unpack));
        Ok(format!(
            "hash-of-{}",
            if unpack { "unpacked" } else { "raw" }
        ))
    }
}

fn release(tag: &str, prerelease: bool, draft: bool, created_at: &str) -> Release {
    Release {
        tag_name: tag.to_string(),
        prerelease,
        draft,
        created_at: created_at.to_string(),
    }
}

#[test]
fn repo_pin_builds_exact_archive_url() {
    let remote = FakeRemote::with_listing("0a1b2c\trefs/heads/main\n");
    let pin = resolve_repo_pin(&remote, "NixOS", "nixpkgs", "nixpkgs-unstable").unwrap();

    assert_eq!(pin.url, "https://github.com/NixOS/nixpkgs/archive/0a1b2c.tar.gz");
    assert_eq!(pin.sha256, "hash-of-unpacked");
    assert_eq!(pin.version, None);
    assert_eq!(
        remote.prefetched.borrow().as_slice(),
        &[(pin.url.clone(), true)]
    );
}

#[test]
fn repo_pin_fails_on_empty_listing() {
    let remote = FakeRemote::with_listing("");
    let err = resolve_repo_pin(&remote, "NixOS", "nixpkgs", "no-such-branch").unwrap_err();
    assert!(err.to_string().contains("no reference matching"));
    assert!(remote.prefetched.borrow().is_empty());
}

#[test]
fn release_pin_selects_latest_published_release() {
    let remote = FakeRemote::with_releases(vec![
        release("v0.1.0", false, false, "2023-01-01T00:00:00Z"),
        release("v0.3.0-rc1", true, false, "2023-06-01T00:00:00Z"),
        release("v0.2.0", false, false, "2023-03-01T00:00:00Z"),
    ]);
    let pin = resolve_release_pin(
        &remote,
        "rustwasm",
        "wasm-pack",
        "https://example.com/download/{tag}/tool",
    )
    .unwrap();

    assert_eq!(pin.url, "https://example.com/download/v0.2.0/tool");
    assert_eq!(pin.sha256, "hash-of-raw");
    assert_eq!(pin.version.as_deref(), Some("v0.2.0"));
    assert_eq!(
        remote.prefetched.borrow().as_slice(),
        &[(pin.url.clone(), false)]
    );
}

#[test]
fn release_pin_ignores_feed_order() {
    let remote = FakeRemote::with_releases(vec![
        release("old", false, false, "2022-01-01T00:00:00Z"),
        release("new", false, false, "2024-01-01T00:00:00Z"),
    ]);
    let pin = resolve_release_pin(&remote, "o", "r", "https://x/{tag}").unwrap();
    assert_eq!(pin.version.as_deref(), Some("new"));
}

#[test]
fn release_pin_fails_without_published_release() {
    let remote = FakeRemote::with_releases(vec![
        release("v1.0.0-beta", true, false, "2023-01-01T00:00:00Z"),
        release("v1.0.0", false, true, "2023-02-01T00:00:00Z"),
    ]);
    let err = resolve_release_pin(&remote, "o", "r", "https://x/{tag}").unwrap_err();
    assert!(err.to_string().contains("no published release"));
}

#[test]
fn write_pin_overwrites_with_pretty_json() {
    let dir = TempDir::new().unwrap();
    let with_version = ResolvedPin {
        url: "https://x/1".to_string(),
        sha256: "abc".to_string(),
        version: Some("v1".to_string()),
    };
    write_pin(&with_version, dir.path(), "tool").unwrap();

    let raw = fs::read_to_string(dir.path().join("tool.json")).unwrap();
    assert!(raw.starts_with("{\n  \"url\""));
    assert!(raw.contains("\"version\": \"v1\""));

    let without_version = ResolvedPin {
        url: "https://x/2".to_string(),
        sha256: "def".to_string(),
        version: None,
    };
    write_pin(&without_version, dir.path(), "tool").unwrap();

    let raw = fs::read_to_string(dir.path().join("tool.json")).unwrap();
    assert!(raw.contains("https://x/2"));
    assert!(!raw.contains("version"));
}

#[test]
fn update_all_aborts_on_first_failure() {
    let dir = TempDir::new().unwrap();
    let remote = FakeRemote {
        listing: "0a1b2c\trefs/heads/main\n".to_string(),
        releases: Err(anyhow::anyhow!("api unreachable")),
        prefetched: RefCell::new(vec![]),
    };
    let upstreams = vec![
        Upstream::Release {
            owner: "o".to_string(),
            repo: "r".to_string(),
            asset_template: "https://x/{tag}".to_string(),
            output: "first".to_string(),
        },
        Upstream::Branch {
            owner: "o".to_string(),
            repo: "r".to_string(),
            branch: "main".to_string(),
            output: "second".to_string(),
        },
    ];

    assert!(update_all(&remote, &upstreams, dir.path()).is_err());
    assert!(!dir.path().join("first.json").exists());
    assert!(!dir.path().join("second.json").exists());
}

#[test]
fn update_all_writes_one_file_per_upstream() {
    let dir = TempDir::new().unwrap();
    let remote = FakeRemote {
        listing: "feedbeef\trefs/heads/main\n".to_string(),
        releases: Ok(vec![release("v1.2.3", false, false, "2024-05-01T00:00:00Z")]),
        prefetched: RefCell::new(vec![]),
    };
    let upstreams = vec![
        Upstream::Release {
            owner: "o".to_string(),
            repo: "r".to_string(),
            asset_template: "https://x/{tag}/bin".to_string(),
            output: "tool".to_string(),
        },
        Upstream::Branch {
            owner: "o".to_string(),
            repo: "r".to_string(),
            branch: "main".to_string(),
            output: "source".to_string(),
        },
    ];

    update_all(&remote, &upstreams, dir.path()).unwrap();

    let tool: ResolvedPin =
        serde_json::from_str(&fs::read_to_string(dir.path().join("tool.json")).unwrap()).unwrap();
    assert_eq!(tool.version.as_deref(), Some("v1.2.3"));

    let source: ResolvedPin =
        serde_json::from_str(&fs::read_to_string(dir.path().join("source.json")).unwrap()).unwrap();
    assert_eq!(
        source.url,
        "https://github.com/o/r/archive/feedbeef.tar.gz"
    );
    assert_eq!(source.version, None);
}
