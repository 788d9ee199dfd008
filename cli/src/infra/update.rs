//! Update notifier implementing `UpdateNotice` using GitHub releases.
//!
//! One release check per process, started in the background at startup and
//! never awaited: if it has not finished by the time the command succeeds,
//! no notice is printed.

use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result};
use owo_colors::OwoColorize as _;

use crate::application::ports::UpdateNotice;

const REPO_OWNER: &str = "fleetjoin";
const REPO_NAME: &str = "fleetjoin";

static NOTIFIER: OnceLock<UpdateNotifier> = OnceLock::new();

pub struct UpdateNotifier {
    current: semver::Version,
    latest: Arc<OnceLock<semver::Version>>,
}

impl UpdateNotifier {
    /// The process-wide notifier. The first call decides whether a check runs.
    ///
    /// Must be called from within a tokio runtime when `enabled`.
    pub fn global(enabled: bool) -> &'static Self {
        NOTIFIER.get_or_init(|| Self::start(enabled))
    }

    fn start(enabled: bool) -> Self {
        let current = semver::Version::parse(env!("CARGO_PKG_VERSION"))
            .unwrap_or_else(|_| semver::Version::new(0, 0, 0));
        let latest = Arc::new(OnceLock::new());
        if enabled {
            let slot = Arc::clone(&latest);
            let baseline = current.clone();
            tokio::task::spawn_blocking(move || match newer_release(&baseline) {
                Ok(Some(version)) => {
                    let _ = slot.set(version);
                }
                Ok(None) => {}
                Err(e) => tracing::debug!(error = %e, "update check failed"),
            });
        }
        Self { current, latest }
    }
}

fn newer_release(current: &semver::Version) -> Result<Option<semver::Version>> {
    let releases = self_update::backends::github::ReleaseList::configure()
        .repo_owner(REPO_OWNER)
        .repo_name(REPO_NAME)
        .build()
        .context("failed to configure update check")?
        .fetch()
        .context("failed to check for updates")?;

    let Some(latest) = releases.first() else {
        return Ok(None);
    };
    let version = latest.version.trim_start_matches('v');
    let latest = semver::Version::parse(version)
        .with_context(|| format!("invalid release version: {version}"))?;
    Ok(is_newer(current, &latest).then_some(latest))
}

fn is_newer(current: &semver::Version, candidate: &semver::Version) -> bool {
    candidate > current
}

impl UpdateNotice for UpdateNotifier {
    fn has_update(&self) -> bool {
        self.latest.get().is_some()
    }

    fn notify(&self) {
        if let Some(latest) = self.latest.get() {
            eprintln!();
            eprintln!(
                "  {} Update available: {} -> {}",
                "!".yellow(),
                self.current,
                latest.green()
            );
        }
    }
}
