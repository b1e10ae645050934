use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use sysinfo::{ProcessRefreshKind, System, UpdateKind};
use tokio::fs;
use tracing::{debug, warn};

use gacha_domain::ports::ProcessLocator;
use gacha_domain::RuntimeConfig;

/// Scans the OS process table for the game client.
pub struct SystemProcessLocator {
    executable_name: String,
    install_anchor: String,
    log_path_suffix: Vec<String>,
}

impl SystemProcessLocator {
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            executable_name: config.executable_name.clone(),
            install_anchor: config.install_anchor.clone(),
            log_path_suffix: config.log_path_suffix.clone(),
        }
    }
}

#[async_trait]
impl ProcessLocator for SystemProcessLocator {
    async fn locate(&self) -> Option<PathBuf> {
        let executable_name = self.executable_name.clone();
        let scan = tokio::task::spawn_blocking(move || find_executable(&executable_name)).await;
        let exe = match scan {
            Ok(found) => found?,
            Err(err) => {
                warn!("process scan task failed: {}", err);
                return None;
            }
        };
        let log_path = derive_log_path(&exe, &self.install_anchor, &self.log_path_suffix);
        if log_path.is_none() {
            warn!(exe = %exe.display(), anchor = %self.install_anchor, "executable is outside the install anchor");
        }
        log_path
    }
}

fn find_executable(name: &str) -> Option<PathBuf> {
    let mut system = System::new();
    system.refresh_processes_specifics(ProcessRefreshKind::new().with_exe(UpdateKind::OnlyIfNotSet));
    // The process may exit between listing and reading its image path.
    let exe = system
        .processes_by_exact_name(name)
        .find_map(|process| process.exe().map(Path::to_path_buf));
    debug!(name, found = exe.is_some(), "process scan");
    exe
}

/// Keeps `exe` up to and including its first component named `anchor`, then
/// appends `suffix`.
pub fn derive_log_path(exe: &Path, anchor: &str, suffix: &[String]) -> Option<PathBuf> {
    let mut root = PathBuf::new();
    let mut anchored = false;
    for component in exe.components() {
        root.push(component.as_os_str());
        if matches!(component, Component::Normal(part) if part == anchor) {
            anchored = true;
            break;
        }
    }
    if !anchored {
        return None;
    }
    root.extend(suffix);
    Some(root)
}

/// Serves a fixed, user-supplied log file once it exists.
pub struct StaticLogLocator {
    path: PathBuf,
}

impl StaticLogLocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProcessLocator for StaticLogLocator {
    async fn locate(&self) -> Option<PathBuf> {
        match fs::metadata(&self.path).await {
            Ok(meta) if meta.is_file() => Some(self.path.clone()),
            _ => {
                debug!(path = %self.path.display(), "log file not present yet");
                None
            }
        }
    }
}
