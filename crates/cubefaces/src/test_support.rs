//! Helpers shared by tests that run stand-in tools

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

static SPAWN_LOCK: Mutex<()> = Mutex::new(());

/// Serialise tests that write and then execute scripts
///
/// A script still open for writing in one thread while another thread forks
/// fails to exec with ETXTBSY.
pub fn spawn_lock() -> MutexGuard<'static, ()> {
    SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

/// Write an executable `/bin/sh` script named `name` into `dir`
#[cfg(unix)]
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Lines recorded by stand-in tools, empty if none ran
pub fn read_log(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .map(|s| s.lines().map(String::from).collect())
        .unwrap_or_default()
}
