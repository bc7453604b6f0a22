use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use aero_core::{Error, Result};

/// Runs the mirrored command; a collaborator so the mirror protocol can be
/// tested without spawning processes.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<String>;
}

pub struct ShellRunner;

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<String> {
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| Error::Command(format!("could not run {}: {}", program, e)))?;
        if !output.status.success() {
            return Err(Error::Command(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Where the mirrored lines are published when they change.
#[async_trait]
pub trait PageSink: Send + Sync {
    async fn replace(&self, lines: &[String]) -> Result<()>;
}

/// Last published output, one line per line.
pub struct MirrorCache {
    path: PathBuf,
}

impl MirrorCache {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cached_lines(&self) -> Vec<String> {
        fs::read_to_string(&self.path)
            .map(|text| text.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn write_lines(&self, lines: &[String]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, lines.join("\n"))?;
        Ok(())
    }
}

/// Run the command and republish its output only when it changed since the
/// last run. Returns whether the page was updated.
pub async fn mirror_command(
    runner: &dyn CommandRunner,
    cache: &MirrorCache,
    sink: &dyn PageSink,
    program: &str,
    args: &[String],
) -> Result<bool> {
    let output = runner.run(program, args).await?;
    let lines: Vec<String> = output.trim_end().lines().map(str::to_string).collect();

    if lines == cache.cached_lines() {
        info!("⏭️ output of {} unchanged, skipping page update", program);
        return Ok(false);
    }

    sink.replace(&lines).await?;
    cache.write_lines(&lines)?;
    info!("📝 mirrored {} lines from {}", lines.len(), program);
    Ok(true)
}
