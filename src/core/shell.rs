//! Host shell collaborator: confirmation, hand-off and discard

use std::path::PathBuf;

use anyhow::Context;

/// Window-lifecycle operations provided by whoever hosts the editor
pub trait SessionShell {
    /// Ask the user to confirm removing every annotation
    fn confirm_clear(&mut self) -> bool;

    /// Receive the encoded PNG of the finished composite
    fn save(&mut self, png: &[u8]) -> anyhow::Result<()>;

    /// The session was discarded without output
    fn cancel(&mut self);
}

/// Shell that writes the exported PNG to a file
#[derive(Debug, Clone)]
pub struct FileShell {
    output: PathBuf,
    assume_yes: bool,
}

impl FileShell {
    pub fn new(output: PathBuf, assume_yes: bool) -> Self {
        Self { output, assume_yes }
    }

    pub fn output(&self) -> &PathBuf {
        &self.output
    }
}

impl SessionShell for FileShell {
    fn confirm_clear(&mut self) -> bool {
        if !self.assume_yes {
            log::info!("Clear all declined");
        }
        self.assume_yes
    }

    fn save(&mut self, png: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = self.output.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&self.output, png)
            .with_context(|| format!("writing {}", self.output.display()))?;
        log::info!("Saved annotated screenshot to {}", self.output.display());
        Ok(())
    }

    fn cancel(&mut self) {
        log::info!("Annotation discarded, nothing written");
    }
}

/// Timestamped file name in the user's pictures directory
pub fn default_output_path() -> Option<PathBuf> {
    let mut path =
        dirs::picture_dir().or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))?;
    let name = chrono::Local::now()
        .format("Screenshot_%Y-%m-%d_%H-%M-%S.png")
        .to_string();
    path.push(name);
    Some(path)
}
