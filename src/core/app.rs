//! Editing session lifecycle
//!
//! A session owns the editor and the host shell. It decodes the base image
//! on open, routes host input while editing, and hands the encoded
//! composite to the shell on save.

use std::path::PathBuf;

use super::shell::SessionShell;
use crate::capture::image::BaseImage;
use crate::config::EditorConfig;
use crate::error::{EditorError, Result};
use crate::render::compositor;
use crate::session::Editor;
use crate::session::messages::{EditorMsg, HostEvent};

/// Where a session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepting input
    Editing,
    /// Composite is being encoded; input is rejected
    Exporting,
    /// Composite was handed to the shell
    Saved,
    /// Discarded without output
    Cancelled,
}

impl SessionState {
    pub fn is_ended(self) -> bool {
        matches!(self, SessionState::Saved | SessionState::Cancelled)
    }
}

pub struct EditorSession<S> {
    editor: Editor,
    shell: S,
    state: SessionState,
}

impl<S: SessionShell> EditorSession<S> {
    /// Decode the base image and start editing it
    pub async fn open(path: impl Into<PathBuf>, config: &EditorConfig, shell: S) -> Result<Self> {
        let path = path.into();
        log::info!("Opening {} for annotation", path.display());
        let base = BaseImage::open(path).await?;
        Ok(Self::new(base, config, shell))
    }

    pub fn new(base: BaseImage, config: &EditorConfig, shell: S) -> Self {
        Self {
            editor: Editor::new(base, config),
            shell,
            state: SessionState::Editing,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    /// Route one host event; returns false if the session is not editing
    pub fn dispatch(&mut self, event: HostEvent) -> bool {
        if self.state != SessionState::Editing {
            log::debug!("Ignoring {:?} in state {:?}", event, self.state);
            return false;
        }
        match event {
            HostEvent::Toolbar(EditorMsg::ClearAll) => {
                self.clear_all();
            }
            event => self.editor.handle(event),
        }
        true
    }

    /// Remove every annotation after the shell confirms
    pub fn clear_all(&mut self) -> bool {
        if self.state != SessionState::Editing || self.editor.scene().is_empty() {
            return false;
        }
        if !self.shell.confirm_clear() {
            return false;
        }
        self.editor.update(EditorMsg::ClearAll);
        true
    }

    /// Flatten, encode and hand the composite to the shell
    ///
    /// On failure the session returns to editing with the scene intact.
    pub async fn save(&mut self) -> Result<()> {
        if self.state != SessionState::Editing {
            return Err(EditorError::SessionEnded);
        }
        self.editor.settle();
        self.state = SessionState::Exporting;

        let png = match self.export().await {
            Ok(png) => png,
            Err(err) => {
                log::error!("Export failed: {err}");
                self.state = SessionState::Editing;
                return Err(err);
            }
        };

        if let Err(err) = self.shell.save(&png) {
            log::error!("Shell rejected the composite: {err:?}");
            self.state = SessionState::Editing;
            return Err(EditorError::Save(err.into()));
        }
        log::info!("Session saved ({} bytes)", png.len());
        self.state = SessionState::Saved;
        Ok(())
    }

    async fn export(&self) -> Result<Vec<u8>> {
        let scene = self.editor.scene();
        let base = scene.base().clone();
        let objects = scene.objects().to_vec();
        let png = tokio::task::spawn_blocking(move || {
            let image = compositor::flatten(base.rgba(), &objects);
            compositor::encode_png(&image)
        })
        .await??;
        Ok(png)
    }

    /// Discard the session without output
    pub fn cancel(&mut self) {
        if self.state.is_ended() {
            return;
        }
        self.shell.cancel();
        self.state = SessionState::Cancelled;
        log::info!("Session cancelled");
    }
}
