//! Headless console: no display, no mixer, save memory in a file.

use std::path::PathBuf;

use anyhow::Result;

use partybox_core::console::{Console, ConsoleSpecs, NullAudio, NullGraphics};
use partybox_core::save_store::{FileSaveDevice, SaveDevice};
use partybox_shared::partybox_specs;

/// Console backend for running tournaments without any hardware.
#[derive(Debug, Clone, Default)]
pub struct HeadlessConsole {
    save_path: Option<PathBuf>,
}

impl HeadlessConsole {
    /// `save_path` of `None` means no save memory is fitted.
    pub fn new(save_path: Option<PathBuf>) -> Self {
        Self { save_path }
    }

    pub fn save_path(&self) -> Option<&std::path::Path> {
        self.save_path.as_deref()
    }
}

impl Console for HeadlessConsole {
    type Graphics = NullGraphics;
    type Audio = NullAudio;

    fn specs() -> &'static ConsoleSpecs {
        partybox_specs()
    }

    fn create_graphics(&self) -> Result<Self::Graphics> {
        Ok(NullGraphics::default())
    }

    fn create_audio(&self) -> Result<Self::Audio> {
        Ok(NullAudio)
    }

    fn open_save_device(&self) -> Option<Box<dyn SaveDevice>> {
        let path = self.save_path.as_ref()?;
        tracing::debug!("Save memory backed by {}", path.display());
        Some(Box::new(FileSaveDevice::new(path.clone())))
    }
}
