// Key image presentation
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Icons are drawn at this fraction of the key size
pub const ICON_SCALE: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    /// Single-device action, configured output is the default
    Active,
    Inactive,
    /// Toggle action, device A is the default
    DeviceA,
    DeviceB,
    NoDevice,
}

impl Icon {
    pub fn asset_name(self) -> &'static str {
        match self {
            Icon::Active => "speaker.png",
            Icon::Inactive => "disabled.png",
            Icon::DeviceA => "speakers.png",
            Icon::DeviceB => "headphones.png",
            Icon::NoDevice => "none.png",
        }
    }
}

pub trait Presenter {
    fn set_icon(&mut self, icon: Icon, scale: f32);

    /// Host error display, `code` is one of the action error codes
    fn show_error(&mut self, code: u32);
}

/// Writes key images to stdout and raises errors as desktop notifications
#[derive(Debug, Clone)]
pub struct ConsolePresenter {
    instance: String,
    assets_dir: PathBuf,
    notify: bool,
}

impl ConsolePresenter {
    pub fn new(instance: impl Into<String>, assets_dir: impl Into<PathBuf>, notify: bool) -> Self {
        Self {
            instance: instance.into(),
            assets_dir: assets_dir.into(),
            notify,
        }
    }
}

impl Presenter for ConsolePresenter {
    fn set_icon(&mut self, icon: Icon, scale: f32) {
        let path = self.assets_dir.join(icon.asset_name());
        info!("{}: showing {:?} ({})", self.instance, icon, path.display());
        println!("{}\t{:?}\t{}\t{:.2}", self.instance, icon, path.display(), scale);
    }

    fn show_error(&mut self, code: u32) {
        error!("{}: action error {}", self.instance, code);
        if self.notify {
            if let Err(e) = crate::notifications::show_error_notification(&self.instance, code) {
                warn!("{}", e);
            }
        }
    }
}
