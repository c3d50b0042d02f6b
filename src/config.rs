//! Command-line settings shared by `serve` and `show`.

use std::path::PathBuf;

use clap::Args;

use crate::error::ConfigError;
use crate::git::SystemGit;
use crate::heatmap::{Heatmap, OpacityScale, MAX_OPACITY, MIN_OPACITY};

#[derive(Args, Debug, Clone)]
pub struct HeatmapArgs {
    /// git executable used for blame queries
    #[arg(long, value_name = "BIN", default_value = "git", global = true)]
    pub git: PathBuf,

    /// Opacity of the oldest line in a file
    #[arg(long, default_value_t = MIN_OPACITY, global = true)]
    pub min_opacity: f64,

    /// Opacity of the most recently changed line in a file
    #[arg(long, default_value_t = MAX_OPACITY, global = true)]
    pub max_opacity: f64,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub git: PathBuf,
    pub scale: OpacityScale,
}

impl HeatmapArgs {
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        let scale = OpacityScale::new(self.min_opacity, self.max_opacity).ok_or(ConfigError::InvalidScale {
            min: self.min_opacity,
            max: self.max_opacity,
        })?;

        Ok(Settings {
            git: self.git.clone(),
            scale,
        })
    }
}

impl Settings {
    pub fn heatmap(&self) -> Heatmap<SystemGit> {
        Heatmap::new(SystemGit::new(&self.git), self.scale)
    }
}
