//! Calendar months and the bundled resource table.
//!
//! Every month is paired with a template image (`assets/{Month}.png`) and an
//! audio clip (`assets/audio/{Month}.wav`). The table is validated once at
//! startup so a missing file is reported up front, not on the click that
//! would have used it.

use std::path::{Path, PathBuf};

/// One of the twelve calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// English label, as shown in the month selector.
    pub fn label(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error raised when bundled resources fail startup validation.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("resource directory not found: {0}")]
    BaseDirMissing(PathBuf),
    #[error("missing bundled resource file(s): {}", .0.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    FilesMissing(Vec<PathBuf>),
}

/// Validated month → resource path table.
///
/// Construction checks that all 24 files (12 templates, 12 audio clips)
/// exist under the base directory and fails with the full list of missing
/// entries otherwise.
#[derive(Debug, Clone)]
pub struct Resources {
    base: PathBuf,
}

impl Resources {
    /// Validate the resource tree rooted at `base` and build the table.
    pub fn discover(base: impl Into<PathBuf>) -> Result<Self, ResourceError> {
        let base = base.into();
        if !base.is_dir() {
            return Err(ResourceError::BaseDirMissing(base));
        }

        let resources = Self { base };
        let missing: Vec<PathBuf> = Month::ALL
            .iter()
            .flat_map(|&m| [resources.template_path(m), resources.audio_path(m)])
            .filter(|p| !p.is_file())
            .collect();

        if missing.is_empty() {
            log::info!(
                "Validated {} bundled resources under {}",
                Month::ALL.len() * 2,
                resources.base.display()
            );
            Ok(resources)
        } else {
            Err(ResourceError::FilesMissing(missing))
        }
    }

    /// Resource root this table was validated against.
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Path of the template image for `month`.
    pub fn template_path(&self, month: Month) -> PathBuf {
        self.base.join(format!("{}.png", month.label()))
    }

    /// Path of the audio clip for `month`.
    pub fn audio_path(&self, month: Month) -> PathBuf {
        self.base.join("audio").join(format!("{}.wav", month.label()))
    }
}
