use crate::{Dataset, ATTR_VERSION};
use semver::Version;

/// Outcome of comparing the producing version recorded in a dataset with the
/// running application's version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
    Compatible,
    Missing,
    Unparsable(String),
    DevelopmentBuild { found: String, current: String },
    MajorMismatch { found: String, current: String },
}

impl VersionCheck {
    pub fn is_compatible(&self) -> bool {
        matches!(self, VersionCheck::Compatible)
    }

    pub fn title(&self) -> &'static str {
        match self {
            VersionCheck::Compatible => "Compatible version",
            VersionCheck::Missing => "Missing version",
            VersionCheck::Unparsable(_) => "Malformed version",
            VersionCheck::DevelopmentBuild { .. } => "Confirm development version",
            VersionCheck::MajorMismatch { .. } => "Confirm different major version",
        }
    }

    pub fn message(&self) -> String {
        match self {
            VersionCheck::Compatible => String::new(),
            VersionCheck::Missing => {
                "The results file does not record the version that produced it. \
                 It may not be compatible with this application.\n\nLoad anyway?"
                    .to_string()
            }
            VersionCheck::Unparsable(raw) => format!(
                "The results file records an unrecognized version '{raw}'.\n\nLoad anyway?"
            ),
            VersionCheck::DevelopmentBuild { found, current } => format!(
                "The results were produced by development version {found}, \
                 but this is version {current}.\n\nLoad anyway?"
            ),
            VersionCheck::MajorMismatch { found, current } => format!(
                "The results were produced by version {found}, which has a different \
                 major version than this application ({current}).\n\nLoad anyway?"
            ),
        }
    }
}

pub fn check_version(dataset: &Dataset, current: &str) -> VersionCheck {
    let Some(raw) = dataset.attrs.get(ATTR_VERSION) else {
        return VersionCheck::Missing;
    };
    let Ok(found) = Version::parse(raw.trim()) else {
        return VersionCheck::Unparsable(raw.clone());
    };
    let Ok(running) = Version::parse(current) else {
        log::warn!("running version '{current}' is not a semantic version");
        return VersionCheck::Compatible;
    };
    if !found.pre.is_empty() && running.pre.is_empty() {
        return VersionCheck::DevelopmentBuild {
            found: found.to_string(),
            current: running.to_string(),
        };
    }
    if found.major != running.major {
        return VersionCheck::MajorMismatch {
            found: found.to_string(),
            current: running.to_string(),
        };
    }
    VersionCheck::Compatible
}
