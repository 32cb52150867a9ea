//! Base operating system versions and the release policy attached to them.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ordered::Scalar;

/// The base operating system an image is built on.
///
/// SLE 15 service packs are numbered, the rolling distributions are named.
///
/// # Examples
///
/// ```
/// use bcigen_core::OsVersion;
///
/// let os: OsVersion = "5".parse().unwrap();
/// assert_eq!(os, OsVersion::Sp5);
/// assert_eq!(os.pretty_print(), "SP5");
/// assert_eq!(OsVersion::Tumbleweed.pretty_print(), "Tumbleweed");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OsVersion {
    Sp3,
    Sp4,
    Sp5,
    Sp6,
    Tumbleweed,
    /// Adaptable Linux Platform, Basalt project
    Basalt,
}

/// OS versions whose images carry the `released` release-stage label.
pub const RELEASED_OS_VERSIONS: &[OsVersion] = &[
    OsVersion::Sp3,
    OsVersion::Sp4,
    OsVersion::Sp5,
    OsVersion::Tumbleweed,
];

/// OS versions for which language and application stacks are built.
pub const ALL_NONBASE_OS_VERSIONS: &[OsVersion] =
    &[OsVersion::Sp5, OsVersion::Sp6, OsVersion::Tumbleweed];

/// OS versions for which OS base images are built.
pub const ALL_BASE_OS_VERSIONS: &[OsVersion] = &[
    OsVersion::Sp5,
    OsVersion::Sp6,
    OsVersion::Tumbleweed,
    OsVersion::Basalt,
];

/// OS versions on which an image may carry the `latest` tag.
pub const CAN_BE_LATEST_OS_VERSION: &[OsVersion] =
    &[OsVersion::Sp5, OsVersion::Tumbleweed, OsVersion::Basalt];

impl OsVersion {
    /// Service pack number, `None` for the rolling distributions.
    pub fn service_pack(self) -> Option<u32> {
        match self {
            OsVersion::Sp3 => Some(3),
            OsVersion::Sp4 => Some(4),
            OsVersion::Sp5 => Some(5),
            OsVersion::Sp6 => Some(6),
            OsVersion::Tumbleweed | OsVersion::Basalt => None,
        }
    }

    pub fn is_rolling(self) -> bool {
        self.service_pack().is_none()
    }

    pub fn is_opensuse(self) -> bool {
        self == OsVersion::Tumbleweed
    }

    /// `SP5`, `Tumbleweed`, `Basalt`. Lowercased, this is the suffix of
    /// every catalog key.
    pub fn pretty_print(self) -> String {
        match self.service_pack() {
            Some(sp) => format!("SP{sp}"),
            None => self.to_string(),
        }
    }

    pub fn pretty_os_version_no_dash(self) -> String {
        match self {
            OsVersion::Tumbleweed => "openSUSE Tumbleweed".to_owned(),
            OsVersion::Basalt => "Adaptable Linux Platform".to_owned(),
            _ => format!("15 SP{self}"),
        }
    }

    /// Packages providing lifecycle data for `zypper lifecycle`.
    pub fn lifecycle_data_pkg(self) -> Vec<&'static str> {
        if self.is_rolling() {
            Vec::new()
        } else {
            vec!["lifecycle-data-sle-module-development-tools"]
        }
    }

    pub fn release_stage(self) -> ReleaseStage {
        if RELEASED_OS_VERSIONS.contains(&self) {
            ReleaseStage::Released
        } else {
            ReleaseStage::Beta
        }
    }

    /// End of general support of the service pack, if already announced.
    pub fn supported_until(self) -> Option<NaiveDate> {
        match self {
            OsVersion::Sp4 => NaiveDate::from_ymd_opt(2023, 12, 31),
            _ => None,
        }
    }
}

impl fmt::Display for OsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsVersion::Tumbleweed => f.write_str("Tumbleweed"),
            OsVersion::Basalt => f.write_str("Basalt"),
            sp => match sp.service_pack() {
                Some(n) => write!(f, "{n}"),
                None => Ok(()),
            },
        }
    }
}

impl FromStr for OsVersion {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "3" => Ok(OsVersion::Sp3),
            "4" => Ok(OsVersion::Sp4),
            "5" => Ok(OsVersion::Sp5),
            "6" => Ok(OsVersion::Sp6),
            "Tumbleweed" => Ok(OsVersion::Tumbleweed),
            "Basalt" => Ok(OsVersion::Basalt),
            other => Err(crate::Error::InvalidOsVersion {
                value: other.to_owned(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for OsVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Scalar::deserialize(deserializer)?;
        raw.to_string().parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for OsVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Values of the `release-stage` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseStage {
    Beta,
    Released,
}

impl fmt::Display for ReleaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ReleaseStage::Beta => "beta",
            ReleaseStage::Released => "released",
        })
    }
}

/// Build architectures on OBS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Arch {
    #[serde(rename = "x86_64")]
    X86_64,
    #[serde(rename = "aarch64")]
    Aarch64,
    #[serde(rename = "ppc64le")]
    Ppc64le,
    #[serde(rename = "s390x")]
    S390x,
    /// Synthetic architecture of local builds, never a valid restriction.
    #[serde(rename = "local")]
    Local,
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Arch::X86_64 => "x86_64",
            Arch::Aarch64 => "aarch64",
            Arch::Ppc64le => "ppc64le",
            Arch::S390x => "s390x",
            Arch::Local => "local",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_display() {
        for os in [
            OsVersion::Sp3,
            OsVersion::Sp4,
            OsVersion::Sp5,
            OsVersion::Sp6,
            OsVersion::Tumbleweed,
            OsVersion::Basalt,
        ] {
            assert_eq!(os.to_string().parse::<OsVersion>().unwrap(), os);
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "15".parse::<OsVersion>().unwrap_err();
        assert!(err.to_string().contains("\"15\""), "got: {err}");
    }

    #[test]
    fn pretty_names() {
        assert_eq!(OsVersion::Sp6.pretty_os_version_no_dash(), "15 SP6");
        assert_eq!(
            OsVersion::Tumbleweed.pretty_os_version_no_dash(),
            "openSUSE Tumbleweed"
        );
        assert_eq!(
            OsVersion::Basalt.pretty_os_version_no_dash(),
            "Adaptable Linux Platform"
        );
        assert_eq!(OsVersion::Basalt.pretty_print(), "Basalt");
    }

    #[test]
    fn release_stage_follows_policy() {
        assert_eq!(OsVersion::Sp5.release_stage(), ReleaseStage::Released);
        assert_eq!(OsVersion::Tumbleweed.release_stage(), ReleaseStage::Released);
        assert_eq!(OsVersion::Sp6.release_stage(), ReleaseStage::Beta);
        assert_eq!(OsVersion::Basalt.release_stage(), ReleaseStage::Beta);
    }

    #[test]
    fn lifecycle_data_only_on_sle() {
        assert_eq!(OsVersion::Sp5.lifecycle_data_pkg().len(), 1);
        assert!(OsVersion::Tumbleweed.lifecycle_data_pkg().is_empty());
    }
}
