//! Host platform keys.
//!
//! Release archives are published per operating system and CPU
//! architecture. A [`Platform`] is the pair identifying the running host,
//! and a [`PlatformMatch`] is the key a table row is authored for.
//!
//! # Example
//!
//! ```
//! use bizfly_schema::{Arch, Os, Platform};
//!
//! let host = Platform::new(Os::Linux, Arch::X86_64);
//! println!("Running on: {host}");
//! ```

use serde::{Deserialize, Serialize};

/// Operating systems release archives are published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// macOS (Darwin)
    Macos,
    /// Linux
    Linux,
}

impl Os {
    /// Get the current operating system, if it is one we publish for.
    pub fn current() -> Option<Self> {
        Self::from_consts(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value.
    pub fn from_consts(os: &str) -> Option<Self> {
        match os {
            "macos" => Some(Self::Macos),
            "linux" => Some(Self::Linux),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Macos => "macos",
            Self::Linux => "linux",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Os {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "macos" | "darwin" | "osx" => Ok(Self::Macos),
            "linux" => Ok(Self::Linux),
            _ => Err(format!("Unknown operating system: {s}")),
        }
    }
}

/// CPU architectures release archives are published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// 64-bit Intel/AMD
    X86_64,
    /// 64-bit ARM (Apple Silicon, aarch64 Linux)
    Arm64,
    /// 32-bit ARM
    Armv6,
}

impl Arch {
    /// Get the current architecture, if it is one we publish for.
    pub fn current() -> Option<Self> {
        Self::from_consts(std::env::consts::ARCH)
    }

    /// Map a `std::env::consts::ARCH` value.
    ///
    /// Any 32-bit ARM host (`arm`) is served by the `armv6` build.
    pub fn from_consts(arch: &str) -> Option<Self> {
        match arch {
            "x86_64" => Some(Self::X86_64),
            "aarch64" => Some(Self::Arm64),
            "arm" => Some(Self::Armv6),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Arm64 => "arm64",
            Self::Armv6 => "armv6",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x86_64" | "amd64" | "intel" => Ok(Self::X86_64),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            "armv6" | "armv6l" | "armv7" | "armv7l" | "arm" => Ok(Self::Armv6),
            _ => Err(format!("Unknown architecture: {s}")),
        }
    }
}

/// The (operating system, architecture) pair identifying a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform {
    /// Operating system
    pub os: Os,
    /// CPU architecture
    pub arch: Arch,
}

impl Platform {
    /// Build a platform from its parts.
    pub const fn new(os: Os, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Every platform the enums can describe.
    pub fn all() -> impl Iterator<Item = Self> {
        [Os::Macos, Os::Linux].into_iter().flat_map(|os| {
            [Arch::X86_64, Arch::Arm64, Arch::Armv6]
                .into_iter()
                .map(move |arch| Self::new(os, arch))
        })
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

/// The platform key a table row is authored for.
///
/// Two variants are enough for every published release: an exact
/// (os, arch) pair, or every architecture of one OS (universal builds).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlatformMatch {
    /// Exactly one (os, arch) pair.
    Exact {
        /// Operating system
        os: Os,
        /// CPU architecture
        arch: Arch,
    },
    /// Any architecture of the given OS.
    AnyArch {
        /// Operating system
        os: Os,
    },
}

impl PlatformMatch {
    /// Predicate: does this key select `platform`?
    pub fn matches(&self, platform: &Platform) -> bool {
        match *self {
            Self::Exact { os, arch } => platform.os == os && platform.arch == arch,
            Self::AnyArch { os } => platform.os == os,
        }
    }

    /// Whether some platform is matched by both keys.
    pub fn overlaps(&self, other: &Self) -> bool {
        match (*self, *other) {
            (Self::Exact { os: a, arch: x }, Self::Exact { os: b, arch: y }) => a == b && x == y,
            (Self::AnyArch { os: a }, Self::AnyArch { os: b })
            | (Self::AnyArch { os: a }, Self::Exact { os: b, .. })
            | (Self::Exact { os: a, .. }, Self::AnyArch { os: b }) => a == b,
        }
    }

    /// Operating system this key belongs to.
    pub fn os(&self) -> Os {
        match *self {
            Self::Exact { os, .. } | Self::AnyArch { os } => os,
        }
    }
}

impl std::fmt::Display for PlatformMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact { os, arch } => write!(f, "{os}-{arch}"),
            Self::AnyArch { os } => write!(f, "{os}-*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases() {
        assert_eq!("darwin".parse::<Os>().unwrap(), Os::Macos);
        assert_eq!("Linux".parse::<Os>().unwrap(), Os::Linux);
        assert_eq!("amd64".parse::<Arch>().unwrap(), Arch::X86_64);
        assert_eq!("aarch64".parse::<Arch>().unwrap(), Arch::Arm64);
        assert_eq!("armv7l".parse::<Arch>().unwrap(), Arch::Armv6);
        assert!("windows".parse::<Os>().is_err());
        assert!("riscv64".parse::<Arch>().is_err());
    }

    #[test]
    fn maps_std_consts() {
        assert_eq!(Arch::from_consts("aarch64"), Some(Arch::Arm64));
        assert_eq!(Arch::from_consts("arm"), Some(Arch::Armv6));
        assert_eq!(Arch::from_consts("x86"), None);
        assert_eq!(Os::from_consts("windows"), None);
    }

    #[test]
    fn any_arch_matches_every_arch_of_its_os() {
        let key = PlatformMatch::AnyArch { os: Os::Macos };
        for arch in [Arch::X86_64, Arch::Arm64, Arch::Armv6] {
            assert!(key.matches(&Platform::new(Os::Macos, arch)));
            assert!(!key.matches(&Platform::new(Os::Linux, arch)));
        }
    }

    #[test]
    fn overlap_rules() {
        let any_mac = PlatformMatch::AnyArch { os: Os::Macos };
        let mac_arm = PlatformMatch::Exact {
            os: Os::Macos,
            arch: Arch::Arm64,
        };
        let linux_arm = PlatformMatch::Exact {
            os: Os::Linux,
            arch: Arch::Arm64,
        };
        assert!(any_mac.overlaps(&mac_arm));
        assert!(mac_arm.overlaps(&any_mac));
        assert!(linux_arm.overlaps(&linux_arm));
        assert!(!mac_arm.overlaps(&linux_arm));
        assert!(!any_mac.overlaps(&linux_arm));
    }

    #[test]
    fn all_covers_six_pairs() {
        assert_eq!(Platform::all().count(), 6);
    }
}
