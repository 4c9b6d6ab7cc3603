//! Platform tag for platform-specific index selection.
//!
//! Remote products may publish a platform-specific sub-index named
//! `index-<platform>.json` next to the platform-independent `index.json`.
//! The tag here must match what publishers use.

/// Platform tag of the running build.
#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
pub const PLATFORM: &str = "linux-64";

#[cfg(all(target_os = "linux", target_arch = "x86"))]
pub const PLATFORM: &str = "linux-32";

#[cfg(all(target_os = "linux", target_arch = "aarch64"))]
pub const PLATFORM: &str = "linux-arm64";

#[cfg(all(target_os = "macos", target_arch = "x86_64"))]
pub const PLATFORM: &str = "osx-64";

#[cfg(all(target_os = "macos", target_arch = "aarch64"))]
pub const PLATFORM: &str = "osx-arm64";

#[cfg(all(target_os = "windows", target_arch = "x86_64"))]
pub const PLATFORM: &str = "win-64";

#[cfg(all(target_os = "windows", target_arch = "x86"))]
pub const PLATFORM: &str = "win-32";

#[cfg(not(any(
    all(target_os = "linux", any(target_arch = "x86_64", target_arch = "x86", target_arch = "aarch64")),
    all(target_os = "macos", any(target_arch = "x86_64", target_arch = "aarch64")),
    all(target_os = "windows", any(target_arch = "x86_64", target_arch = "x86")),
)))]
pub const PLATFORM: &str = "unknown";

/// Platform tag of the running build.
pub fn custom_platform() -> &'static str {
    PLATFORM
}
