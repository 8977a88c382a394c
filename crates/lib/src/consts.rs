/// Substring marking builders that are driven by SCons.
pub const LEGACY_MARKER: &str = "scons";

/// Prefix of SCons builders that need the Linux build/install layout.
pub const LINUX_PREFIX: &str = "linux";

/// Source checkout SCons runs in, relative to the worker's directory.
pub const LEGACY_SOURCE_DIR: &str = "../blender";

/// Directory next to the executable holding SCons user configs.
pub const CONFIG_DIR_NAME: &str = "config";

/// SCons user config shared by the Linux 64-bit and 32-bit builders.
pub const USER_CONFIG_X86_64: &str = "user-config-x86_64.py";

/// Directory the packaging target writes its artifacts to.
pub const RELEASE_DIR: &str = "release";

/// File name prefix of the release package inside `RELEASE_DIR`.
pub const ARTIFACT_PREFIX: &str = "blender";

/// Archive uploaded to the master by the next buildbot step.
pub const UPLOAD_ARCHIVE: &str = "buildbot_upload.zip";

/// Binaries stripped after a successful Linux SCons build.
pub const STRIPPED_BINARIES: [&str; 2] = ["blender", "blenderplayer"];
