/// Application name, used for config and data directories.
pub const APP_NAME: &str = "debrepro";

/// Name of the config file looked up in the config directory.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "DEBREPRO_CONFIG";

/// Per-package report pages live under this URL as `<package>.html`.
pub const DEFAULT_REPORT_BASE_URL: &str = "https://tests.reproducible-builds.org/debian/rb-pkg/testing/amd64/";

/// Site root that build-info links on report pages are relative to.
pub const DEFAULT_REPORT_SITE_URL: &str = "https://tests.reproducible-builds.org";

/// Index of packages known to be reproducible, used by the `random` package set.
pub const DEFAULT_REPRODUCIBLE_INDEX_URL: &str =
  "https://tests.reproducible-builds.org/debian/testing/amd64/index_reproducible.html";

/// Root of the Debian snapshot archive.
pub const DEFAULT_SNAPSHOT_BASE_URL: &str = "http://snapshot.debian.org/archive/debian/";

/// Live archive mirror used for `deb-src` entries.
pub const DEFAULT_SOURCE_MIRROR: &str = "http://deb.debian.org/debian";

/// Base image for the build container.
pub const DEFAULT_BASE_IMAGE: &str = "debian:stretch";

/// Suites every selected snapshot is added for, in order.
pub const DEFAULT_SUITES: &[&str] = &["stretch", "sid"];

/// Container engine binary.
pub const DEFAULT_ENGINE: &str = "docker";

/// Image tag repository; images are tagged `<prefix>:<package>`.
pub const DEFAULT_TAG_PREFIX: &str = "reprod";

/// Command run inside the image against the built artifact.
pub const DEFAULT_HASH_COMMAND: &str = "sha256sum";

/// Default CSV report file name.
pub const DEFAULT_OUTPUT: &str = "reprotest.csv";

/// Working directory inside the container where sources are unpacked.
pub const PROJECT_DIR: &str = "/project";

/// Recipe file name inside a package workspace.
pub const RECIPE_FILENAME: &str = "Dockerfile";

/// Sentinel reported for wall and CPU times when a build fails.
pub const FAILED_TIME: f64 = -1.0;

/// Number of packages drawn by the `random` package set when unspecified.
pub const DEFAULT_RANDOM_SAMPLE: usize = 3;
