//! Fixed parts of every recipe.

/// Where apt sources are appended.
pub const SOURCES_LIST: &str = "/etc/apt/sources.list";

/// Snapshots are older than their `Valid-Until`; apt must accept them anyway.
pub const NO_CHECK_VALID_UNTIL: &str =
  "echo 'Acquire::Check-Valid-Until \"false\";' > /etc/apt/apt.conf.d/10no-check-valid-until";

/// Packages needed before any build dependency can be built against.
pub const BUILD_TOOLS: &[&str] = &["build-essential", "dpkg-dev", "fakeroot"];

/// apt-get install invocation shared by the tool and dependency installs.
pub const APT_INSTALL: &str = "apt-get install -y --no-install-recommends --allow-downgrades";

/// Command that builds the unpacked source into `.deb` files one level up.
pub const BUILD_COMMAND: &str = "dpkg-buildpackage -us -uc -tc";

/// Marks the end of the environment preamble.
pub const CLOSER: &str = "mkdir -p /project";

/// Environment set in the image before anything else runs.
pub const BOOTSTRAP_ENV: &[(&str, &str)] = &[("DEBIAN_FRONTEND", "noninteractive")];
