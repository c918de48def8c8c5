//! Build info scanner.
//!
//! A `.buildinfo` document is a deb822 paragraph. Only a handful of fields
//! matter here and they are picked out line by line:
//!
//! ```text
//! Source: attr
//! Binary: attr libattr1 libattr1-dev
//! Version: 1:2.4.47-2
//! Checksums-Sha256:
//!  5e1d...  60128 attr_2.4.47-2_amd64.deb
//! Installed-Build-Depends:
//!  autoconf (= 2.69-10),
//! ```
//!
//! Everything after `Installed-Build-Depends:` is taken as the dependency
//! block.

use tracing::debug;

use super::BuildInfo;

const VERSION_FIELD: &str = "Version:";
const BINARY_FIELD: &str = "Binary:";
const SOURCE_FIELD: &str = "Source:";
const CHECKSUMS_HEADER: &str = "Checksums-Sha256:";
const DEPENDS_HEADER: &str = "Installed-Build-Depends:";

/// Where the scanner is within the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
  /// Reading single-line fields.
  Header,
  /// Inside `Checksums-Sha256:`, looking for the artifact line.
  ChecksumBlock,
  /// Past `Installed-Build-Depends:`; every line is a dependency line.
  Dependencies,
}

/// Line-driven state machine over a build info document.
#[derive(Debug, Clone)]
pub struct BuildInfoParser {
  package: String,
  state: ScanState,
  info: BuildInfo,
}

impl BuildInfoParser {
  /// Start scanning the build info of `package`.
  pub fn new(package: impl Into<String>) -> Self {
    Self {
      package: package.into(),
      state: ScanState::Header,
      info: BuildInfo::default(),
    }
  }

  pub fn state(&self) -> ScanState {
    self.state
  }

  /// Consume one line.
  pub fn feed(&mut self, line: &str) {
    if self.state == ScanState::Dependencies {
      self.info.dependencies.push_line(line);
      return;
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    self.read_field(line, &words);

    if self.state == ScanState::ChecksumBlock && self.read_checksum(&words) {
      self.state = ScanState::Header;
    }

    if line == CHECKSUMS_HEADER {
      self.state = ScanState::ChecksumBlock;
    } else if line == DEPENDS_HEADER {
      debug!(package = %self.package, "entering dependency block");
      self.state = ScanState::Dependencies;
    }
  }

  /// Finish scanning and return what was found.
  pub fn finish(self) -> BuildInfo {
    if self.info.expected_hash.is_empty() {
      debug!(package = %self.package, "no checksum found for artifact");
    }
    self.info
  }

  fn read_field(&mut self, line: &str, words: &[&str]) {
    let (Some(&keyword), Some(&value)) = (words.first(), words.get(1)) else {
      return;
    };

    match keyword {
      VERSION_FIELD => {
        self.info.version = value.to_string();
        self.info.short_version = match value.split_once(':') {
          Some((_epoch, short)) => short.to_string(),
          None => value.to_string(),
        };
      }
      BINARY_FIELD => {
        self.info.source_package = if line.contains(&format!(" {} ", self.package)) {
          self.package.clone()
        } else {
          value.to_string()
        };
      }
      SOURCE_FIELD => {
        self.info.source_dir = value.to_string();
      }
      _ => {}
    }
  }

  /// Take hash, size and file name from a checksum line naming our artifact.
  fn read_checksum(&mut self, words: &[&str]) -> bool {
    let [hash, size, file, ..] = words else {
      return false;
    };

    let prefix = format!("{}_{}", self.info.source_package, self.info.short_version);
    if !(file.contains(&prefix) && file.contains(".deb")) {
      return false;
    }

    self.info.expected_hash = hash.to_string();
    self.info.artifact_size = size.parse().ok();
    self.info.artifact = file.to_string();
    true
  }
}

/// Scan a whole build info document for `package`.
pub fn parse_build_info(package: &str, text: &str) -> BuildInfo {
  let mut parser = BuildInfoParser::new(package);
  for line in text.lines() {
    parser.feed(line);
  }
  parser.finish()
}

#[cfg(test)]
mod tests {
  use super::*;

  const ATTR_BUILDINFO: &str = "\
Format: 1.0
Source: attr
Binary: attr libattr1 libattr1-dev
Architecture: amd64
Version: 1:2.4.47-2
Checksums-Md5:
 0a8d8c6bf8a62b4a9d4b2f4a6a1c5b71 60128 attr_2.4.47-2_amd64.deb
Checksums-Sha256:
 9e7f6a0d3bd1b8a1d4d3f2f0c4a0c15b2d9a04f1c8e1f6ab1f0aa1b1c2d3e4f5 21022 attr-dbgsym_2.4.47-2_amd64.deb
 5e1d1bd1a9b1a6bb6c2c1b2e0f8e2f3c4d5e6f708192a3b4c5d6e7f8091a2b3c 60128 attr_2.4.47-2_amd64.deb
 aa1d1bd1a9b1a6bb6c2c1b2e0f8e2f3c4d5e6f708192a3b4c5d6e7f8091a2b3c 61000 attr_2.4.47-2_i386.deb
Build-Origin: Debian
Build-Architecture: amd64
Installed-Build-Depends:
 autoconf (= 2.69-10),
 automake (= 1:1.15-6),
 autopoint (= 0.19.8.1-4),
 autotools-dev (= 20161112.1),
 base-files (= 10),
";

  #[test]
  fn epoch_is_stripped_from_short_version() {
    let info = parse_build_info("x", "Version: 2:1.4-3\n");
    assert_eq!(info.version, "2:1.4-3");
    assert_eq!(info.short_version, "1.4-3");
  }

  #[test]
  fn version_without_epoch() {
    let info = parse_build_info("x", "Version: 1.4-3\n");
    assert_eq!(info.version, "1.4-3");
    assert_eq!(info.short_version, "1.4-3");
  }

  #[test]
  fn version_always_ends_with_short_version() {
    for version in ["1.0", "1:1.0-2", "3:2.1:4-1"] {
      let info = parse_build_info("x", &format!("Version: {}\n", version));
      assert!(info.version.ends_with(&info.short_version), "{}", version);
    }
  }

  #[test]
  fn parses_full_document() {
    let info = parse_build_info("attr", ATTR_BUILDINFO);

    assert_eq!(info.version, "1:2.4.47-2");
    assert_eq!(info.short_version, "2.4.47-2");
    assert_eq!(info.source_package, "attr");
    assert_eq!(info.source_dir, "attr");
    assert_eq!(
      info.expected_hash,
      "5e1d1bd1a9b1a6bb6c2c1b2e0f8e2f3c4d5e6f708192a3b4c5d6e7f8091a2b3c"
    );
    assert_eq!(info.artifact, "attr_2.4.47-2_amd64.deb");
    assert_eq!(info.artifact_size, Some(60128));
    assert_eq!(
      info.dependencies.as_str(),
      "autoconf=2.69-10 automake=1:1.15-6 autopoint=0.19.8.1-4 \\\nautotools-dev=20161112.1 base-files=10"
    );
  }

  #[test]
  fn md5_block_is_not_a_checksum_source() {
    let text = "\
Binary: attr
Version: 2.4.47-2
Checksums-Md5:
 0a8d8c6bf8a62b4a9d4b2f4a6a1c5b71 60128 attr_2.4.47-2_amd64.deb
";
    let info = parse_build_info("attr", text);
    assert!(info.expected_hash.is_empty());
    assert!(info.artifact.is_empty());
  }

  #[test]
  fn only_first_matching_checksum_is_taken() {
    let info = parse_build_info("attr", ATTR_BUILDINFO);
    assert!(info.artifact.ends_with("_amd64.deb"));
  }

  #[test]
  fn binary_uses_queried_name_when_listed_in_middle() {
    let info = parse_build_info("libattr1", "Binary: attr libattr1 libattr1-dev\n");
    assert_eq!(info.source_package, "libattr1");
  }

  #[test]
  fn binary_falls_back_to_first_listed_name() {
    let info = parse_build_info("pam", "Binary: libpam0g libpam-modules\n");
    assert_eq!(info.source_package, "libpam0g");

    // A trailing name has no space after it and does not count as listed.
    let info = parse_build_info("libpam-modules", "Binary: libpam0g libpam-modules\n");
    assert_eq!(info.source_package, "libpam0g");
  }

  #[test]
  fn missing_checksums_leave_hash_empty() {
    let info = parse_build_info("attr", "Source: attr\nBinary: attr x\nVersion: 1.0-1\n");
    assert!(info.expected_hash.is_empty());
    assert_eq!(info.artifact_size, None);
  }

  #[test]
  fn state_transitions() {
    let mut parser = BuildInfoParser::new("attr");
    assert_eq!(parser.state(), ScanState::Header);

    parser.feed("Binary: attr libattr1");
    parser.feed("Version: 1.0-1");
    parser.feed("Checksums-Sha256:");
    assert_eq!(parser.state(), ScanState::ChecksumBlock);

    parser.feed(" abc 10 other_1.0-1_amd64.deb");
    assert_eq!(parser.state(), ScanState::ChecksumBlock);

    parser.feed(" def 20 attr_1.0-1_amd64.deb");
    assert_eq!(parser.state(), ScanState::Header);

    parser.feed("Installed-Build-Depends:");
    assert_eq!(parser.state(), ScanState::Dependencies);

    // Field keywords are plain dependency lines from here on.
    parser.feed("Version: 9.9");
    let info = parser.finish();
    assert_eq!(info.version, "1.0-1");
    assert_eq!(info.expected_hash, "def");
    assert_eq!(info.dependencies.as_str(), "Version: 9.9");
  }

  #[test]
  fn header_fields_are_read_inside_checksum_block() {
    let mut parser = BuildInfoParser::new("attr");

    parser.feed("Checksums-Sha256:");
    assert_eq!(parser.state(), ScanState::ChecksumBlock);

    parser.feed("Binary: attr x");
    parser.feed("Version: 1.0-1");
    assert_eq!(parser.state(), ScanState::ChecksumBlock);

    parser.feed(" h 1 attr_1.0-1_amd64.deb");
    assert_eq!(parser.state(), ScanState::Header);

    let info = parser.finish();
    assert_eq!(info.source_package, "attr");
    assert_eq!(info.version, "1.0-1");
    assert_eq!(info.expected_hash, "h");
    assert_eq!(info.artifact_size, Some(1));
    assert_eq!(info.artifact, "attr_1.0-1_amd64.deb");
  }

  #[test]
  fn depends_header_must_match_exactly() {
    let info = parse_build_info("x", " Installed-Build-Depends:\n foo (= 1),\n");
    assert!(info.dependencies.is_empty());
  }

  #[test]
  fn keyword_without_value_is_ignored() {
    let info = parse_build_info("x", "Version:\nSource:\n");
    assert!(info.version.is_empty());
    assert!(info.source_dir.is_empty());
  }

  #[test]
  fn upstream_version_and_unpacked_dir() {
    let info = parse_build_info("attr", ATTR_BUILDINFO);
    assert_eq!(info.upstream_version(), "2.4.47");
    assert_eq!(info.unpacked_dir(), "attr-2.4.47");

    let native = parse_build_info("x", "Source: base-files\nVersion: 10\n");
    assert_eq!(native.unpacked_dir(), "base-files-10");
  }
}
