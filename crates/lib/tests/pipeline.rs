//! End-to-end pipeline tests: real HTTP fetching against a mock server, a
//! scripted container engine, and the CSV report on disk.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use mockito::{Matcher, Mock, Server, ServerGuard};
use tempfile::TempDir;

use debrepro_lib::config::Config;
use debrepro_lib::consts::RECIPE_FILENAME;
use debrepro_lib::execute::{BuildExecutor, ContainerEngine, ExecuteError, ProcessCpuClock};
use debrepro_lib::fetch::HttpSource;
use debrepro_lib::outcome::Outcome;
use debrepro_lib::verify::Verifier;

/// Engine that answers a fixed digest per image tag and keeps the recipes it saw.
#[derive(Default)]
struct ScriptedEngine {
  digests: HashMap<String, String>,
  recipes: Mutex<HashMap<String, String>>,
}

impl ScriptedEngine {
  fn with_digest(mut self, tag: &str, digest: &str) -> Self {
    self.digests.insert(tag.to_string(), digest.to_string());
    self
  }

  fn recipe(&self, tag: &str) -> Option<String> {
    self.recipes.lock().unwrap().get(tag).cloned()
  }
}

impl ContainerEngine for ScriptedEngine {
  async fn build_image(&self, context: &Path, tag: &str, log: &Path) -> Result<(), ExecuteError> {
    let recipe = std::fs::read_to_string(context.join(RECIPE_FILENAME))?;
    std::fs::write(log, "Successfully built\n")?;
    self.recipes.lock().unwrap().insert(tag.to_string(), recipe);
    Ok(())
  }

  async fn hash_artifact(&self, tag: &str, artifact: &str) -> Result<String, ExecuteError> {
    match self.digests.get(tag) {
      Some(digest) => Ok(format!("{}  {}\n", digest, artifact)),
      None => Err(ExecuteError::CmdFailed {
        cmd: format!("run {}", tag),
        code: Some(1),
      }),
    }
  }
}

fn report_page(package: &str, built: &str) -> String {
  format!(
    r#"<!DOCTYPE html><html><body><header>
      <h2>{package}</h2>
      <span class="build-time">built {built} in 3m 12s</span>
      <a href="/debian/buildinfo/{package}.buildinfo" title="Show: build info">buildinfo</a>
    </header><main>details</main></body></html>"#
  )
}

fn build_info(package: &str, version: &str, hash: &str) -> String {
  format!(
    "Format: 1.0\nSource: {package}\nBinary: {package} lib{package}1\nArchitecture: amd64\nVersion: {version}\n\
     Checksums-Sha256:\n {hash} 4242 {package}_{version}_amd64.deb\n\
     Installed-Build-Depends:\n autoconf (= 2.69-10),\n debhelper (>= 10),\n gettext (= 0.19.8.1-4)\n"
  )
}

const LISTING: &str = r#"<html><body><h1>November 2017</h1><p>
  <a href="20171101T035012Z/">2017-11-01 03:50:12</a><br />
  <a href="20171101T155011Z/">2017-11-01 15:50:11</a><br />
  <a href="20171102T034947Z/">2017-11-02 03:49:47</a><br />
  <a href="20171102T155006Z/">2017-11-02 15:50:06</a><br />
</p></body></html>"#;

/// Mock server with every page the tests need; keep the mocks alive with it.
struct Archive {
  server: ServerGuard,
  _mocks: Vec<Mock>,
}

async fn serve(server: &mut ServerGuard, path: &str, body: String) -> Mock {
  server.mock("GET", path).with_body(body).create_async().await
}

async fn archive_server() -> Archive {
  let mut server = Server::new_async().await;
  let mut mocks = Vec::new();

  mocks.push(serve(&mut server, "/rb-pkg/attr.html", report_page("attr", "2017-11-02 12:34")).await);
  mocks.push(
    serve(
      &mut server,
      "/debian/buildinfo/attr.buildinfo",
      build_info("attr", "2.4.47-2", "5e1d"),
    )
    .await,
  );
  mocks.push(serve(&mut server, "/rb-pkg/zlib.html", report_page("zlib", "2017-11-01 20:00")).await);
  mocks.push(
    serve(
      &mut server,
      "/debian/buildinfo/zlib.buildinfo",
      build_info("zlib", "1.2.8.dfsg-5", "aa01"),
    )
    .await,
  );
  mocks.push(
    server
      .mock("GET", "/rb-pkg/ghost.html")
      .with_status(404)
      .create_async()
      .await,
  );
  mocks.push(
    server
      .mock("GET", "/archive/debian/")
      .match_query(Matcher::Any)
      .with_body(LISTING)
      .create_async()
      .await,
  );

  Archive { server, _mocks: mocks }
}

fn config(server: &ServerGuard, temp: &TempDir) -> Config {
  Config {
    report_base_url: format!("{}/rb-pkg/", server.url()),
    report_site_url: server.url(),
    snapshot_base_url: format!("{}/archive/debian/", server.url()),
    work_dir: temp.path().join("work"),
    log_dir: temp.path().join("logs"),
    output: temp.path().join("reprotest.csv"),
    ..Config::default()
  }
}

#[tokio::test]
async fn run_classifies_every_package_and_writes_report() {
  let archive = archive_server().await;
  let server = &archive.server;
  let temp = TempDir::new().unwrap();
  let config = config(server, &temp);

  let engine = ScriptedEngine::default()
    .with_digest("reprod:attr", "5e1d")
    .with_digest("reprod:zlib", "ffff");
  let executor = BuildExecutor::new(engine, ProcessCpuClock, &config);
  let verifier = Verifier::new(HttpSource::new().unwrap(), executor, &config);

  let packages: Vec<String> = ["ghost", "zlib", "attr"].iter().map(|p| p.to_string()).collect();
  let results = verifier.run(&packages).await;

  assert_eq!(results.len(), 3);
  assert_eq!(results.matched()[0].package, "attr");
  assert_eq!(results.differ()[0].package, "zlib");
  assert_eq!(results.failed()[0].package, "ghost");
  assert_eq!(results.matched()[0].binary, "attr_2.4.47-2_amd64.deb");
  assert_eq!(results.matched()[0].size, Some(4242));
  assert!(results.differ()[0].wall_time >= 0.0);

  results.save(&config.output).unwrap();
  let csv = std::fs::read_to_string(&config.output).unwrap();
  let outcomes: Vec<&str> = csv.lines().skip(1).filter_map(|line| line.rsplit(',').next()).collect();
  assert_eq!(outcomes, vec!["y", "n", "f"]);

  assert!(temp.path().join("logs").join("attr.log").is_file());
}

#[tokio::test]
async fn recipe_pins_snapshots_preceding_the_build() {
  let archive = archive_server().await;
  let server = &archive.server;
  let temp = TempDir::new().unwrap();
  let config = config(server, &temp);

  let engine = ScriptedEngine::default().with_digest("reprod:attr", "5e1d");
  let executor = BuildExecutor::new(engine, ProcessCpuClock, &config);
  let verifier = Verifier::new(HttpSource::new().unwrap(), executor, &config);

  let record = verifier.verify_package("attr").await;
  assert_eq!(record.outcome, Outcome::Match);

  let recipe = verifier.executor().engine().recipe("reprod:attr").unwrap();
  let pinned = format!("{}/archive/debian/20171102T034947Z/ stretch main", server.url());
  let earlier = format!("{}/archive/debian/20171101T155011Z/ sid main", server.url());
  let too_late = "20171102T155006Z";
  assert!(recipe.contains(&pinned));
  assert!(recipe.contains(&earlier));
  assert!(!recipe.contains(too_late));
  assert!(recipe.contains("autoconf=2.69-10 debhelper gettext=0.19.8.1-4"));
  assert!(recipe.contains("apt-get source attr=2.4.47-2"));
  assert!(recipe.contains("WORKDIR /project/attr-2.4.47/"));
}

#[tokio::test]
async fn build_failure_keeps_report_row() {
  let archive = archive_server().await;
  let server = &archive.server;
  let temp = TempDir::new().unwrap();
  let config = config(server, &temp);

  let executor = BuildExecutor::new(ScriptedEngine::default(), ProcessCpuClock, &config);
  let verifier = Verifier::new(HttpSource::new().unwrap(), executor, &config);

  let results = verifier.run(&["attr".to_string()]).await;

  assert_eq!(results.failed().len(), 1);
  let record = &results.failed()[0];
  assert_eq!(record.binary, "attr_2.4.47-2_amd64.deb");
  assert_eq!(record.wall_time, -1.0);
}
