use modup_cli::test_utils::{mod_jar_bytes, write_mod_jar};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::TestEnv;

/// Serve a GitHub "latest release" for `repo` whose jar targets `jar_minecraft`.
async fn serve_github_release(
    server: &MockServer,
    repo: &str,
    tag: &str,
    file_name: &str,
    jar_minecraft: &str,
) {
    let body = json!({
        "tag_name": tag,
        "prerelease": false,
        "assets": [{
            "name": file_name,
            "browser_download_url": format!("{}/download/{file_name}", server.uri()),
        }]
    });
    Mock::given(method("GET"))
        .and(path(format!("/repos/{repo}/releases/latest")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/download/{file_name}")))
        .respond_with(
            ResponseTemplate::new(200).set_body_bytes(mod_jar_bytes(jar_minecraft).unwrap()),
        )
        .mount(server)
        .await;
}

fn carpet_config() -> serde_json::Value {
    json!({
        "mods": [{
            "id": "carpet",
            "name": "Carpet",
            "source": "GH",
            "fallback_repo": "https://github.com/gnembon/fabric-carpet",
            "latest_version": "1.4.140"
        }]
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_downloads_verifies_and_commits() {
    let server = MockServer::start().await;
    serve_github_release(&server, "gnembon/fabric-carpet", "1.4.147", "carpet-1.4.147.jar", "1.21.8")
        .await;

    let env = TestEnv::new(&server.uri()).unwrap();
    env.write_mods_config(&carpet_config()).unwrap();
    write_mod_jar(&env.installed("carpet-1.4.140.jar"), "1.21.6").unwrap();

    let output = env.run_modup(&["update"]).await.unwrap();
    output
        .assert_success()
        .assert_stdout_contains("Processing carpet (Carpet) ...")
        .assert_stdout_contains("Downloaded [GITHUB] carpet-1.4.147.jar")
        .assert_stdout_contains("Config updated. See mods_config.json for results.");

    assert!(env.installed("carpet-1.4.147.jar").is_file());
    assert!(!env.installed("carpet-1.4.140.jar").exists());
    assert!(env.archived("carpet-1.4.140.jar").is_file());

    let config = env.read_mods_config().unwrap();
    assert_eq!(config["mods"][0]["latest_version"], "1.4.147");
    assert_eq!(config["mods"][0]["latest_stability"], "release");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_repeated_update_keeps_current_mod_installed() {
    let server = MockServer::start().await;
    serve_github_release(&server, "gnembon/fabric-carpet", "1.4.147", "carpet-1.4.147.jar", "1.21.8")
        .await;

    let env = TestEnv::new(&server.uri()).unwrap();
    env.write_mods_config(&carpet_config()).unwrap();

    for _ in 0..2 {
        let output = env.run_modup(&["update"]).await.unwrap();
        output.assert_success().assert_stdout_contains("Downloaded [GITHUB] carpet-1.4.147.jar");
        assert!(env.installed("carpet-1.4.147.jar").is_file());
    }

    let config = env.read_mods_config().unwrap();
    assert_eq!(config["mods"][0]["latest_version"], "1.4.147");
    assert_eq!(config["mods"][0]["source"], "GH");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_rejects_jar_for_other_game_version() {
    let server = MockServer::start().await;
    serve_github_release(&server, "gnembon/fabric-carpet", "1.4.147", "carpet-1.4.147.jar", "1.20.1")
        .await;

    let env = TestEnv::new(&server.uri()).unwrap();
    env.write_mods_config(&carpet_config()).unwrap();

    let output = env.run_modup(&["update"]).await.unwrap();
    output.assert_success().assert_stdout_contains(
        "Skipping config update: downloaded mod version (1.20.1) does not match expected (1.21.8)",
    );

    assert!(!env.installed("carpet-1.4.147.jar").exists());
    assert!(env.archived("carpet-1.4.147.jar").is_file());
    let config = env.read_mods_config().unwrap();
    assert_eq!(config["mods"][0]["latest_version"], "1.4.140");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_dry_run_changes_nothing() {
    let server = MockServer::start().await;
    serve_github_release(&server, "gnembon/fabric-carpet", "1.4.147", "carpet-1.4.147.jar", "1.21.8")
        .await;

    let env = TestEnv::new(&server.uri()).unwrap();
    env.write_mods_config(&carpet_config()).unwrap();
    write_mod_jar(&env.installed("carpet-1.4.140.jar"), "1.21.6").unwrap();
    let before = std::fs::read_to_string(env.mods_config_path()).unwrap();

    let output = env.run_modup(&["update", "--dry-run"]).await.unwrap();
    output
        .assert_success()
        .assert_stdout_contains("[Dry-run] Would archive old mod file: carpet-1.4.140.jar")
        .assert_stdout_contains("Would download [GITHUB] carpet-1.4.147.jar")
        .assert_stdout_contains("Dry run: config not updated.");

    assert!(env.installed("carpet-1.4.140.jar").is_file());
    assert!(!env.installed("carpet-1.4.147.jar").exists());
    assert!(!env.old_dir().exists());
    assert_eq!(std::fs::read_to_string(env.mods_config_path()).unwrap(), before);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fork_is_preferred_over_primary() {
    let server = MockServer::start().await;
    serve_github_release(&server, "someone/fabric-carpet", "1.4.150-fork", "carpet-1.4.150-fork.jar", "1.21.8")
        .await;
    // The primary repository must never be consulted
    Mock::given(method("GET"))
        .and(path("/repos/gnembon/fabric-carpet/releases/latest"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let env = TestEnv::new(&server.uri()).unwrap();
    let mut config = carpet_config();
    config["mods"][0]["forks"] = json!(["https://github.com/someone/fabric-carpet"]);
    env.write_mods_config(&config).unwrap();

    let output = env.run_modup(&["update"]).await.unwrap();
    output.assert_success().assert_stdout_contains("Downloaded [FORK] carpet-1.4.150-fork.jar");

    let config = env.read_mods_config().unwrap();
    assert_eq!(config["mods"][0]["latest_version"], "1.4.150-fork");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_nothing_to_update_and_unsupported_source() {
    let server = MockServer::start().await;

    let env = TestEnv::new(&server.uri()).unwrap();
    env.write_mods_config(&json!({
        "mods": [
            {
                "id": "carpet",
                "name": "Carpet",
                "source": "GH",
                "fallback_repo": "https://github.com/gnembon/fabric-carpet"
            },
            {"id": "jei", "name": "JEI", "source": "CURSEFORGE"}
        ]
    }))
    .unwrap();

    let output = env.run_modup(&["update"]).await.unwrap();
    output
        .assert_success()
        .assert_stdout_contains("No update found for carpet [mod MC version: Unknown].")
        .assert_stdout_contains("Unsupported source: CURSEFORGE")
        .assert_stdout_contains("Nothing found to update.");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_single_mod_update_leaves_other_files() {
    let server = MockServer::start().await;
    serve_github_release(&server, "gnembon/fabric-carpet", "1.4.147", "carpet-1.4.147.jar", "1.21.8")
        .await;

    let env = TestEnv::new(&server.uri()).unwrap();
    let mut config = carpet_config();
    config["mods"]
        .as_array_mut()
        .unwrap()
        .push(json!({"id": "AANobbMI", "name": "Sodium", "source": "MODRINTH"}));
    env.write_mods_config(&config).unwrap();
    write_mod_jar(&env.installed("AANobbMI-0.6.13.jar"), "1.21.8").unwrap();

    let output = env.run_modup(&["update", "--mod", "carpet"]).await.unwrap();
    output
        .assert_success()
        .assert_stdout_contains("Downloading and updated config for 'Carpet'.");

    assert!(env.installed("carpet-1.4.147.jar").is_file());
    assert!(env.installed("AANobbMI-0.6.13.jar").is_file());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unknown_mod_fails() {
    let server = MockServer::start().await;
    let env = TestEnv::new(&server.uri()).unwrap();
    env.write_mods_config(&carpet_config()).unwrap();

    let output = env.run_modup(&["update", "--mod", "missing"]).await.unwrap();
    assert!(!output.success);
    assert_eq!(output.code, Some(1));
    output.assert_stderr_contains("Mod 'missing' not found in config");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_mods_config_fails() {
    let server = MockServer::start().await;
    let env = TestEnv::new(&server.uri()).unwrap();

    let output = env.run_modup(&["update"]).await.unwrap();
    assert!(!output.success);
    output.assert_stderr_contains("Config file not found");
}
