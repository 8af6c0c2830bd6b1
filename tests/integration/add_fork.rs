use serde_json::json;

use crate::common::TestEnv;

fn env_with_carpet() -> TestEnv {
    let env = TestEnv::new("http://127.0.0.1:1").unwrap();
    env.write_mods_config(&json!({
        "mods": [{
            "id": "carpet",
            "name": "Carpet",
            "slug": "fabric-carpet",
            "source": "GH",
            "fallback_repo": "https://github.com/gnembon/fabric-carpet",
            "modpack_note": "kept as-is"
        }],
        "schema": 2
    }))
    .unwrap();
    env
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_fork_appends_once() {
    let env = env_with_carpet();
    let url = "https://github.com/someone/fabric-carpet";

    let output = env.run_modup(&["add", "fork", url, "carpet"]).await.unwrap();
    output.assert_success().assert_stdout_contains(&format!("Added fork '{url}' to mod 'carpet'."));

    let output = env.run_modup(&["add", "fork", url, "carpet"]).await.unwrap();
    output
        .assert_success()
        .assert_stdout_contains(&format!("Fork '{url}' already present for mod 'carpet'."));

    let config = env.read_mods_config().unwrap();
    assert_eq!(config["mods"][0]["forks"], json!([url]));
    // Unknown keys survive the rewrite
    assert_eq!(config["mods"][0]["modpack_note"], "kept as-is");
    assert_eq!(config["schema"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_fork_infers_mod() {
    let env = env_with_carpet();

    let output = env
        .run_modup(&["add", "fork", "https://github.com/someone/fabric-carpet.git"])
        .await
        .unwrap();
    output.assert_success().assert_stdout_contains("to mod 'carpet'.");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_fork_unknown_mod() {
    let env = env_with_carpet();
    let before = std::fs::read_to_string(env.mods_config_path()).unwrap();

    let output = env
        .run_modup(&["add", "fork", "https://github.com/someone/fabric-carpet", "sodium"])
        .await
        .unwrap();
    assert!(!output.success);
    output.assert_stderr_contains("Mod with id 'sodium' not found.");
    assert_eq!(std::fs::read_to_string(env.mods_config_path()).unwrap(), before);
}
