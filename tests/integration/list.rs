use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::TestEnv;

async fn serve_modrinth(server: &MockServer, project: &str, version: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/project/{project}/version")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "version_number": version,
            "version_type": "release",
            "files": [{
                "url": format!("https://cdn.example/{project}-{version}.jar"),
                "filename": format!("{project}-{version}.jar"),
            }]
        }])))
        .mount(server)
        .await;
}

fn mixed_config() -> serde_json::Value {
    json!({
        "mods": [
            {
                "id": "AANobbMI",
                "name": "Sodium",
                "slug": "sodium",
                "source": "MODRINTH",
                "latest_version": "mc1.21.8-0.6.13",
                "latest_stability": "release"
            },
            {
                "id": "gNRLbb5W",
                "name": "Lithium",
                "source": "MR",
                "latest_version": "mc1.21.8-0.18.0"
            },
            {
                "id": "carpet",
                "name": "Carpet",
                "source": "GH"
            }
        ]
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_json_report() {
    let server = MockServer::start().await;
    serve_modrinth(&server, "AANobbMI", "mc1.21.8-0.7.0").await;
    serve_modrinth(&server, "gNRLbb5W", "mc1.21.8-0.18.0").await;

    let env = TestEnv::new(&server.uri()).unwrap();
    env.write_mods_config(&mixed_config()).unwrap();
    let before = std::fs::read_to_string(env.mods_config_path()).unwrap();

    let output = env.run_modup(&["list", "--format", "json"]).await.unwrap();
    output.assert_success();
    let report: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();

    assert_eq!(report["summary"]["total"], 3);
    assert_eq!(report["summary"]["upToDate"], 1);
    assert_eq!(report["summary"]["updatesAvailable"], 1);
    assert_eq!(report["summary"]["errors"], 1);

    let mods = report["mods"].as_array().unwrap();
    assert_eq!(mods[0]["latest_version"], "mc1.21.8-0.7.0");
    assert_eq!(mods[0]["update_available"], true);
    assert_eq!(mods[1]["update_available"], false);
    assert_eq!(mods[2]["error"], "No GitHub repo URL available");

    // list never writes the config
    assert_eq!(std::fs::read_to_string(env.mods_config_path()).unwrap(), before);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_table_with_filter() {
    let server = MockServer::start().await;
    serve_modrinth(&server, "AANobbMI", "mc1.21.8-0.7.0").await;
    serve_modrinth(&server, "gNRLbb5W", "mc1.21.8-0.18.0").await;

    let env = TestEnv::new(&server.uri()).unwrap();
    env.write_mods_config(&mixed_config()).unwrap();

    let output = env.run_modup(&["list", "--filter", "MR"]).await.unwrap();
    output
        .assert_success()
        .assert_stdout_contains("Checking 2 mods for Minecraft 1.21.8...")
        .assert_stdout_contains("Mod Version Status Report")
        .assert_stdout_contains("UPDATE AVAILABLE")
        .assert_stdout_contains("  Total mods: 2");
    assert!(!output.stdout.contains("Carpet"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_csv() {
    let server = MockServer::start().await;
    serve_modrinth(&server, "AANobbMI", "mc1.21.8-0.7.0").await;

    let env = TestEnv::new(&server.uri()).unwrap();
    env.write_mods_config(&json!({
        "mods": [{"id": "AANobbMI", "name": "Sodium", "slug": "sodium", "source": "MODRINTH"}]
    }))
    .unwrap();

    let output = env.run_modup(&["list", "--format", "csv"]).await.unwrap();
    output.assert_success();
    let lines: Vec<&str> = output.stdout.lines().collect();
    assert!(lines[0].starts_with("Name,ID,Source,Slug,Current Version"));
    assert!(lines[1].starts_with("\"Sodium\",\"AANobbMI\",\"MODRINTH\",\"sodium\",\"Unknown\""));
    assert!(lines[1].contains("\"mc1.21.8-0.7.0\",\"release\",true,\"\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_no_matching_mods() {
    let server = MockServer::start().await;
    let env = TestEnv::new(&server.uri()).unwrap();
    env.write_mods_config(&mixed_config()).unwrap();

    let output = env.run_modup(&["list", "--filter", "GL"]).await.unwrap();
    output.assert_success().assert_stdout_contains("No mods found matching the specified criteria.");
}
