use modup_cli::test_utils::{write_jar, write_mod_jar};

use crate::common::TestEnv;

#[tokio::test(flavor = "multi_thread")]
async fn test_sort_groups_archive_by_game_version() {
    let env = TestEnv::new("http://127.0.0.1:1").unwrap();
    let old = env.old_dir();

    write_mod_jar(&old.join("sodium-0.6.0.jar"), "1.21.6").unwrap();
    write_mod_jar(&old.join("lithium-0.15.0.jar"), "1.21.6").unwrap();
    write_mod_jar(&old.join("1.21.6").join("lithium-0.15.0.jar"), "1.21.6").unwrap();
    write_jar(&old.join("appleskin-mc1.21.4-3.0.jar"), None, None).unwrap();
    write_jar(&old.join("mystery.jar"), None, None).unwrap();

    let output = env.run_modup(&["sort"]).await.unwrap();
    output
        .assert_success()
        .assert_stdout_contains("Moved sodium-0.6.0.jar → 1.21.6/")
        .assert_stdout_contains("Moved appleskin-mc1.21.4-3.0.jar → 1.21.4/")
        .assert_stdout_contains("Skipped lithium-0.15.0.jar (already exists in 1.21.6/)")
        .assert_stdout_contains("Could not determine version for mystery.jar (leaving in place)")
        .assert_stdout_contains("  Moved: 2")
        .assert_stdout_contains("  Skipped: 1")
        .assert_stdout_contains("  Failed: 1");

    assert!(old.join("1.21.6").join("sodium-0.6.0.jar").is_file());
    assert!(old.join("1.21.4").join("appleskin-mc1.21.4-3.0.jar").is_file());
    assert!(old.join("lithium-0.15.0.jar").is_file());
    assert!(old.join("mystery.jar").is_file());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sort_without_archive_fails() {
    let env = TestEnv::new("http://127.0.0.1:1").unwrap();

    let output = env.run_modup(&["sort"]).await.unwrap();
    assert!(!output.success);
    output.assert_stderr_contains("does not exist");
}
