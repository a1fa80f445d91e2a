use std::{fs, path::PathBuf, process::Command};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("knap-runtime-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn runtime() -> Command {
    Command::new(env!("CARGO_BIN_EXE_knap-runtime"))
}

#[test]
fn test_solve_every_mode() {
    let dir = scratch_dir("solve");
    let source = dir.join("instance.txt");
    fs::write(&source, "5\n4\n2 3\n3 4\n4 5\n5 6\n").unwrap();

    for flags in [
        vec![],
        vec!["--omp", "--threads", "2"],
        vec!["--mpi", "--workers", "3", "--row-block", "1", "--column-chunk", "2"],
        vec!["--mode", "distributed"],
        vec!["--config", r#"{"mode": "shared_memory", "column_chunk": 1}"#],
    ] {
        let destination = dir.join("result.txt");
        let _ = fs::remove_file(&destination);
        let output = runtime()
            .arg("solve")
            .arg(&source)
            .arg(&destination)
            .args(&flags)
            .output()
            .unwrap();
        assert!(output.status.success(), "{:?}: {:?}", flags, output);
        assert!(String::from_utf8_lossy(&output.stdout).starts_with("Task complete. Duration = "));
        assert_eq!(
            fs::read_to_string(&destination).unwrap(),
            "5 7\n2\n2 3\n3 4\n",
            "{:?}",
            flags
        );
    }
}

#[test]
fn test_malformed_instance_writes_nothing() {
    let dir = scratch_dir("malformed");
    let source = dir.join("instance.txt");
    let destination = dir.join("result.txt");
    let _ = fs::remove_file(&destination);
    fs::write(&source, "5\n2\n1 1\nnot a number\n").unwrap();

    let output = runtime()
        .arg("solve")
        .arg(&source)
        .arg(&destination)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("line 4"));
    assert!(!destination.exists());
}

#[test]
fn test_missing_source_is_argument_error() {
    let dir = scratch_dir("missing");
    let output = runtime()
        .arg("solve")
        .arg(dir.join("does-not-exist.txt"))
        .arg(dir.join("result.txt"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_generate_then_solve() {
    let dir = scratch_dir("generate");
    let source = dir.join("random.txt");
    let output = runtime()
        .arg("generate")
        .arg(&source)
        .args(["--num-items", "25", "--max-weight", "60", "--seed", "abc"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);
    let text = fs::read_to_string(&source).unwrap();
    assert_eq!(text.lines().count(), 27);
    assert!(text.starts_with("60\n25\n"));

    let mut results = Vec::new();
    for mode in ["sequential", "shared_memory", "distributed"] {
        let destination = dir.join(format!("{}.txt", mode));
        let output = runtime()
            .arg("solve")
            .arg(&source)
            .arg(&destination)
            .args(["--mode", mode])
            .output()
            .unwrap();
        assert!(output.status.success(), "{}: {:?}", mode, output);
        results.push(fs::read_to_string(&destination).unwrap());
    }
    assert_eq!(results[0], results[1]);
    assert_eq!(results[0], results[2]);
}

#[test]
fn test_result_replaces_destination_in_one_step() {
    let dir = scratch_dir("replace");
    let source = dir.join("instance.txt");
    let destination = dir.join("result.txt");
    let partial = dir.join("result.txt.partial");
    fs::write(&source, "5\n4\n2 3\n3 4\n4 5\n5 6\n").unwrap();
    fs::write(&destination, "stale contents that are longer than the result\n").unwrap();

    let output = runtime()
        .arg("solve")
        .arg(&source)
        .arg(&destination)
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?}", output);
    assert_eq!(fs::read_to_string(&destination).unwrap(), "5 7\n2\n2 3\n3 4\n");
    assert!(!partial.exists());

    // A directory cannot be replaced by the result file.
    let blocked = dir.join("blocked");
    fs::create_dir_all(&blocked).unwrap();
    let output = runtime()
        .arg("solve")
        .arg(&source)
        .arg(&blocked)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3), "{:?}", output);
    assert!(blocked.is_dir());
    assert!(!dir.join("blocked.partial").exists());
}
