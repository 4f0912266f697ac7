//! Integration test: drive the `pharo-context` binary end to end.
//!
//! Each test writes a recipe into a temporary directory, runs the built
//! binary against it and inspects the exit status, stderr and the
//! produced tar.gz context.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const RECIPE: &str = r#"
configuration:
  image: pharo/image:61
  commands:
    - "st --save --quit config.st"
  write_files:
    - name: config.st
      content-type: plain/text
      content: |
        ConfigurationOfZincHTTPComponents project latestVersion load: 'WebSocket'.

runtime:
  vm: pharo/vm:61
  command: --no-quit
  write_files:
    - name: startup.st
      content-type: plain/text
      content: |
        ZnServer startDefaultOn: 8080.
"#;

const DOCKERFILE: &str = "\
FROM pharo/image:61 AS configuration
COPY conf/ /var/pharo/images/default/
RUN /usr/local/bin/pharo /var/pharo/images/default/Pharo.image st --save --quit config.st
FROM pharo/vm:61
COPY --from=configuration /var/pharo/images/default/Pharo.{image,changes} /var/pharo/images/default/
COPY run/ /var/pharo/images/default/
CMD /usr/local/bin/pharo /var/pharo/images/default/Pharo.image --no-quit
";

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pharo-context"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run pharo-context")
}

/// Read back (name, content) for every entry of a tar.gz context.
fn read_context(path: &Path) -> Vec<(String, String)> {
    let file = fs::File::open(path).unwrap();
    let decoder = flate2::read::GzDecoder::new(file);
    let mut archive = tar::Archive::new(decoder);
    let entries: Vec<(String, String)> = archive
        .entries()
        .unwrap()
        .map(|e| {
            let mut entry = e.unwrap();
            let name = entry.path().unwrap().to_string_lossy().to_string();
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            (name, content)
        })
        .collect();
    entries
}

#[test]
fn test_generates_pharo_context() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("recipe.yaml");
    let output = tmp.path().join("context.tar.gz");
    fs::write(&input, RECIPE).unwrap();

    let out = run(&[
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ]);
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );

    let entries = read_context(&output);
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["conf/config.st", "run/startup.st", "Dockerfile"]);

    assert_eq!(
        entries[0].1,
        "ConfigurationOfZincHTTPComponents project latestVersion load: 'WebSocket'.\n"
    );
    assert_eq!(entries[1].1, "ZnServer startDefaultOn: 8080.\n");
    assert_eq!(entries[2].1, DOCKERFILE);
}

#[test]
fn test_short_flags() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("recipe.yaml");
    let output = tmp.path().join("context.tar.gz");
    fs::write(&input, RECIPE).unwrap();

    let out = run(&["-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    assert!(out.status.success());
    assert!(output.exists());
}

#[test]
fn test_repeated_runs_produce_same_dockerfile() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("recipe.yaml");
    let first = tmp.path().join("first.tar.gz");
    let second = tmp.path().join("second.tar.gz");
    fs::write(&input, RECIPE).unwrap();

    for output in [&first, &second] {
        let out = run(&["-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
        assert!(out.status.success());
    }

    assert_eq!(read_context(&first), read_context(&second));
}

#[test]
fn test_missing_input_fails_without_output() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("context.tar.gz");

    let out = run(&["--output", output.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("input file is empty"));
    assert!(!output.exists());
}

#[test]
fn test_missing_output_fails() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("recipe.yaml");
    fs::write(&input, RECIPE).unwrap();

    let out = run(&["--input", input.to_str().unwrap()]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("output file is empty"));
}

#[test]
fn test_unreadable_input_fails() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("missing.yaml");
    let output = tmp.path().join("context.tar.gz");

    let out = run(&[
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to read recipe"));
    assert!(!output.exists());
}

#[test]
fn test_invalid_recipe_fails() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("recipe.yaml");
    let output = tmp.path().join("context.tar.gz");
    fs::write(&input, "runtime:\n  write_files: \"nope\"\n").unwrap();

    let out = run(&[
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid recipe"));
    assert!(!output.exists());
}

#[test]
fn test_uncreatable_output_fails() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("recipe.yaml");
    let output = tmp.path().join("missing-dir").join("context.tar.gz");
    fs::write(&input, RECIPE).unwrap();

    let out = run(&[
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
    ]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to write"));
    assert!(!output.exists());
}
