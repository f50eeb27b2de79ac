use std::fs;
use std::process::Command;

const HELLO_MD5: &str = "b1946ac92492d2347c6235b4d2611184";
const HELLO_SHA256: &str = "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03";
const WORLD_SHA256: &str = "e258d248fda94c63753607f7c4494ee0fcbe92f1a76bfdac795c9d84101eb317";

fn hashsum_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_hashsum"))
}

fn setup() -> (tempfile::TempDir, String, String) {
    let dir = tempfile::tempdir().unwrap();
    let hello = dir.path().join("hello.txt");
    let world = dir.path().join("world.txt");
    fs::write(&hello, "hello\n").unwrap();
    fs::write(&world, "world\n").unwrap();
    let hello = hello.to_str().unwrap().to_string();
    let world = world.to_str().unwrap().to_string();
    (dir, hello, world)
}

#[test]
fn test_no_files_prints_usage_hint() {
    let output = hashsum_cmd().output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No file(s) specified."), "got: {}", stdout);
    assert!(stdout.contains("-h to get usage information"));
}

#[test]
fn test_default_sha256_listing() {
    let (_dir, hello, world) = setup();
    let output = hashsum_cmd().args([&world, &hello]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!("{}  {}\n{}  {}\n", HELLO_SHA256, hello, WORLD_SHA256, world)
    );
}

#[test]
fn test_md5_selected() {
    let (_dir, hello, _) = setup();
    let output = hashsum_cmd().args(["-a", "md5", hello.as_str()]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!("{}  {}\n", HELLO_MD5, hello)
    );
}

#[test]
fn test_unknown_algorithm() {
    let (_dir, hello, _) = setup();
    let output = hashsum_cmd().args(["-a", "crc32", hello.as_str()]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown hash algorithm 'crc32'"), "got: {}", stderr);
}

#[test]
fn test_directory_skipped() {
    let (dir, hello, _) = setup();
    let sub = dir.path().to_str().unwrap().to_string();
    let output = hashsum_cmd().args([&sub, &hello]).output().unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is a directory (not hashable)"), "got: {}", stderr);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!("{}  {}\n", HELLO_SHA256, hello)
    );
}

#[test]
fn test_missing_file_aborts_by_default() {
    let (dir, hello, _) = setup();
    let missing = dir.path().join("missing").to_str().unwrap().to_string();
    let output = hashsum_cmd().args([&missing, &hello]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No such file or directory"), "got: {}", stderr);
    assert!(!stderr.contains("os error"));
}

#[test]
fn test_keep_going_hashes_the_rest() {
    let (dir, hello, _) = setup();
    let missing = dir.path().join("missing").to_str().unwrap().to_string();
    let output = hashsum_cmd()
        .args(["-k", missing.as_str(), hello.as_str()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!("{}  {}\n", HELLO_SHA256, hello)
    );
}

#[test]
fn test_reference_match() {
    let (_dir, hello, _) = setup();
    let output = hashsum_cmd()
        .args(["-a", "md5", "-r", HELLO_MD5, hello.as_str()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!("{}  ok\n", hello)
    );
}

#[test]
fn test_reference_mismatch() {
    let (_dir, hello, _) = setup();
    let output = hashsum_cmd()
        .args(["-r", "deadbeef", hello.as_str()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with(&format!("{}  mismatching hashes\n", hello)));
    assert!(stdout.contains("deadbeef  (expected)"));
    assert!(stdout.contains(&format!("{}  (computed)", HELLO_SHA256)));
}

#[test]
fn test_reference_uses_first_file() {
    let (_dir, hello, world) = setup();
    let output = hashsum_cmd()
        .args(["-r", HELLO_SHA256, hello.as_str(), world.as_str()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Multiple files provided. Selecting first file"));
    assert!(stdout.contains(&format!("{}  ok", hello)));
}

#[test]
fn test_output_file_written() {
    let (dir, hello, world) = setup();
    let outfile = dir.path().join("sums.txt");
    fs::write(&outfile, "old\n").unwrap();
    let output = hashsum_cmd()
        .args(["-o", outfile.to_str().unwrap(), hello.as_str(), world.as_str()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Write 2 filehashes to"), "got: {}", stdout);
    assert_eq!(
        fs::read_to_string(&outfile).unwrap(),
        format!("{}  {}\n{}  {}\n", HELLO_SHA256, hello, WORLD_SHA256, world)
    );
}

#[test]
fn test_output_write_failure_reported() {
    let (dir, hello, _) = setup();
    let outfile = dir.path().join("no_such_dir").join("sums.txt");
    let output = hashsum_cmd()
        .args(["-o", outfile.to_str().unwrap(), hello.as_str()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Write 1 filehash to"), "got: {}", stdout);
    assert!(!output.stderr.is_empty());
}

#[test]
fn test_empty_reference_lists_normally() {
    let (_dir, hello, _) = setup();
    let output = hashsum_cmd()
        .args(["-r", "", hello.as_str()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        format!("{}  {}\n", HELLO_SHA256, hello)
    );
}

#[test]
fn test_reference_against_directory_fails() {
    let (dir, _, _) = setup();
    let sub = dir.path().to_str().unwrap();
    let output = hashsum_cmd()
        .args(["-r", HELLO_SHA256, sub])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is a directory (not hashable)"), "got: {}", stderr);
}

#[cfg(target_os = "linux")]
fn dev_full() -> fs::File {
    fs::OpenOptions::new().write(true).open("/dev/full").unwrap()
}

#[cfg(target_os = "linux")]
#[test]
fn test_stdout_write_failure_is_reported() {
    let (_dir, hello, _) = setup();
    let output = hashsum_cmd()
        .arg(&hello)
        .stdout(dev_full())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("write error: No space left on device"), "got: {}", stderr);
}

#[cfg(target_os = "linux")]
#[test]
fn test_stdout_write_failure_still_writes_output_file() {
    let (dir, hello, _) = setup();
    let outfile = dir.path().join("sums.txt");
    let output = hashsum_cmd()
        .args(["-o", outfile.to_str().unwrap(), hello.as_str()])
        .stdout(dev_full())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("write error"));
    assert_eq!(
        fs::read_to_string(&outfile).unwrap(),
        format!("{}  {}\n", HELLO_SHA256, hello)
    );
}

#[cfg(target_os = "linux")]
#[test]
fn test_compare_stdout_write_failure_is_reported() {
    let (_dir, hello, _) = setup();
    let output = hashsum_cmd()
        .args(["-r", HELLO_SHA256, hello.as_str()])
        .stdout(dev_full())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("write error"));
}

#[cfg(unix)]
#[test]
fn test_non_utf8_path_rejected() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let output = hashsum_cmd()
        .arg(OsStr::from_bytes(b"bad\xffname"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(!output.stderr.is_empty());
}
