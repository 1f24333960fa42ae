//! Integration tests for the job-board-register binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Binary with a clean environment apart from `PATH`.
fn register_cmd() -> Command {
    let mut cmd = Command::new(cargo_bin("job-board-register"));
    cmd.env_clear();
    if let Some(path) = std::env::var_os("PATH") {
        cmd.env("PATH", path);
    }
    cmd
}

/// Pack `temp/meta` into `temp/meta.tar.bz2`, removing the source directory.
///
/// Returns `None` when `tar` or `bzip2` is unavailable.
fn pack_metadata(temp: &Path, files: &[(&str, &str)]) -> Option<PathBuf> {
    let workdir = temp.join("meta");
    for (name, contents) in files {
        let path = workdir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    let tarball = temp.join("meta.tar.bz2");
    let status = std::process::Command::new("tar")
        .arg("-C")
        .arg(temp)
        .arg("-cjf")
        .arg(&tarball)
        .arg("meta")
        .status()
        .ok()?;
    if !status.success() {
        return None;
    }
    fs::remove_dir_all(&workdir).unwrap();
    Some(tarball)
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("job-board-register"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Register a machine image"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("job-board-register"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_without_tarball_fails() -> Result<(), Box<dyn std::error::Error>> {
    register_cmd()
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing image metadata tarball"))
        .stderr(predicate::str::contains("level=error"));
    Ok(())
}

#[test]
fn cli_without_images_url_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let tarball = temp.path().join("meta.tar.bz2");
    fs::write(&tarball, "")?;

    register_cmd()
        .arg(&tarball)
        .env("IMAGE_NAME", "travis-ci-garnet-trusty")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing $JOB_BOARD_IMAGES_URL"));
    Ok(())
}

#[test]
fn cli_without_image_name_makes_no_request() -> Result<(), Box<dyn std::error::Error>> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/images");
        then.status(200).body("{}");
    });
    let temp = TempDir::new()?;
    let tarball = temp.path().join("meta.tar.bz2");
    fs::write(&tarball, "")?;

    register_cmd()
        .arg(&tarball)
        .env("JOB_BOARD_IMAGES_URL", server.url("/images"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("missing $IMAGE_NAME"));

    mock.assert_hits(0);
    Ok(())
}

#[test]
fn cli_reads_required_variables_from_job_board_env() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let pre = temp.path().join("job-board-env");
    fs::create_dir(&pre)?;
    fs::write(pre.join("JOB_BOARD_IMAGES_URL"), "http://127.0.0.1:9/images\n")?;
    fs::write(pre.join("IMAGE_NAME"), "from-envdir\n")?;

    // Both variables resolve, so the run reaches the existence check.
    register_cmd()
        .arg(temp.path().join("absent.tar.bz2"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("loading IMAGE_NAME=from-envdir"))
        .stderr(predicate::str::contains(
            "image metadata tarball does not exist",
        ));
    Ok(())
}

#[test]
fn cli_rejects_corrupt_tarball() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let tarball = temp.path().join("meta.tar.bz2");
    fs::write(&tarball, "not an archive")?;

    register_cmd()
        .arg(&tarball)
        .env("JOB_BOARD_IMAGES_URL", "http://127.0.0.1:9/images")
        .env("IMAGE_NAME", "travis-ci-garnet-trusty")
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "failed to extract image metadata tarball",
        ));
    Ok(())
}

#[test]
fn cli_registers_image() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let Some(tarball) = pack_metadata(
        temp.path(),
        &[
            ("env/PACKER_BUILDER_TYPE", "docker\n"),
            ("env/FOO", "bar\n"),
        ],
    ) else {
        return Ok(());
    };

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/images")
            .query_param("infra", "docker")
            .query_param("name", "travis-ci-garnet-trusty");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":[{"id":7,"name":"travis-ci-garnet-trusty"}]}"#);
    });

    register_cmd()
        .arg(&tarball)
        .env("JOB_BOARD_IMAGES_URL", server.url("/images"))
        .env("IMAGE_NAME", "travis-ci-garnet-trusty")
        .env("OS", "linux")
        .env("DIST", "trusty")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\": 7"))
        .stdout(predicate::str::contains("time=").not())
        .stderr(predicate::str::contains("loading FOO=bar"))
        .stderr(predicate::str::contains("PACKER_BUILDER_TYPE=docker"));

    mock.assert();
    Ok(())
}

#[test]
fn cli_fails_on_server_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let Some(tarball) = pack_metadata(temp.path(), &[("env/OS", "linux")]) else {
        return Ok(());
    };

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/images");
        then.status(503);
    });

    register_cmd()
        .arg(&tarball)
        .env("JOB_BOARD_IMAGES_URL", server.url("/images"))
        .env("IMAGE_NAME", "travis-ci-garnet-trusty")
        .env("DIST", "trusty")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("registration failed"));
    Ok(())
}

#[test]
fn cli_debug_logs_stages() -> Result<(), Box<dyn std::error::Error>> {
    register_cmd()
        .arg("--debug")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("stage validate-inputs"));
    Ok(())
}

#[test]
fn cli_logs_script_variables_and_missing_env_dirs() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let Some(tarball) = pack_metadata(
        temp.path(),
        &[(
            "job-board-register",
            "export PACKER_BUILD_NAME=from-script\n",
        )],
    ) else {
        return Ok(());
    };

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/images");
        then.status(200).body(r#"{"data":[]}"#);
    });

    register_cmd()
        .arg(&tarball)
        .env("JOB_BOARD_IMAGES_URL", server.url("/images"))
        .env("IMAGE_NAME", "travis-ci-garnet-trusty")
        .env("DIST", "trusty")
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "level=info msg=\"setting PACKER_BUILD_NAME=from-script\"",
        ))
        .stderr(predicate::str::contains("level=warn"))
        .stderr(predicate::str::contains("job-board-env does not exist"))
        .stderr(predicate::str::contains("env does not exist\""));

    mock.assert();
    Ok(())
}

/// Write an executable curl stand-in that records its arguments next to
/// itself and prints a fixed JSON body.
#[cfg(unix)]
fn write_curl_stub(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    fs::write(
        path,
        "#!/bin/sh\necho \"$@\" > \"$0.args\"\necho '{\"via\":\"curl\"}'\n",
    )
    .unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn cli_registers_through_curl_exe() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let Some(tarball) = pack_metadata(temp.path(), &[("env/DIST", "trusty")]) else {
        return Ok(());
    };
    let stub = temp.path().join("fake-curl");
    write_curl_stub(&stub);

    register_cmd()
        .arg(&tarball)
        .env("JOB_BOARD_IMAGES_URL", "http://job-board.example.com/images")
        .env("IMAGE_NAME", "travis-ci-garnet-trusty")
        .env("CURL_EXE", &stub)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"via\": \"curl\""));

    let args = fs::read_to_string(temp.path().join("fake-curl.args"))?;
    assert!(args.starts_with(
        "-f -s -X POST http://job-board.example.com/images?infra=local&name=travis-ci-garnet-trusty&tags="
    ));
    Ok(())
}

#[cfg(unix)]
#[test]
fn cli_empty_curl_exe_runs_curl_from_path() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let Some(tarball) = pack_metadata(temp.path(), &[("env/DIST", "trusty")]) else {
        return Ok(());
    };
    let bin = temp.path().join("bin");
    fs::create_dir(&bin)?;
    write_curl_stub(&bin.join("curl"));

    let mut path = std::ffi::OsString::from(&bin);
    if let Some(existing) = std::env::var_os("PATH") {
        path.push(":");
        path.push(existing);
    }

    register_cmd()
        .arg(&tarball)
        .env("PATH", path)
        .env("JOB_BOARD_IMAGES_URL", "http://job-board.example.com/images")
        .env("IMAGE_NAME", "travis-ci-garnet-trusty")
        .env("CURL_EXE", "")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"via\": \"curl\""));

    assert!(bin.join("curl.args").is_file());
    Ok(())
}
