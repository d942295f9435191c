use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

/// Return a `Command` for the scanner binary, pointed at an empty config so
/// the user's own settings never leak into a test.
fn scanner(tmp: &Path) -> Command {
    let config = tmp.join("steam-scan.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }
    let mut cmd = cargo_bin_cmd!("gami-steam-scan");
    cmd.arg("--config").arg(config);
    cmd
}

fn write_manifest(steamapps: &Path, app_id: u32, name: &str) {
    let body = format!(
        "\"AppState\"\n{{\n\t\"appid\"\t\t\"{app_id}\"\n\t\"name\"\t\t\"{name}\"\n\t\"installdir\"\t\t\"{name}\"\n\t\"BytesToDownload\"\t\t\"10\"\n\t\"BytesDownloaded\"\t\t\"10\"\n}}\n"
    );
    fs::write(steamapps.join(format!("appmanifest_{app_id}.acf")), body).unwrap();
}

/// Builds a Steam installation with one base library and one extra library.
fn fake_steam() -> (TempDir, PathBuf) {
    let tmp = tempdir().unwrap();
    let base = tmp.path().join("Steam");
    let steamapps = base.join("steamapps");
    fs::create_dir_all(&steamapps).unwrap();
    write_manifest(&steamapps, 570, "Dota 2");

    let extra = tmp.path().join("Games");
    fs::create_dir_all(extra.join("steamapps")).unwrap();
    write_manifest(&extra.join("steamapps"), 1245620, "ELDEN RING");

    let vdf = format!(
        "\"libraryfolders\"\n{{\n\t\"0\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t}}\n\t\"1\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t}}\n}}\n",
        base.to_string_lossy().replace('\\', "\\\\"),
        extra.to_string_lossy().replace('\\', "\\\\")
    );
    fs::write(steamapps.join("libraryfolders.vdf"), vdf).unwrap();

    fs::create_dir_all(base.join("config")).unwrap();
    fs::write(
        base.join("config").join("loginusers.vdf"),
        "\"users\"\n{\n\t\"76561198000000001\"\n\t{\n\t\t\"AccountName\"\t\t\"gabe\"\n\t\t\"PersonaName\"\t\t\"Gabe \\\"N\\\"\"\n\t\t\"MostRecent\"\t\t\"1\"\n\t}\n}\n",
    )
    .unwrap();

    (tmp, base)
}

// ── Global flags ────────────────────────────────────────────────────

#[test]
fn help_flag() {
    let tmp = tempdir().unwrap();
    scanner(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scan local Steam libraries"));
}

#[test]
fn missing_explicit_config_fails() {
    cargo_bin_cmd!("gami-steam-scan")
        .args(["--config", "/nonexistent/steam-scan.toml", "url", "run", "570"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config"));
}

// ── scan ────────────────────────────────────────────────────────────

#[test]
fn scan_lists_all_libraries() {
    let (tmp, base) = fake_steam();
    scanner(tmp.path())
        .arg("scan")
        .arg("--steam-dir")
        .arg(&base)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dota 2"))
        .stdout(predicate::str::contains("ELDEN RING"))
        .stdout(predicate::str::contains("2 apps, 0 skipped"));
}

#[test]
fn scan_json() {
    let (tmp, base) = fake_steam();
    let output = scanner(tmp.path())
        .arg("scan")
        .arg("--steam-dir")
        .arg(&base)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = json["records"].as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["libraryId"], "570");
    assert_eq!(records[0]["installStatus"], "installed");
    assert_eq!(records[1]["libraryId"], "1245620");
}

#[test]
fn scan_base_library_only() {
    let (tmp, base) = fake_steam();
    fs::write(
        tmp.path().join("steam-scan.toml"),
        "include_library_folders = false\n",
    )
    .unwrap();
    scanner(tmp.path())
        .arg("scan")
        .arg("--steam-dir")
        .arg(&base)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dota 2"))
        .stdout(predicate::str::contains("ELDEN RING").not());
}

#[test]
fn scan_missing_install_fails() {
    let tmp = tempdir().unwrap();
    scanner(tmp.path())
        .arg("scan")
        .arg("--steam-dir")
        .arg(tmp.path().join("nope"))
        .assert()
        .failure();
}

// ── parse / fmt ─────────────────────────────────────────────────────

#[test]
fn parse_prints_json() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("a.vdf");
    fs::write(&file, "\"root\" { \"k\" \"v\" \"sub\" { \"x\" \"1\" } }").unwrap();

    let output = scanner(tmp.path()).arg("parse").arg(&file).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["root"]["k"], "v");
    assert_eq!(json["root"]["sub"]["x"], "1");
}

#[test]
fn parse_accepts_latin1() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("loginusers.vdf");
    fs::write(&file, b"\"users\"\n{\n\t\"PersonaName\"\t\"Jos\xe9\"\n}\n").unwrap();
    scanner(tmp.path())
        .arg("parse")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"PersonaName\": \"Jos\u{fffd}\""));
}

#[test]
fn parse_reports_location() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("bad.vdf");
    fs::write(&file, "\"root\"\n{\n\t\"k\"\t\t\"v\n").unwrap();

    scanner(tmp.path())
        .arg("parse")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad.vdf:3:"))
        .stderr(predicate::str::contains("unterminated string"));
}

#[test]
fn parse_reject_duplicates_from_config() {
    let tmp = tempdir().unwrap();
    fs::write(
        tmp.path().join("steam-scan.toml"),
        "[decoder]\nduplicate_keys = \"reject\"\n",
    )
    .unwrap();
    let file = tmp.path().join("dup.vdf");
    fs::write(&file, "\"a\" \"1\"\n\"a\" \"2\"\n").unwrap();

    scanner(tmp.path())
        .arg("parse")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("duplicate key"));
}

#[test]
fn fmt_rewrites_layout() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("a.vdf");
    fs::write(&file, "\"root\" { \"k\" \"v\" }").unwrap();

    scanner(tmp.path())
        .arg("fmt")
        .arg(&file)
        .assert()
        .success()
        .stdout("\"root\"\n{\n\t\"k\"\t\t\"v\"\n}\n");
}

#[test]
fn fmt_check() {
    let tmp = tempdir().unwrap();
    let messy = tmp.path().join("messy.vdf");
    fs::write(&messy, "\"root\" { \"k\" \"v\" }").unwrap();
    let clean = tmp.path().join("clean.vdf");
    fs::write(&clean, "\"root\"\n{\n\t\"k\"\t\t\"v\"\n}\n").unwrap();

    scanner(tmp.path())
        .args(["fmt", "--check"])
        .arg(&messy)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not formatted"));

    scanner(tmp.path())
        .args(["fmt", "--check"])
        .arg(&clean)
        .assert()
        .success()
        .stdout("");
}

// ── users / url ─────────────────────────────────────────────────────

#[test]
fn users_lists_accounts() {
    let (tmp, base) = fake_steam();
    scanner(tmp.path())
        .arg("users")
        .arg("--steam-dir")
        .arg(&base)
        .assert()
        .success()
        .stdout(predicate::str::contains("* 76561198000000001  gabe  (Gabe \"N\")"));
}

#[test]
fn users_shows_userdata_dir() {
    let (tmp, base) = fake_steam();
    scanner(tmp.path())
        .arg("users")
        .arg("--steam-dir")
        .arg(&base)
        .assert()
        .success()
        .stdout(predicate::str::contains("account 39734273  userdata -"));

    let user_dir = base.join("userdata").join("39734273");
    fs::create_dir_all(&user_dir).unwrap();
    scanner(tmp.path())
        .arg("users")
        .arg("--steam-dir")
        .arg(&base)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "account 39734273  userdata {}",
            user_dir.display()
        )));
}

#[test]
fn url_command() {
    let tmp = tempdir().unwrap();
    scanner(tmp.path())
        .args(["url", "run", "570"])
        .assert()
        .success()
        .stdout("steam://rungameid/570\n");
    scanner(tmp.path())
        .args(["url", "uninstall", "1245620"])
        .assert()
        .success()
        .stdout("steam://uninstall/1245620\n");
}
