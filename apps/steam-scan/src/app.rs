//! Subcommand handlers.

use std::fmt::Write as _;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, bail};
use gami_steam::{InstallRecord, InstallStatus, LoginUser, Paths, ScanReport};
use gami_vdf::Block;

use crate::config::Config;

/// Reads and decodes `file` with the configured decoder policies.
///
/// Non-UTF-8 input is read the same lossy way the scanner reads it. Decode
/// failures are reported as `file:line:col: message`.
fn decode_file(config: &Config, file: &Path) -> anyhow::Result<(String, Block)> {
    let text = gami_steam::read_text(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    match gami_vdf::decode_with(&text, &config.decoder) {
        Ok(block) => Ok((text, block)),
        Err(e) => {
            let (line, col) = e.line_col(&text);
            bail!("{}:{line}:{col}: {e}", file.display())
        }
    }
}

fn resolve_paths(config: &Config, steam_dir: Option<&Path>) -> anyhow::Result<Paths> {
    config
        .paths(steam_dir)
        .context("could not locate a Steam installation (try --steam-dir)")
}

pub fn scan(config: &Config, steam_dir: Option<&Path>, json: bool) -> anyhow::Result<ExitCode> {
    let paths = resolve_paths(config, steam_dir)?;
    tracing::info!(base = %paths.base_dir().display(), "scanning Steam installation");

    let report = if config.include_library_folders {
        gami_steam::scan_all(&paths, &config.decoder)
    } else {
        gami_steam::scan_library(&paths.steamapps_dir(), &paths, &config.decoder)
    }
    .with_context(|| format!("failed to scan {}", paths.base_dir().display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }
    Ok(ExitCode::SUCCESS)
}

pub fn parse(config: &Config, file: &Path) -> anyhow::Result<ExitCode> {
    let (_, block) = decode_file(config, file)?;
    println!("{}", serde_json::to_string_pretty(&block)?);
    Ok(ExitCode::SUCCESS)
}

pub fn fmt(config: &Config, file: &Path, check: bool) -> anyhow::Result<ExitCode> {
    let (text, block) = decode_file(config, file)?;
    let formatted = gami_vdf::encode(&block);

    if check {
        if text == formatted {
            return Ok(ExitCode::SUCCESS);
        }
        eprintln!("{} is not formatted", file.display());
        return Ok(ExitCode::from(1));
    }

    print!("{formatted}");
    Ok(ExitCode::SUCCESS)
}

pub fn users(config: &Config, steam_dir: Option<&Path>, json: bool) -> anyhow::Result<ExitCode> {
    let paths = resolve_paths(config, steam_dir)?;
    let users = gami_steam::login_users(&paths, &config.decoder)
        .with_context(|| format!("failed to read {}", paths.login_users_path().display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&users)?);
    } else {
        let recent = gami_steam::most_recent_user(&users).map(|u| u.steam_id.as_str());
        print!("{}", render_users(&users, recent, &paths));
    }
    Ok(ExitCode::SUCCESS)
}

fn status_label(status: InstallStatus) -> &'static str {
    match status {
        InstallStatus::Installed => "installed",
        InstallStatus::Installing => "installing",
        InstallStatus::InLibrary => "in library",
        InstallStatus::Queued => "queued",
    }
}

fn render_record(out: &mut String, record: &InstallRecord) {
    let path = record
        .install_path
        .as_deref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".into());
    let _ = writeln!(
        out,
        "{:>10}  {:<10}  {}  ({})",
        record.library_id,
        status_label(record.install_status),
        record.name,
        path
    );
}

fn render_report(report: &ScanReport) -> String {
    let mut out = String::new();
    for record in &report.records {
        render_record(&mut out, record);
    }
    for skipped in &report.skipped {
        let _ = writeln!(out, "skipped {}: {}", skipped.path.display(), skipped.reason);
    }
    let _ = writeln!(
        out,
        "{} apps, {} skipped",
        report.records.len(),
        report.skipped.len()
    );
    out
}

fn render_users(users: &[LoginUser], recent: Option<&str>, paths: &Paths) -> String {
    let mut out = String::new();
    for user in users {
        let marker = if Some(user.steam_id.as_str()) == recent { "*" } else { " " };
        let account = user
            .account_id()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".into());
        let user_data = user
            .user_data_dir(paths)
            .map(|dir| dir.display().to_string())
            .unwrap_or_else(|| "-".into());
        let _ = writeln!(
            out,
            "{marker} {}  {}  ({})  account {account}  userdata {user_data}",
            user.steam_id, user.account_name, user.persona_name
        );
    }
    out
}
