//! `steam://` command URLs.
//!
//! Installing, uninstalling and launching are delegated to the Steam client;
//! this module only builds the URL to hand to the platform's URL opener.

use std::fmt;

/// An action the Steam client performs for an app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteamCommand {
    Run,
    Install,
    Uninstall,
}

impl SteamCommand {
    /// Returns the URL verb Steam expects.
    fn verb(&self) -> &'static str {
        match self {
            SteamCommand::Run => "rungameid",
            SteamCommand::Install => "install",
            SteamCommand::Uninstall => "uninstall",
        }
    }
}

impl fmt::Display for SteamCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SteamCommand::Run => write!(f, "run"),
            SteamCommand::Install => write!(f, "install"),
            SteamCommand::Uninstall => write!(f, "uninstall"),
        }
    }
}

/// Builds the URL for `command` on `app_id`, e.g. `steam://rungameid/570`.
pub fn command_url(command: SteamCommand, app_id: u32) -> String {
    format!("steam://{}/{}", command.verb(), app_id)
}
