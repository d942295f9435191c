use std::path::PathBuf;

use gami_vdf::{Block, DecodeOptions};
use serde::{Deserialize, Serialize};

use crate::paths::Paths;
use crate::{SteamError, load_vdf};

/// Offset between a 64-bit SteamID and the 32-bit account ID used for
/// `userdata/<account_id>` directories.
const STEAM_ID_BASE: u64 = 76561197960265728;

/// A Steam account that has logged in on this machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    /// 64-bit SteamID as written in loginusers.vdf.
    pub steam_id: String,
    pub account_name: String,
    pub persona_name: String,
    pub most_recent: bool,
    pub timestamp: Option<u64>,
}

impl LoginUser {
    /// Returns the 32-bit account ID used for the userdata directory.
    pub fn account_id(&self) -> Option<u32> {
        let id: u64 = self.steam_id.parse().ok()?;
        id.checked_sub(STEAM_ID_BASE)
            .and_then(|account| u32::try_from(account).ok())
    }

    /// Returns this account's `userdata/<account_id>` directory if it exists.
    pub fn user_data_dir(&self, paths: &Paths) -> Option<PathBuf> {
        let dir = paths.user_dir(self.account_id()?);
        dir.is_dir().then_some(dir)
    }
}

/// Returns the users listed in loginusers.vdf.
pub fn login_users(paths: &Paths, options: &DecodeOptions) -> Result<Vec<LoginUser>, SteamError> {
    let root = load_vdf(&paths.login_users_path(), options)?;
    Ok(login_users_from(&root))
}

/// Extracts users from a decoded loginusers.vdf.
pub fn login_users_from(root: &Block) -> Vec<LoginUser> {
    let Some(users) = root.get_block("users") else {
        return Vec::new();
    };

    let mut result = Vec::new();
    for (steam_id, node) in users.iter() {
        // Verify it's a numeric SteamID
        if steam_id.parse::<u64>().is_err() {
            continue;
        }
        let Some(user) = node.as_block() else {
            continue;
        };

        result.push(LoginUser {
            steam_id: steam_id.to_owned(),
            account_name: user.get_str("AccountName").unwrap_or_default().to_owned(),
            persona_name: user.get_str("PersonaName").unwrap_or_default().to_owned(),
            most_recent: user.get_str("MostRecent") == Some("1")
                || user.get_str("mostrecent") == Some("1"),
            timestamp: user.get_str("Timestamp").and_then(|t| t.parse().ok()),
        });
    }
    result
}

/// Returns the user flagged `MostRecent`, or the one with the latest login
/// timestamp if none is flagged.
pub fn most_recent_user(users: &[LoginUser]) -> Option<&LoginUser> {
    users
        .iter()
        .find(|u| u.most_recent)
        .or_else(|| users.iter().max_by_key(|u| u.timestamp.unwrap_or(0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const LOGIN_USERS: &str = r#""users"
{
	"76561198000000001"
	{
		"AccountName"		"gabe"
		"PersonaName"		"Gabe"
		"MostRecent"		"0"
		"Timestamp"		"1690000000"
	}
	"76561198000000002"
	{
		"AccountName"		"second"
		"PersonaName"		"Second"
		"mostrecent"		"1"
		"Timestamp"		"1680000000"
	}
	"not-an-id"
	{
		"AccountName"		"ignored"
	}
}
"#;

    fn user(id: &str, most_recent: bool, timestamp: Option<u64>) -> LoginUser {
        LoginUser {
            steam_id: id.into(),
            account_name: String::new(),
            persona_name: String::new(),
            most_recent,
            timestamp,
        }
    }

    #[test]
    fn parses_users() {
        let users = login_users_from(&gami_vdf::decode(LOGIN_USERS).unwrap());
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].account_name, "gabe");
        assert_eq!(users[0].timestamp, Some(1690000000));
        assert!(!users[0].most_recent);
        assert!(users[1].most_recent);
    }

    #[test]
    fn most_recent_flag_wins() {
        let users = login_users_from(&gami_vdf::decode(LOGIN_USERS).unwrap());
        let recent = most_recent_user(&users).unwrap();
        assert_eq!(recent.steam_id, "76561198000000002");
    }

    #[test]
    fn most_recent_falls_back_to_timestamp() {
        let users = vec![
            user("76561198000000001", false, Some(5)),
            user("76561198000000002", false, Some(9)),
            user("76561198000000003", false, None),
        ];
        assert_eq!(
            most_recent_user(&users).unwrap().steam_id,
            "76561198000000002"
        );
        assert!(most_recent_user(&[]).is_none());
    }

    #[test]
    fn account_id_conversion() {
        assert_eq!(user("76561198000000001", false, None).account_id(), Some(39734273));
        assert_eq!(user("12", false, None).account_id(), None);
        assert_eq!(user("abc", false, None).account_id(), None);
    }

    #[test]
    fn user_data_dir_requires_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::with_base(tmp.path());
        let gabe = user("76561198000000001", true, None);
        assert!(gabe.user_data_dir(&paths).is_none());

        fs::create_dir_all(tmp.path().join("userdata").join("39734273")).unwrap();
        assert_eq!(
            gabe.user_data_dir(&paths),
            Some(tmp.path().join("userdata").join("39734273"))
        );
        assert!(user("abc", false, None).user_data_dir(&paths).is_none());
    }

    #[test]
    fn login_users_from_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::with_base(tmp.path());
        fs::create_dir_all(tmp.path().join("config")).unwrap();
        fs::write(paths.login_users_path(), LOGIN_USERS).unwrap();

        let users = login_users(&paths, &DecodeOptions::default()).unwrap();
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn login_users_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = Paths::with_base(tmp.path());
        assert!(matches!(
            login_users(&paths, &DecodeOptions::default()),
            Err(SteamError::NotFound)
        ));
    }

    #[test]
    fn user_json_field_names() {
        let json = serde_json::to_string(&user("1", true, None)).unwrap();
        assert!(json.contains("\"steamId\""));
        assert!(json.contains("\"mostRecent\":true"));
    }
}
