//! Data models for cache entities
//!
//! Serialized field names match the documents the console exchanges with
//! its UI layer (`_id`, camelCase).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::error::Result;
use crate::utils::{generate_id, now_timestamp};

/// How the console authenticates against a database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    OnlinePlayground,
    OfflinePlayground,
    SharedKey,
}

impl AuthMode {
    /// Every mode
    pub const ALL: [AuthMode; 3] = [AuthMode::OnlinePlayground, AuthMode::OfflinePlayground, AuthMode::SharedKey];

    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::OnlinePlayground => "onlineplayground",
            AuthMode::OfflinePlayground => "offlineplayground",
            AuthMode::SharedKey => "sharedkey",
        }
    }

    /// Parse a stored mode, accepting the legacy `online`/`offline` values
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "onlineplayground" | "online" => Some(AuthMode::OnlinePlayground),
            "offlineplayground" | "offline" => Some(AuthMode::OfflinePlayground),
            "sharedkey" => Some(AuthMode::SharedKey),
            _ => None,
        }
    }
}

/// Saved database connection profile (root entity).
///
/// Tokens and shared keys are not part of the profile; they live in the
/// secret store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    /// Stable identifier children refer to; unique
    pub database_id: String,
    pub mode: AuthMode,
    pub allow_untrusted_certs: bool,
    pub is_bluetooth_le_enabled: bool,
    pub is_lan_enabled: bool,
    pub is_awdl_enabled: bool,
    pub is_cloud_sync_enabled: bool,
}

impl ConnectionProfile {
    /// New profile with every transport enabled and untrusted certs refused
    pub fn new(name: &str, database_id: &str, mode: AuthMode) -> Self {
        Self {
            id: generate_id(),
            name: name.to_string(),
            database_id: database_id.to_string(),
            mode,
            allow_untrusted_certs: false,
            is_bluetooth_le_enabled: true,
            is_lan_enabled: true,
            is_awdl_enabled: true,
            is_cloud_sync_enabled: true,
        }
    }
}

/// Sync subscription registered for a database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(rename = "_id")]
    pub id: String,
    pub database_id: String,
    pub name: String,
    pub query: String,
    /// Query arguments as a JSON string
    pub args: Option<String>,
}

impl Subscription {
    pub fn new(database_id: &str, name: &str, query: &str) -> Self {
        Self {
            id: generate_id(),
            database_id: database_id.to_string(),
            name: name.to_string(),
            query: query.to_string(),
            args: None,
        }
    }

    /// Attach query arguments, serialized to JSON
    pub fn with_args(mut self, args: &Value) -> Result<Self> {
        self.args = Some(serde_json::to_string(args)?);
        Ok(self)
    }

    /// Deserialize the stored arguments
    pub fn parsed_args(&self) -> Result<Option<Value>> {
        parse_args(self.args.as_deref())
    }
}

/// Executed query, newest first per database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub database_id: String,
    pub query: String,
    /// RFC 3339 UTC timestamp
    pub created_date: String,
}

impl HistoryEntry {
    pub fn new(database_id: &str, query: &str) -> Self {
        Self {
            id: generate_id(),
            database_id: database_id.to_string(),
            query: query.to_string(),
            created_date: now_timestamp(),
        }
    }
}

/// Query the operator starred
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub database_id: String,
    pub query: String,
    pub created_date: String,
}

impl FavoriteEntry {
    pub fn new(database_id: &str, query: &str) -> Self {
        Self {
            id: generate_id(),
            database_id: database_id.to_string(),
            query: query.to_string(),
            created_date: now_timestamp(),
        }
    }
}

/// Live-query observer registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserverMetadata {
    #[serde(rename = "_id")]
    pub id: String,
    pub database_id: String,
    pub name: String,
    pub query: String,
    pub args: Option<String>,
    pub is_active: bool,
    pub last_updated: Option<String>,
}

impl ObserverMetadata {
    /// New, active observer that has not fired yet
    pub fn new(database_id: &str, name: &str, query: &str) -> Self {
        Self {
            id: generate_id(),
            database_id: database_id.to_string(),
            name: name.to_string(),
            query: query.to_string(),
            args: None,
            is_active: true,
            last_updated: None,
        }
    }

    pub fn with_args(mut self, args: &Value) -> Result<Self> {
        self.args = Some(serde_json::to_string(args)?);
        Ok(self)
    }

    pub fn parsed_args(&self) -> Result<Option<Value>> {
        parse_args(self.args.as_deref())
    }

    /// Stamp `last_updated` with the current time
    pub fn touch(&mut self) {
        self.last_updated = Some(now_timestamp());
    }
}

fn parse_args(args: Option<&str>) -> Result<Option<Value>> {
    match args {
        None => Ok(None),
        Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
    }
}

/// Row counts per table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub profiles: u32,
    pub subscriptions: u32,
    pub history: u32,
    pub favorites: u32,
    pub observers: u32,
    /// Cache size on disk in bytes, main file plus write-ahead log
    pub file_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_auth_mode_parse() {
        assert_eq!(AuthMode::parse("onlineplayground"), Some(AuthMode::OnlinePlayground));
        assert_eq!(AuthMode::parse("OfflinePlayground"), Some(AuthMode::OfflinePlayground));
        assert_eq!(AuthMode::parse("sharedkey"), Some(AuthMode::SharedKey));
        assert_eq!(AuthMode::parse("online"), Some(AuthMode::OnlinePlayground));
        assert_eq!(AuthMode::parse("offline"), Some(AuthMode::OfflinePlayground));
        assert_eq!(AuthMode::parse("token"), None);

        for mode in AuthMode::ALL {
            assert_eq!(AuthMode::parse(mode.as_str()), Some(mode));
        }
    }

    #[test]
    fn test_auth_mode_serde_matches_stored_form() {
        let json = serde_json::to_string(&AuthMode::SharedKey).unwrap();
        assert_eq!(json, "\"sharedkey\"");
        assert_eq!(AuthMode::default(), AuthMode::OnlinePlayground);
    }

    #[test]
    fn test_profile_defaults() {
        let profile = ConnectionProfile::new("Staging", "db-1", AuthMode::SharedKey);
        assert!(!profile.id.is_empty());
        assert!(!profile.allow_untrusted_certs);
        assert!(profile.is_bluetooth_le_enabled);
        assert!(profile.is_lan_enabled);
        assert!(profile.is_awdl_enabled);
        assert!(profile.is_cloud_sync_enabled);
    }

    #[test]
    fn test_profile_json_field_names() {
        let profile = ConnectionProfile::new("Staging", "db-1", AuthMode::OnlinePlayground);
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("_id").is_some());
        assert_eq!(value["databaseId"], "db-1");
        assert_eq!(value["isBluetoothLeEnabled"], true);
        assert_eq!(value["mode"], "onlineplayground");
    }

    #[test]
    fn test_subscription_args() {
        let sub = Subscription::new("db-1", "cars", "SELECT * FROM cars WHERE color = :color");
        assert_eq!(sub.parsed_args().unwrap(), None);

        let sub = sub.with_args(&json!({"color": "blue"})).unwrap();
        assert_eq!(sub.parsed_args().unwrap(), Some(json!({"color": "blue"})));
    }

    #[test]
    fn test_invalid_args_reported() {
        let mut observer = ObserverMetadata::new("db-1", "cars", "SELECT * FROM cars");
        observer.args = Some("{not json".to_string());
        assert!(matches!(
            observer.parsed_args(),
            Err(crate::error::CacheError::InvalidArgs(_))
        ));
    }

    #[test]
    fn test_observer_touch() {
        let mut observer = ObserverMetadata::new("db-1", "cars", "SELECT * FROM cars");
        assert!(observer.is_active);
        assert!(observer.last_updated.is_none());
        observer.touch();
        assert!(observer.last_updated.is_some());
    }

    #[test]
    fn test_history_entry_has_timestamp() {
        let entry = HistoryEntry::new("db-1", "SELECT 1");
        assert!(crate::utils::parse_timestamp(&entry.created_date).is_some());
    }
}
