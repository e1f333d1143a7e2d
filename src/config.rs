//! Startup configuration.
//!
//! Values come from the process environment, which `main` seeds from a
//! `.env` file through `dotenvy`. Everything is read once, before the
//! dashboard is built.

use crate::error::ConfigError;

pub const DEFAULT_TABLE: &str = "student_submissions";

/// Connection details for the hosted submissions table.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_key: String,
    pub table: String,
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub teacher_password: String,
    /// `None` when records are read from a local file instead.
    pub supabase: Option<SupabaseConfig>,
}

impl DashboardConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env(require_supabase: bool) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), require_supabase)
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as missing. The Supabase pair is only required
    /// when `require_supabase` is set; otherwise it is picked up if present.
    pub fn from_lookup<F>(lookup: F, require_supabase: bool) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let teacher_password =
            get("TEACHER_PASSWORD").ok_or(ConfigError::Missing("TEACHER_PASSWORD"))?;

        let supabase = match (get("SUPABASE_URL"), get("SUPABASE_SERVICE_ROLE_KEY")) {
            (Some(url), Some(service_key)) => {
                if !url.starts_with("http") {
                    return Err(ConfigError::Invalid {
                        field: "SUPABASE_URL",
                        reason: format!("expected an http(s) URL, got '{url}'"),
                    });
                }
                Some(SupabaseConfig {
                    url: url.trim_end_matches('/').to_string(),
                    service_key,
                    table: get("SUBMISSIONS_TABLE")
                        .unwrap_or_else(|| DEFAULT_TABLE.to_string()),
                })
            }
            (None, _) if require_supabase => return Err(ConfigError::Missing("SUPABASE_URL")),
            (Some(_), None) if require_supabase => {
                return Err(ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY"));
            }
            _ => None,
        };

        Ok(Self {
            teacher_password,
            supabase,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_full_config() {
        let config = DashboardConfig::from_lookup(
            lookup_from(&[
                ("TEACHER_PASSWORD", "4321"),
                ("SUPABASE_URL", "https://example.supabase.co/"),
                ("SUPABASE_SERVICE_ROLE_KEY", "secret"),
            ]),
            true,
        )
        .unwrap();

        assert_eq!(config.teacher_password, "4321");
        let supabase = config.supabase.unwrap();
        assert_eq!(supabase.url, "https://example.supabase.co");
        assert_eq!(supabase.table, DEFAULT_TABLE);
    }

    #[test]
    fn test_missing_password_is_fatal() {
        let err = DashboardConfig::from_lookup(lookup_from(&[]), false).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TEACHER_PASSWORD")));
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let err = DashboardConfig::from_lookup(lookup_from(&[("TEACHER_PASSWORD", "  ")]), false)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("TEACHER_PASSWORD")));
    }

    #[test]
    fn test_missing_supabase_key_when_required() {
        let err = DashboardConfig::from_lookup(
            lookup_from(&[
                ("TEACHER_PASSWORD", "4321"),
                ("SUPABASE_URL", "https://example.supabase.co"),
            ]),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY")));
    }

    #[test]
    fn test_supabase_optional_for_file_source() {
        let config =
            DashboardConfig::from_lookup(lookup_from(&[("TEACHER_PASSWORD", "4321")]), false)
                .unwrap();
        assert!(config.supabase.is_none());
    }

    #[test]
    fn test_custom_table_and_invalid_url() {
        let config = DashboardConfig::from_lookup(
            lookup_from(&[
                ("TEACHER_PASSWORD", "4321"),
                ("SUPABASE_URL", "https://example.supabase.co"),
                ("SUPABASE_SERVICE_ROLE_KEY", "secret"),
                ("SUBMISSIONS_TABLE", "quiz_submissions"),
            ]),
            true,
        )
        .unwrap();
        assert_eq!(config.supabase.unwrap().table, "quiz_submissions");

        let err = DashboardConfig::from_lookup(
            lookup_from(&[
                ("TEACHER_PASSWORD", "4321"),
                ("SUPABASE_URL", "example.supabase.co"),
                ("SUPABASE_SERVICE_ROLE_KEY", "secret"),
            ]),
            true,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "SUPABASE_URL", .. }));
    }
}
