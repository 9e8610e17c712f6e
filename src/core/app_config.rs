use crate::model::backup_target::{BackupTarget, Destination, DestinationKind, RemoteStoreSpec};
use crate::model::config::{Config, ConfigTable, TargetConfig};
use crate::model::error::config::ConfigError;
use crate::model::schedule::ScheduleSpec;
use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};

const DEFAULT_RETENTION_LIMIT: usize = 4;

/// Settings read once at startup, with every target validated.
pub struct AppConfig {
    path: PathBuf,
    config: Config,
    targets: Vec<BackupTarget>,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let toml_string = fs::read_to_string(path).map_err(|err| ConfigError::config_not_found(path, err))?;
        Self::parse(path, &toml_string)
    }

    pub fn parse(path: &Path, toml_string: &str) -> Result<Self, ConfigError> {
        let table =
            toml::from_str::<ConfigTable>(toml_string).map_err(|err| ConfigError::invalid_config(path, err))?;

        Self::validate_options(&table.config)?;

        let targets = table
            .targets
            .into_iter()
            .map(|(name, target)| Self::resolve_target(name, target))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            path: path.to_path_buf(),
            config: table.config,
            targets,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Targets in name order.
    pub fn targets(&self) -> &[BackupTarget] {
        &self.targets
    }

    fn validate_options(config: &Config) -> Result<(), ConfigError> {
        if !(1..=3600).contains(&config.default_wakeup_time) {
            return Err(ConfigError::option_out_of_range(
                "default_wakeup_time",
                config.default_wakeup_time.to_string(),
            ));
        }
        if config.max_file_operations == 0 {
            return Err(ConfigError::option_out_of_range(
                "max_file_operations",
                config.max_file_operations.to_string(),
            ));
        }
        Ok(())
    }

    fn resolve_target(name: String, target: TargetConfig) -> Result<BackupTarget, ConfigError> {
        let missing = |field: &str| ConfigError::missing_field(name.as_str(), field);

        let source_path = target.source_path.ok_or_else(|| missing("source_path"))?;
        if source_path.file_name().is_none() {
            return Err(ConfigError::invalid_source_path(name.as_str(), source_path));
        }

        let kind = target.destination_kind.ok_or_else(|| missing("destination_kind"))?;
        let root = target.destination_root.ok_or_else(|| missing("destination_root"))?;

        let destination = match kind {
            DestinationKind::Local => {
                let remote_fields = [
                    ("bucket_name", target.bucket_name.is_some()),
                    ("region", target.region.is_some()),
                    ("endpoint", target.endpoint.is_some()),
                    ("allow_http", target.allow_http.is_some()),
                    ("auth", target.auth.is_some()),
                ];
                if let Some((field, _)) = remote_fields.iter().find(|(_, present)| *present) {
                    return Err(ConfigError::unexpected_remote_field(name.as_str(), *field));
                }
                Destination::Local {
                    root: PathBuf::from(root),
                }
            }
            DestinationKind::ObjectStore => Destination::ObjectStore {
                prefix: root,
                remote: RemoteStoreSpec {
                    bucket_name: target.bucket_name.ok_or_else(|| missing("bucket_name"))?,
                    region: target.region,
                    endpoint: target.endpoint,
                    allow_http: target.allow_http.unwrap_or(false),
                    auth: target.auth.unwrap_or_default(),
                },
            },
        };

        let retention_limit = target.retention_limit.unwrap_or(DEFAULT_RETENTION_LIMIT);
        if retention_limit == 0 {
            return Err(ConfigError::invalid_retention_limit(name.as_str()));
        }

        let schedule = target.schedule.ok_or_else(|| missing("schedule"))?;
        let schedule = ScheduleSpec::parse(&name, schedule.kind, &schedule.value)?;

        Ok(BackupTarget {
            name,
            source_path,
            destination,
            retention_limit,
            recency: target.recency.unwrap_or_default(),
            schedule,
        })
    }
}

impl Deref for AppConfig {
    type Target = Config;

    fn deref(&self) -> &Self::Target {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::backup_target::{AuthMode, RecencyMetric};
    use chrono::Weekday;

    fn parse(toml_string: &str) -> Result<AppConfig, ConfigError> {
        AppConfig::parse(Path::new("config.toml"), toml_string)
    }

    #[test]
    fn loads_the_bundled_sample() {
        let config = AppConfig::load(Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/config.toml"))).unwrap();
        let names: Vec<&str> = config.targets().iter().map(|target| target.name.as_str()).collect();
        assert_eq!(names, vec!["frequent", "hourly", "offsite"]);
        assert_eq!(config.default_wakeup_time, 60);
    }

    #[test]
    fn resolves_local_and_remote_targets() {
        let config = parse(
            r#"
            [Config]
            default_wakeup_time = 30
            concurrent_jobs = true

            [Target.documents]
            source_path = "/home/me/documents"
            destination_kind = "local"
            destination_root = "/backups"
            retention_limit = 168
            recency = "created"
            schedule = { kind = "hourly", value = ":00" }

            [Target.photos]
            source_path = "/home/me/photos"
            destination_kind = "object_store"
            destination_root = "nightly/photos"
            bucket_name = "my-backups"
            region = "eu-west-1"
            auth = { mode = "static", access_key_id = "id", secret_access_key = "secret" }
            schedule = { kind = "weekly", value = "monday" }
            "#,
        )
        .unwrap();

        assert!(config.concurrent_jobs);
        assert_eq!(config.default_wakeup_time, 30);

        let documents = &config.targets()[0];
        assert_eq!(documents.name, "documents");
        assert_eq!(documents.retention_limit, 168);
        assert_eq!(documents.recency, RecencyMetric::Created);
        assert_eq!(documents.schedule, ScheduleSpec::Hourly { minute: 0 });
        assert_eq!(
            documents.destination,
            Destination::Local {
                root: PathBuf::from("/backups")
            }
        );

        let photos = &config.targets()[1];
        assert_eq!(photos.retention_limit, DEFAULT_RETENTION_LIMIT);
        assert_eq!(photos.schedule, ScheduleSpec::Weekly { weekday: Weekday::Mon });
        match &photos.destination {
            Destination::ObjectStore { prefix, remote } => {
                assert_eq!(prefix, "nightly/photos");
                assert_eq!(remote.bucket_name, "my-backups");
                assert!(matches!(remote.auth, AuthMode::Static { session_token: None, .. }));
            }
            other => panic!("unexpected destination {other:?}"),
        }
    }

    #[test]
    fn config_section_is_optional() {
        let config = parse("").unwrap();
        assert!(config.targets().is_empty());
        assert_eq!(config.max_file_operations, 16);
    }

    #[test]
    fn reports_missing_fields_by_target() {
        let err = parse(
            r#"
            [Target.broken]
            source_path = "/data"
            destination_kind = "local"
            schedule = { kind = "daily", value = 3 }
            "#,
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            ConfigError::MissingField { ref target, ref field } if target == "broken" && field == "destination_root"
        ));
    }

    #[test]
    fn rejects_a_zero_retention_limit() {
        let err = parse(
            r#"
            [Target.none]
            source_path = "/data"
            destination_kind = "local"
            destination_root = "/backups"
            retention_limit = 0
            schedule = { kind = "daily", value = 3 }
            "#,
        )
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::InvalidRetentionLimit { .. }));
    }

    #[test]
    fn rejects_remote_settings_on_local_targets() {
        let err = parse(
            r#"
            [Target.mixed]
            source_path = "/data"
            destination_kind = "local"
            destination_root = "/backups"
            bucket_name = "oops"
            schedule = { kind = "daily", value = 3 }
            "#,
        )
        .err()
        .unwrap();
        assert!(matches!(err, ConfigError::UnexpectedRemoteField { ref field, .. } if field == "bucket_name"));
    }

    #[test]
    fn rejects_bad_values() {
        let schedule = parse(
            r#"
            [Target.late]
            source_path = "/data"
            destination_kind = "local"
            destination_root = "/backups"
            schedule = { kind = "daily", value = 25 }
            "#,
        );
        assert!(matches!(schedule, Err(ConfigError::InvalidScheduleValue { .. })));

        let endless = parse(
            r#"
            [Target.endless]
            source_path = "/data"
            destination_kind = "local"
            destination_root = "/backups"
            schedule = { kind = "interval", value = "100000000d" }
            "#,
        );
        assert!(matches!(endless, Err(ConfigError::InvalidScheduleValue { .. })));

        let source = parse(
            r#"
            [Target.root]
            source_path = "/"
            destination_kind = "local"
            destination_root = "/backups"
            schedule = { kind = "daily", value = 1 }
            "#,
        );
        assert!(matches!(source, Err(ConfigError::InvalidSourcePath { .. })));

        let wakeup = parse("[Config]\ndefault_wakeup_time = 0\n");
        assert!(matches!(wakeup, Err(ConfigError::OptionOutOfRange { .. })));

        let unknown = parse(
            r#"
            [Target.typo]
            source_pth = "/data"
            "#,
        );
        assert!(matches!(unknown, Err(ConfigError::InvalidConfig { .. })));
    }

    #[test]
    fn missing_file_is_config_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppConfig::load(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound { .. })));
    }
}
