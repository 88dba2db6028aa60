use std::path::PathBuf;

/// Process-wide configuration, built once at startup and passed by reference
/// into the components that need it. Launch policy (profile, countermeasures,
/// viewport) is fixed here, never per call.
#[derive(Builder, Debug, Clone)]
#[builder(setter(into))]
pub struct AutofillConfig {
    // path to the real Chrome executable; default_executable() when unset
    #[builder(default = "None")]
    pub chrome_executable: Option<PathBuf>,
    // persistent user-data directory so cookies and login state survive runs
    #[builder(default = "None")]
    pub user_data_dir: Option<PathBuf>,
    #[builder(default = "self.default_profile_name()")]
    pub profile_name: String,
    #[builder(default = "true")]
    pub headless: bool,
    // navigation timeout in milliseconds
    #[builder(default = "30_000")]
    pub navigation_timeout_ms: u64,
    // where verification screenshots land
    #[builder(default = "self.default_artifact_dir()")]
    pub artifact_dir: PathBuf,
    // JSONL event log
    #[builder(default = "self.default_event_log()")]
    pub event_log: PathBuf,
    // bounds for the randomized post-navigation pause, in seconds
    #[builder(default = "2")]
    pub min_settle_secs: u64,
    #[builder(default = "4")]
    pub max_settle_secs: u64,
}

impl AutofillConfigBuilder {
    pub fn default_builder() -> AutofillConfigBuilder {
        AutofillConfigBuilder::default()
    }

    fn default_profile_name(&self) -> String {
        String::from("Default")
    }

    fn default_artifact_dir(&self) -> PathBuf {
        PathBuf::from("data/screenshots")
    }

    fn default_event_log(&self) -> PathBuf {
        PathBuf::from("logs/app.log")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builds_with_defaults() {
        let config = AutofillConfigBuilder::default_builder().build().unwrap();
        assert!(config.chrome_executable.is_none());
        assert!(config.user_data_dir.is_none());
        assert_eq!(config.profile_name, "Default");
        assert!(config.headless);
        assert_eq!(config.navigation_timeout_ms, 30_000);
        assert_eq!(config.artifact_dir, PathBuf::from("data/screenshots"));
        assert_eq!(config.event_log, PathBuf::from("logs/app.log"));
    }

    #[test]
    fn overrides_stick() {
        let config = AutofillConfigBuilder::default_builder()
            .chrome_executable(Some(PathBuf::from("/usr/bin/google-chrome")))
            .user_data_dir(Some(PathBuf::from("/home/me/.config/google-chrome")))
            .profile_name("Profile 1")
            .headless(false)
            .navigation_timeout_ms(60_000u64)
            .build()
            .unwrap();
        assert_eq!(config.profile_name, "Profile 1");
        assert!(!config.headless);
        assert_eq!(config.navigation_timeout_ms, 60_000);
    }
}
