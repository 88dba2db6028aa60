use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::Utc;
use rand::Rng;

/// Service tag stamped on every structured log event.
pub const SERVICE_NAME: &str = "ats_autofill";

pub const SCREENSHOT_FORMAT_STRING: &str = "%Y%m%d_%H%M%S";

/// Timestamped screenshot path: `<dir>/ats_form_<YYYYMMDD_HHMMSS>.png`
pub fn artifact_path(dir: &Path) -> PathBuf {
    let ts = Utc::now().format(SCREENSHOT_FORMAT_STRING);
    dir.join(format!("ats_form_{}.png", ts))
}

pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// Short randomized pause after navigation so page scripts settle and the
/// session paces like a person rather than a script.
pub fn settle_pause(min_secs: u64, max_secs: u64) {
    let secs = {
        let mut rng = rand::thread_rng();
        rng.gen_range(min_secs..=max_secs.max(min_secs))
    };
    debug!("settling for {} seconds", secs);
    std::thread::sleep(Duration::from_secs(secs));
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn artifact_path_matches_pattern() {
        let p = artifact_path(Path::new("data/screenshots"));
        let name = p.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("ats_form_"));
        assert!(name.ends_with(".png"));
        // ats_form_YYYYMMDD_HHMMSS.png
        let stamp = name
            .trim_start_matches("ats_form_")
            .trim_end_matches(".png");
        let (date, time) = stamp.split_once('_').unwrap();
        assert_eq!(date.len(), 8);
        assert_eq!(time.len(), 6);
        assert!(date.chars().all(|c| c.is_ascii_digit()));
        assert!(time.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn iso_timestamp_parses_back() {
        let ts = iso_timestamp();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
