use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use questlog_xp::config::AppConfig;
use questlog_xp::error::AppError;
use questlog_xp::xp::{XpConfig, XpReport};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) const DAILY_FILE: &str = "xp_daily.json";
pub(crate) const TOTAL_FILE: &str = "xp_total.json";
pub(crate) const LEDGER_FILE: &str = "xp_ledger.json";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Rules applied when a request does not carry its own config.
#[derive(Clone)]
pub(crate) struct XpState {
    pub(crate) rules: Arc<XpConfig>,
}

/// An explicit path must exist; the configured default may be absent.
pub(crate) fn resolve_rules(
    explicit: Option<&Path>,
    app_config: &AppConfig,
) -> Result<XpConfig, AppError> {
    if let Some(path) = explicit {
        return Ok(XpConfig::from_path(path)?);
    }

    let default_path = &app_config.artifacts.xp_config_path;
    if default_path.exists() {
        info!(path = %default_path.display(), "loading xp rules");
        Ok(XpConfig::from_path(default_path)?)
    } else {
        warn!(
            path = %default_path.display(),
            "xp rules not found, using standard rules"
        );
        Ok(XpConfig::standard())
    }
}

#[derive(Debug)]
pub(crate) struct ArtifactPaths {
    pub(crate) daily: PathBuf,
    pub(crate) total: PathBuf,
    pub(crate) ledger: PathBuf,
}

/// Serializes and stages all three artifacts beside their targets, then
/// renames them into place. A failed staging write leaves the previous
/// artifacts untouched.
pub(crate) fn write_artifacts(report: &XpReport, dir: &Path) -> Result<ArtifactPaths, AppError> {
    let daily = serde_json::to_string_pretty(&report.daily_view())?;
    let total = serde_json::to_string_pretty(&report.totals)?;
    let ledger = serde_json::to_string_pretty(&report.ledger_view())?;

    fs::create_dir_all(dir)?;
    let paths = ArtifactPaths {
        daily: dir.join(DAILY_FILE),
        total: dir.join(TOTAL_FILE),
        ledger: dir.join(LEDGER_FILE),
    };

    let staged = [
        (staging_path(&paths.daily), &paths.daily, daily),
        (staging_path(&paths.total), &paths.total, total),
        (staging_path(&paths.ledger), &paths.ledger, ledger),
    ];
    for (index, (temp, _, body)) in staged.iter().enumerate() {
        if let Err(err) = fs::write(temp, body) {
            for (written, _, _) in &staged[..index] {
                let _ = fs::remove_file(written);
            }
            return Err(err.into());
        }
    }
    for (temp, target, _) in &staged {
        fs::rename(temp, target)?;
    }

    Ok(paths)
}

fn staging_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    target.with_file_name(format!(".{name}.tmp"))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use questlog_xp::xp::{RawEvent, XpEngine};

    #[test]
    fn writes_day_keyed_and_flat_artifacts() {
        let dir = tempfile::tempdir().expect("temp dir");
        let engine = XpEngine::new(XpConfig::standard()).expect("valid config");
        let report = engine
            .run(&[
                RawEvent::new("2025-09-24", "issue_closed").with_story_points(2.0),
                RawEvent::new("2025-09-25", "docs"),
            ])
            .expect("pipeline runs");

        let out = dir.path().join("generated");
        let paths = write_artifacts(&report, &out).expect("artifacts written");

        let daily: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(paths.daily).expect("daily")).expect("json");
        assert_eq!(daily["2025-09-24"]["streak"], 1);
        assert_eq!(daily["2025-09-25"]["events"], 1);

        let total: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(paths.total).expect("total")).expect("json");
        assert_eq!(total["totalXp"], report.totals.total_xp);
        assert_eq!(total["level"], 1);

        let ledger: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(paths.ledger).expect("ledger")).expect("json");
        assert_eq!(ledger[0]["kind"], "issue_closed");
        assert_eq!(ledger[1]["xp"], report.ledger[1].xp);
    }

    #[test]
    fn failed_staging_keeps_previous_artifacts() {
        let dir = tempfile::tempdir().expect("temp dir");
        let engine = XpEngine::new(XpConfig::standard()).expect("valid config");
        let first = engine
            .run(&[RawEvent::new("2025-09-24", "docs")])
            .expect("pipeline runs");
        let paths = write_artifacts(&first, dir.path()).expect("first write");
        let before = fs::read_to_string(&paths.daily).expect("daily");

        let second = engine
            .run(&[RawEvent::new("2025-09-25", "issue_closed").with_story_points(3.0)])
            .expect("pipeline runs");
        // A directory squatting on the ledger's staging path makes that write fail.
        fs::create_dir(dir.path().join(".xp_ledger.json.tmp")).expect("blocker");
        assert!(matches!(
            write_artifacts(&second, dir.path()),
            Err(AppError::Io(_))
        ));

        assert_eq!(fs::read_to_string(&paths.daily).expect("daily"), before);
        assert!(!dir.path().join(".xp_daily.json.tmp").exists());
        assert!(!dir.path().join(".xp_total.json.tmp").exists());
    }

    #[test]
    fn parse_date_reports_bad_input() {
        assert!(parse_date("2025-09-24").is_ok());
        let error = parse_date("24.09.2025").expect_err("wrong format");
        assert!(error.contains("YYYY-MM-DD"));
    }
}
