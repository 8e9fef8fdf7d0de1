use crate::infra::{parse_date, resolve_rules, write_artifacts, ArtifactPaths};
use chrono::{NaiveDate, Utc};
use clap::Args;
use questlog_xp::config::AppConfig;
use questlog_xp::error::AppError;
use questlog_xp::import::load_events;
use questlog_xp::telemetry;
use questlog_xp::xp::{level_from_total, XpConfig, XpEngine, XpReport};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct GenerateArgs {
    /// Activity export to score (.json or .csv)
    #[arg(long)]
    pub(crate) events: PathBuf,
    /// XP rules file (defaults to XP_CONFIG_PATH)
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
    /// Directory for xp_daily.json, xp_total.json and xp_ledger.json (defaults to XP_OUTPUT_DIR)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Last day of the activity window (defaults to today in the rules' timezone)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Number of trailing days to summarize
    #[arg(long, default_value_t = 7)]
    pub(crate) window: u32,
    /// Print every ledger entry
    #[arg(long)]
    pub(crate) list_entries: bool,
}

#[derive(Args, Debug)]
pub(crate) struct LevelArgs {
    /// Cumulative XP total
    #[arg(long)]
    pub(crate) total: u64,
    /// XP rules file (defaults to XP_CONFIG_PATH)
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct InitConfigArgs {
    /// Where to write the rules file (defaults to XP_CONFIG_PATH)
    #[arg(long)]
    pub(crate) path: Option<PathBuf>,
    /// Overwrite an existing rules file
    #[arg(long)]
    pub(crate) force: bool,
}

pub(crate) fn run_generate(args: GenerateArgs) -> Result<(), AppError> {
    let GenerateArgs {
        events,
        config,
        output,
        today,
        window,
        list_entries,
    } = args;

    let app_config = AppConfig::load()?;
    telemetry::init(&app_config.telemetry)?;

    let engine = XpEngine::new(resolve_rules(config.as_deref(), &app_config)?)?;
    let raw = load_events(&events)?;
    info!(path = %events.display(), events = raw.len(), "loaded activity export");

    let report = engine.run(&raw)?;
    let output = output.unwrap_or_else(|| app_config.artifacts.output_dir.clone());
    let paths = write_artifacts(&report, &output)?;

    let today = match today {
        Some(day) => day,
        None => today_in(engine.config())?,
    };
    render_report(&report, &paths, today, window, list_entries);
    Ok(())
}

pub(crate) fn run_level(args: LevelArgs) -> Result<(), AppError> {
    let app_config = AppConfig::load()?;
    let rules = resolve_rules(args.config.as_deref(), &app_config)?;
    rules.validate()?;

    let progress = level_from_total(args.total, &rules)?;
    println!("Total XP: {}", args.total);
    println!(
        "Level {}: {}/{} XP ({}%), {} XP to next",
        progress.level,
        progress.into_level_xp,
        progress.level_need,
        progress.progress_pct(),
        progress.xp_to_next()
    );
    Ok(())
}

pub(crate) fn run_init_config(args: InitConfigArgs) -> Result<(), AppError> {
    let path = match args.path {
        Some(path) => path,
        None => AppConfig::load()?.artifacts.xp_config_path,
    };
    let written = write_standard_rules(&path, args.force)?;
    println!("Wrote standard XP rules to {}", written.display());
    Ok(())
}

pub(crate) fn write_standard_rules(path: &Path, force: bool) -> Result<PathBuf, AppError> {
    if path.exists() && !force {
        return Err(AppError::ArtifactExists(path.to_path_buf()));
    }

    let body = serde_json::to_string_pretty(&XpConfig::standard())?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, body)?;
    Ok(path.to_path_buf())
}

pub(crate) fn today_in(config: &XpConfig) -> Result<NaiveDate, AppError> {
    let tz = config.tz()?;
    Ok(Utc::now().with_timezone(&tz).date_naive())
}

fn render_report(
    report: &XpReport,
    paths: &ArtifactPaths,
    today: NaiveDate,
    window: u32,
    list_entries: bool,
) {
    let level = &report.totals.level;

    println!("Quest log XP");
    println!(
        "Events scored: {} across {} active days",
        report.ledger.len(),
        report.daily.len()
    );
    println!("Total XP: {}", report.totals.total_xp);
    println!(
        "Level {}: {}/{} XP ({}%), {} XP to next",
        level.level,
        level.into_level_xp,
        level.level_need,
        level.progress_pct(),
        level.xp_to_next()
    );
    match report.last_active_day() {
        Some(day) => println!("Streak: {} (last active {})", report.current_streak(), day),
        None => println!("Streak: 0 (no activity yet)"),
    }

    if window > 0 {
        println!("\nLast {window} days");
        for point in report.recent_series(today, window) {
            println!(
                "- {} {}: {} XP, {} events, {} issues closed",
                point.weekday, point.day, point.xp, point.events, point.issues
            );
        }
    }

    if list_entries {
        println!("\nLedger");
        for entry in report.ledger_view() {
            let reference = match (&entry.title, entry.number) {
                (Some(title), Some(number)) => format!(" #{number} {title}"),
                (Some(title), None) => format!(" {title}"),
                (None, Some(number)) => format!(" #{number}"),
                (None, None) => String::new(),
            };
            println!(
                "- {} | {}{} | {} XP",
                entry.date, entry.kind_label, reference, entry.xp
            );
        }
    }

    println!("\nArtifacts");
    println!("- {}", paths.daily.display());
    println!("- {}", paths.total.display());
    println!("- {}", paths.ledger.display());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_config_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("xp.config.json");

        write_standard_rules(&path, false).expect("first write");
        let written = XpConfig::from_path(&path).expect("rules parse back");
        assert_eq!(written, XpConfig::standard());

        match write_standard_rules(&path, false) {
            Err(AppError::ArtifactExists(existing)) => assert_eq!(existing, path),
            other => panic!("expected existing artifact error, got {other:?}"),
        }
        write_standard_rules(&path, true).expect("forced overwrite");
    }

    #[test]
    fn today_honors_rules_timezone() {
        let mut rules = XpConfig::standard();
        rules.timezone = "Pacific/Kiritimati".to_string();
        let local = today_in(&rules).expect("known zone");
        let utc = Utc::now().date_naive();
        assert!(local >= utc);
    }
}
