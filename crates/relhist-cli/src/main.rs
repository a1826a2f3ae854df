//! Relhist - release history view from the terminal
//!
//! The `relhist` command drives the release history engine against a JSON
//! release file.
//!
//! ## Commands
//!
//! - `show`: render the filtered history, selection and deploy button
//! - `toggle`: apply a filter checkbox change to a location
//! - `deploy`: select a release and submit it for redeploy

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, warn, Level};

use relhist_core::config::{APP_ENV, RELEASES_FILE_ENV};
use relhist_core::{
    toggle_filter, AppSpan, FilterTag, HistoryConfig, HistoryView, LiveReleaseHistory, Location,
    MemoryNavigator, Navigator, SelectionController, SubmitOutcome, METRICS,
};
use relhist_state::JsonFileReleaseSource;

#[derive(Parser)]
#[command(name = "relhist")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse release history and redeploy a previous release", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the release history comes from.
#[derive(clap::Args)]
struct SourceArgs {
    /// Application name
    #[arg(long, env = APP_ENV)]
    app: Option<String>,

    /// JSON file mapping app names to releases (newest first)
    #[arg(long, env = RELEASES_FILE_ENV)]
    releases: Option<PathBuf>,

    /// Name of the currently deployed release
    #[arg(long)]
    current: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the filtered release history
    Show {
        #[command(flatten)]
        source: SourceArgs,

        /// Query string carrying the `rhf` filter (e.g. "?rhf=code&rhf=env")
        #[arg(short, long, default_value = "")]
        query: String,

        /// Highlight this release instead of the deployed one
        #[arg(short, long)]
        select: Option<String>,

        /// A deploy is already in progress
        #[arg(long)]
        persisting: bool,

        /// Print the view as JSON instead of text
        #[arg(long)]
        output_json: bool,
    },

    /// Apply a filter checkbox change and print the new location
    Toggle {
        /// Current location (path and query string)
        #[arg(short, long, default_value = "/")]
        location: String,

        /// Filter checkbox to change
        #[arg(short, long, value_enum)]
        filter: FilterArg,

        /// Uncheck the box instead of checking it
        #[arg(long)]
        off: bool,
    },

    /// Select a release and submit it for redeploy
    Deploy {
        #[command(flatten)]
        source: SourceArgs,

        /// Release to redeploy
        #[arg(short, long)]
        select: String,

        /// A deploy is already in progress
        #[arg(long)]
        persisting: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    Code,
    Env,
}

impl From<FilterArg> for FilterTag {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::Code => FilterTag::Code,
            FilterArg::Env => FilterTag::Env,
        }
    }
}

/// Payload handed to the deploy pipeline by `relhist deploy`.
#[derive(Debug, Serialize)]
struct DeployRequest {
    app: String,
    release: String,
    replaces: String,
    requested_at: DateTime<Utc>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = HistoryConfig::from_env().context("Invalid relhist environment")?;

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    relhist_core::init_tracing(cli.json || config.json_logs, level);

    let result = match cli.command {
        Commands::Show {
            source,
            query,
            select,
            persisting,
            output_json,
        } => {
            cmd_show(
                &config,
                &source,
                &query,
                select.as_deref(),
                persisting,
                output_json,
            )
            .await
        }
        Commands::Toggle {
            location,
            filter,
            off,
        } => cmd_toggle(&location, filter.into(), !off),
        Commands::Deploy {
            source,
            select,
            persisting,
        } => cmd_deploy(&config, &source, &select, persisting).await,
    };

    METRICS.flush();
    result
}

/// Resolve app name and release file: flags and env first, then config.
fn resolve_source(config: &HistoryConfig, args: &SourceArgs) -> Result<(String, PathBuf)> {
    let app = args
        .app
        .clone()
        .or_else(|| config.app_name.clone())
        .with_context(|| format!("No application given (use --app or {APP_ENV})"))?;
    let releases = args
        .releases
        .clone()
        .unwrap_or_else(|| config.releases_file.clone());
    Ok((app, releases))
}

async fn load_history(app: &str, releases: PathBuf) -> LiveReleaseHistory {
    let source = JsonFileReleaseSource::new(releases);
    let mut live = LiveReleaseHistory::new(app);
    live.mount(&source, &source).await;
    live
}

async fn cmd_show(
    config: &HistoryConfig,
    args: &SourceArgs,
    query: &str,
    select: Option<&str>,
    persisting: bool,
    output_json: bool,
) -> Result<()> {
    let (app, releases) = resolve_source(config, args)?;
    let mut live = load_history(&app, releases).await;
    live.unmount();

    let _span = AppSpan::enter(&app);
    let mut selection = SelectionController::new(args.current.as_str());
    if let Some(name) = select {
        selection.toggle_row(name, true);
    }

    let view = HistoryView::build(&live, query, &selection, persisting);
    if output_json {
        println!("{}", view.to_json()?);
    } else {
        print!("{}", render_view(&view));
    }

    if let HistoryView::Failed { message } = view {
        bail!("Failed to load releases for {}: {}", app, message);
    }
    Ok(())
}

fn cmd_toggle(location: &str, tag: FilterTag, checked: bool) -> Result<()> {
    let mut nav = MemoryNavigator::new(Location::parse(location));
    toggle_filter(&mut nav, tag, checked);
    println!("{}", nav.location().href());
    Ok(())
}

async fn cmd_deploy(
    config: &HistoryConfig,
    args: &SourceArgs,
    select: &str,
    persisting: bool,
) -> Result<()> {
    let (app, releases) = resolve_source(config, args)?;
    let mut live = load_history(&app, releases).await;
    live.unmount();

    let _span = AppSpan::enter(&app);
    let known = live
        .releases()
        .is_some_and(|history| history.iter().any(|r| r.name == select));
    if !known {
        warn!(release = %select, "selected release is not in the loaded history");
    }

    let mut selection = SelectionController::new(args.current.as_str());
    selection.toggle_row(select, true);

    let mut request = None;
    let outcome = selection.submit(persisting, |name| {
        request = Some(DeployRequest {
            app: app.clone(),
            release: name.to_string(),
            replaces: args.current.clone(),
            requested_at: Utc::now(),
        });
    });

    match outcome {
        SubmitOutcome::Persisted(name) => {
            info!(release = %name, "deploy requested");
            if let Some(request) = request {
                println!("{}", serde_json::to_string_pretty(&request)?);
            }
            Ok(())
        }
        SubmitOutcome::Disabled if persisting => bail!("A deploy is already in progress"),
        SubmitOutcome::Disabled => bail!("{} is already deployed", select),
        SubmitOutcome::EmptySelection => Ok(()),
    }
}

/// Text rendering of the view for terminals.
fn render_view(view: &HistoryView) -> String {
    let mut out = String::new();
    match view {
        HistoryView::Loading => out.push_str("Loading...\n"),
        HistoryView::Failed { message } => {
            let _ = writeln!(out, "warning: {message}");
        }
        HistoryView::Ready {
            filters,
            rows,
            selected: _,
            submit,
        } => {
            let _ = writeln!(
                out,
                "[{}] Code  [{}] Env\n",
                checkbox(filters.code),
                checkbox(filters.env)
            );
            for row in rows {
                let _ = write!(out, "[{}] Release {}", checkbox(row.selected), row.label);
                if let Some(commit) = &row.git_commit {
                    let _ = write!(out, "  git.commit {commit}");
                }
                out.push('\n');
                for change in row.env_diff.changes.iter().filter(|c| !c.is_unchanged()) {
                    let _ = writeln!(out, "      {change}");
                }
            }
            let state = if submit.enabled { "" } else { " (disabled)" };
            let _ = writeln!(out, "\n<{}>{}", submit.label, state);
        }
    }
    out
}

fn checkbox(checked: bool) -> char {
    if checked {
        'x'
    } else {
        ' '
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relhist_core::view::DEPLOY_LABEL;
    use relhist_core::{EnvChange, EnvDiff, FilterToggles, ReleaseKind, ReleaseRow, SubmitButton};

    #[test]
    fn render_ready_view() {
        let view = HistoryView::Ready {
            filters: FilterToggles {
                code: true,
                env: false,
            },
            rows: vec![ReleaseRow {
                name: "apps/web/releases/2".into(),
                label: "2".into(),
                git_commit: Some("abc123".into()),
                kind: ReleaseKind::Code,
                selected: true,
                env_diff: EnvDiff {
                    changes: vec![
                        EnvChange::Added {
                            key: "PORT".into(),
                            value: "80".into(),
                        },
                        EnvChange::Unchanged {
                            key: "HOST".into(),
                            value: "0.0.0.0".into(),
                        },
                    ],
                },
            }],
            selected: "apps/web/releases/2".into(),
            submit: SubmitButton {
                enabled: false,
                label: DEPLOY_LABEL,
            },
        };

        let text = render_view(&view);

        assert!(text.contains("[x] Code  [ ] Env"));
        assert!(text.contains("[x] Release 2  git.commit abc123"));
        assert!(text.contains("+ PORT=80"));
        assert!(!text.contains("HOST"));
        assert!(text.contains("<Deploy Release> (disabled)"));
    }

    #[test]
    fn render_failed_view_is_warning() {
        let view = HistoryView::Failed {
            message: "application not found: web".into(),
        };
        assert_eq!(render_view(&view), "warning: application not found: web\n");
    }

    #[test]
    fn cli_parses_toggle() {
        let cli = Cli::try_parse_from([
            "relhist", "toggle", "--location", "/apps/web?rhf=env", "--filter", "code",
        ])
        .expect("parse");
        assert!(matches!(
            cli.command,
            Commands::Toggle {
                filter: FilterArg::Code,
                off: false,
                ..
            }
        ));
    }

    #[test]
    fn resolve_source_prefers_flags_over_config() {
        let config = HistoryConfig {
            app_name: Some("api".into()),
            ..HistoryConfig::default()
        };
        let args = SourceArgs {
            app: Some("web".into()),
            releases: None,
            current: "apps/web/releases/1".into(),
        };

        let (app, releases) = resolve_source(&config, &args).expect("resolve");

        assert_eq!(app, "web");
        assert_eq!(releases, PathBuf::from("releases.json"));
    }

    #[test]
    fn resolve_source_requires_an_app() {
        let args = SourceArgs {
            app: None,
            releases: None,
            current: "x".into(),
        };
        assert!(resolve_source(&HistoryConfig::default(), &args).is_err());
    }

    #[tokio::test]
    async fn load_history_reads_release_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("releases.json");
        std::fs::write(
            &path,
            r#"{"web": [{"name": "apps/web/releases/2"}, {"name": "apps/web/releases/1"}]}"#,
        )
        .expect("write");

        let live = load_history("web", path).await;

        assert_eq!(live.releases().map(<[_]>::len), Some(2));
    }

    fn release_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("releases.json");
        std::fs::write(
            &path,
            r#"{"web": [
                {"name": "apps/web/releases/3", "artifacts": ["img:2"], "env": {"PORT": "81"}},
                {"name": "apps/web/releases/2", "artifacts": ["img:2"], "env": {"PORT": "80"}},
                {"name": "apps/web/releases/1", "artifacts": ["img:1"]}
            ]}"#,
        )
        .expect("write");
        path
    }

    fn source_args(app: &str, releases: PathBuf) -> SourceArgs {
        SourceArgs {
            app: Some(app.into()),
            releases: Some(releases),
            current: "apps/web/releases/3".into(),
        }
    }

    #[tokio::test]
    async fn show_renders_loaded_history() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = source_args("web", release_file(&dir));

        let result = cmd_show(
            &HistoryConfig::default(),
            &args,
            "?rhf=code&rhf=env",
            Some("apps/web/releases/1"),
            false,
            true,
        )
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn show_fails_when_history_cannot_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = source_args("api", release_file(&dir));

        let err = cmd_show(&HistoryConfig::default(), &args, "", None, false, false)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to load releases for api"));
        assert!(err.to_string().contains("application not found: api"));
    }

    #[tokio::test]
    async fn deploy_of_current_release_is_refused() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = source_args("web", release_file(&dir));

        let err = cmd_deploy(&HistoryConfig::default(), &args, "apps/web/releases/3", false)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "apps/web/releases/3 is already deployed");
    }

    #[tokio::test]
    async fn deploy_while_persisting_is_refused() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = source_args("web", release_file(&dir));

        let err = cmd_deploy(&HistoryConfig::default(), &args, "apps/web/releases/1", true)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "A deploy is already in progress");
    }

    #[tokio::test]
    async fn deploy_of_previous_release_succeeds() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = source_args("web", release_file(&dir));

        let result = cmd_deploy(
            &HistoryConfig::default(),
            &args,
            "apps/web/releases/1",
            false,
        )
        .await;

        assert!(result.is_ok());
    }

    #[test]
    fn deploy_request_serializes_release_and_predecessor() {
        let request = DeployRequest {
            app: "web".into(),
            release: "apps/web/releases/1".into(),
            replaces: "apps/web/releases/3".into(),
            requested_at: Utc::now(),
        };

        let value = serde_json::to_value(&request).expect("serialize");

        assert_eq!(value["app"], "web");
        assert_eq!(value["release"], "apps/web/releases/1");
        assert_eq!(value["replaces"], "apps/web/releases/3");
        assert!(value["requested_at"].is_string());
    }
}
