//! Implementation of the `greenfield new` command.
//!
//! Responsibility: translate CLI arguments and configuration into a validated
//! `BootstrapConfig` + `TemplateSource`, wire up the real adapters, call the
//! core bootstrap service, and display results. No business logic lives here.
//!
//! Environment and config-file lookups all happen in this file — the core
//! stages never read the process environment.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};
use url::Url;

use greenfield_adapters::{GitCli, GithubHosting, LocalFilesystem, NullEnv, VenvManager};
use greenfield_core::{
    application::{BootstrapService, ports::EnvManager},
    domain::{
        BootstrapConfig, DomainError, ProjectName, ProjectPaths, RemoteCredentials, RunReport,
        Stage, TemplateSource,
    },
    error::GreenfieldError,
};

use crate::{
    cli::{NewArgs, OutputFormat, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Execute the `greenfield new` command.
///
/// Dispatch sequence:
/// 1. Validate the project name and resolve the projects root
/// 2. Resolve credentials and build the `BootstrapConfig` (rejects
///    `--sync` without credentials before anything is touched)
/// 3. Resolve the template source for this mode
/// 4. Confirm with user unless `--yes` or `--quiet`; early-exit on `--dry-run`
/// 5. Run the pipeline via `BootstrapService`
/// 6. Render the stage report and map a failure to an exit code
#[instrument(skip_all, fields(project = %args.name, sync = args.sync))]
pub fn execute(
    args: NewArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Name + roots
    let project_name = ProjectName::parse(args.name.as_str()).map_err(GreenfieldError::from)?;
    let root_dir = resolve_root_dir(args.dir.as_deref(), &config)?;

    // 2. Credentials are resolved here, once; the core never reads the
    //    environment. The constructor enforces sync ⇒ credentials.
    let credentials = resolve_credentials(&args, &config).map_err(GreenfieldError::from)?;
    let bootstrap =
        BootstrapConfig::new(project_name, root_dir, args.sync, credentials)
            .map_err(GreenfieldError::from)?;

    // 3. Template source
    let source = resolve_template_source(&args, &config)?;

    let paths = ProjectPaths::derive(&bootstrap);
    debug!(
        project_dir = %paths.project_dir.display(),
        source = %source,
        "Run resolved"
    );

    // 4. Show configuration and confirm
    if !global.quiet && !args.yes {
        show_plan(&bootstrap, &source, &paths, &output)?;
        if !confirm()? {
            return Err(CliError::Cancelled);
        }
    }

    if args.dry_run {
        output.info(&format!(
            "Dry run: would bootstrap '{}' at {}",
            bootstrap.project_name(),
            paths.project_dir.display(),
        ))?;
        output.info(&format!("  Template:  {source}"))?;
        output.info(&format!("  Sync:      {}", bootstrap.sync_remote()))?;
        output.info(&format!("  Venv:      {}", !args.no_env))?;
        return Ok(());
    }

    // 5. Wire adapters and run
    let api_url = Url::parse(&config.hosting.api_url).map_err(|e| CliError::ConfigError {
        message: format!("invalid hosting.api_url '{}'", config.hosting.api_url),
        source: Some(Box::new(e)),
    })?;
    let hosting = Box::new(GithubHosting::new(api_url)?);
    let env: Box<dyn EnvManager> = if args.no_env {
        Box::new(NullEnv)
    } else {
        Box::new(VenvManager::new(&config.environment.python))
    };
    let service = BootstrapService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(GitCli::new()),
        hosting,
        env,
    );

    output.header(&format!("Bootstrapping '{}'...", bootstrap.project_name()))?;
    info!(project = %bootstrap.project_name(), "Bootstrap started");

    let report = service.run(&bootstrap, &source);

    // 6. Report + exit-code mapping
    render_report(&report, &output)?;

    match report.into_failure() {
        None => {
            output.success(&format!("Project '{}' created!", bootstrap.project_name()))?;
            if !global.quiet {
                output.print("")?;
                output.print("Next steps:")?;
                output.print(&format!(
                    "  cd {}",
                    paths.repo_dir.display()
                ))?;
                if !args.no_env {
                    output.print(&format!(
                        "  source {}/.venv/bin/activate",
                        paths.project_dir.display()
                    ))?;
                }
            }
            Ok(())
        }
        Some(failure) => Err(CliError::StageFailed {
            stage: failure.stage,
            source: failure.error,
        }),
    }
}

// ── Resolution helpers ────────────────────────────────────────────────────────

/// Projects root: flag > config > current directory, always absolute.
fn resolve_root_dir(flag: Option<&Path>, config: &AppConfig) -> CliResult<PathBuf> {
    let chosen = flag
        .map(Path::to_path_buf)
        .or_else(|| config.projects.root_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    absolutize(chosen)
}

fn absolutize(path: PathBuf) -> CliResult<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().map_err(|e| CliError::IoError {
        message: "cannot determine current directory".into(),
        source: e,
    })?;
    if path.as_os_str() == "." {
        return Ok(cwd);
    }
    Ok(cwd.join(path))
}

/// Credentials: flags (which clap already fills from `GREENFIELD_HOSTING_*`)
/// win over config-file values. Returns `None` when either half is missing;
/// `BootstrapConfig::new` turns that into an error iff `--sync` was asked.
fn resolve_credentials(
    args: &NewArgs,
    config: &AppConfig,
) -> Result<Option<RemoteCredentials>, DomainError> {
    let username = args.user.clone().or_else(|| config.hosting.username.clone());
    let token = args.token.clone().or_else(|| config.hosting.token.clone());
    match (username, token) {
        (Some(username), Some(token)) => RemoteCredentials::new(username, token).map(Some),
        _ => Ok(None),
    }
}

/// Pick the template source for this mode.
fn resolve_template_source(args: &NewArgs, config: &AppConfig) -> CliResult<TemplateSource> {
    if args.sync {
        let url = config
            .template
            .remote_url
            .clone()
            .ok_or_else(|| CliError::ConfigError {
                message: "template.remote_url is not configured (required for --sync)".into(),
                source: None,
            })?;
        let branch = args
            .branch
            .clone()
            .unwrap_or_else(|| config.template.branch.clone());
        return Ok(TemplateSource::RemoteRef { url, branch });
    }

    let path = args
        .template
        .clone()
        .or_else(|| config.template.local_path.clone())
        .ok_or_else(|| CliError::ConfigError {
            message: "no local template configured (pass --template or set template.local_path)"
                .into(),
            source: None,
        })?;
    let path = absolutize(path)?;
    if !path.is_dir() {
        return Err(CliError::TemplateNotFound { path });
    }
    Ok(TemplateSource::LocalPath(path))
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn show_plan(
    config: &BootstrapConfig,
    source: &TemplateSource,
    paths: &ProjectPaths,
    out: &OutputManager,
) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Project:   {}", config.project_name()))?;
    out.print(&format!("  Location:  {}", paths.project_dir.display()))?;
    out.print(&format!("  Template:  {source}"))?;
    out.print(&format!(
        "  Remote:    {}",
        if config.sync_remote() {
            "create and push"
        } else {
            "local only"
        }
    ))?;
    out.print("")?;
    Ok(())
}

fn confirm() -> CliResult<bool> {
    use std::io::{self, Write};

    print!("Continue? [Y/n] ");
    io::stdout().flush().map_err(|e| CliError::IoError {
        message: "failed to flush stdout".into(),
        source: e,
    })?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| CliError::IoError {
            message: "failed to read confirmation input".into(),
            source: e,
        })?;

    let input = input.trim().to_ascii_lowercase();
    Ok(input.is_empty() || input == "y" || input == "yes")
}

/// One line per finished stage; JSON when asked for it.
fn render_report(report: &RunReport, out: &OutputManager) -> CliResult<()> {
    if out.format() == OutputFormat::Json {
        let rendered = serde_json::json!({
            "success": report.is_success(),
            "completed": report.completed(),
            "failure": report.failure().map(|f| serde_json::json!({
                "stage": f.stage,
                "error": f.error.to_string(),
            })),
        });
        out.print(&rendered.to_string())?;
        return Ok(());
    }

    for stage in report.completed() {
        out.success(stage_blurb(*stage))?;
    }
    Ok(())
}

fn stage_blurb(stage: Stage) -> &'static str {
    match stage {
        Stage::WorkspaceInit => "Workspace materialized",
        Stage::TemplateRewrite => "Template rewritten",
        Stage::RepoInit => "Repository initialized",
        Stage::EnvProvision => "Environment provisioned",
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
