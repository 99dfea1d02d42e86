//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "greenfield",
    bin_name = "greenfield",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f331} Bootstrap a project from your template",
    long_about = "Greenfield turns a template checkout into a fresh project: \
                  copied or cloned, renamed, committed, optionally pushed to a \
                  newly created remote, with its own virtual environment.",
    after_help = "EXAMPLES:\n\
        \x20 greenfield new my-widget\n\
        \x20 greenfield new my-widget --dir ~/Projects --template ~/Repos/st-experiment-template\n\
        \x20 greenfield new my-widget --sync --user sam --token $GITHUB_TOKEN\n\
        \x20 greenfield completions zsh > ~/.zfunc/_greenfield",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Bootstrap a new project from the template.
    #[command(
        visible_alias = "n",
        about = "Create a new project from the template",
        after_help = "EXAMPLES:\n\
            \x20 greenfield new my-widget\n\
            \x20 greenfield new my-widget --dir ~/Projects\n\
            \x20 greenfield new my-widget --sync --branch main\n\
            \x20 greenfield new my-widget --no-env --yes"
    )]
    New(NewArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 greenfield completions bash > ~/.local/share/bash-completion/completions/greenfield\n\
            \x20 greenfield completions zsh  > ~/.zfunc/_greenfield\n\
            \x20 greenfield completions fish > ~/.config/fish/completions/greenfield.fish"
    )]
    Completions(CompletionsArgs),
}

// ── new ───────────────────────────────────────────────────────────────────────

/// Arguments for `greenfield new`.
#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name: lowercase, hyphen-separated.
    #[arg(value_name = "NAME", help = "Project name (use hyphens as separator)")]
    pub name: String,

    /// Directory the project is created under.
    #[arg(
        short = 'd',
        long = "dir",
        value_name = "DIR",
        help = "Projects root directory (default: configured root, else CWD)"
    )]
    pub dir: Option<PathBuf>,

    /// Clone the remote template and push the new project to a freshly
    /// created remote repository.
    #[arg(long = "sync", help = "Use the remote template and push the new project")]
    pub sync: bool,

    /// Hosting account used with `--sync`.
    #[arg(
        long = "user",
        value_name = "ACCOUNT",
        env = "GREENFIELD_HOSTING_USER",
        help = "Hosting account name (for --sync)"
    )]
    pub user: Option<String>,

    /// Hosting API token used with `--sync`.
    #[arg(
        long = "token",
        value_name = "TOKEN",
        env = "GREENFIELD_HOSTING_TOKEN",
        hide_env_values = true,
        help = "Hosting API token (for --sync)"
    )]
    pub token: Option<String>,

    /// Local template directory (ignored with `--sync`).
    #[arg(
        long = "template",
        value_name = "PATH",
        help = "Local template directory"
    )]
    pub template: Option<PathBuf>,

    /// Remote template branch (only with `--sync`).
    #[arg(
        long = "branch",
        value_name = "BRANCH",
        help = "Template branch to clone (with --sync)"
    )]
    pub branch: Option<String>,

    /// Skip the confirmation prompt.
    #[arg(
        short = 'y',
        long = "yes",
        help = "Skip confirmation and create immediately"
    )]
    pub yes: bool,

    /// Preview the run without touching anything.
    #[arg(long = "dry-run", help = "Show what would be done without doing it")]
    pub dry_run: bool,

    /// Skip environment provisioning (stage 4).
    #[arg(long = "no-env", help = "Skip virtual-environment provisioning")]
    pub no_env: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `greenfield completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── tests ─────────────────────────────────────────────────────────────────────
