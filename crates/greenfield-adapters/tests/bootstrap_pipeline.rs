//! Pipeline integration tests against the in-memory filesystem.
//!
//! These run the whole orchestrator without touching disk, git, or the
//! network: the filesystem is `MemoryFilesystem`, the other ports are
//! recording stubs.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use greenfield_adapters::MemoryFilesystem;
use greenfield_core::{
    application::{
        ApplicationError, BootstrapService,
        ports::{CreatedRepository, EnvManager, Filesystem, HostingApi, RepositorySpec, VersionControl},
    },
    domain::{
        BootstrapConfig, ProjectName, RemoteCredentials, Stage, TemplateSource,
    },
    error::GreenfieldResult,
};

// ── recording stubs ───────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct RecordingVcs {
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingVcs {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl VersionControl for RecordingVcs {
    fn clone_branch(&self, url: &str, _dir: &Path, branch: &str) -> GreenfieldResult<()> {
        self.record(format!("clone {url} {branch}"));
        Ok(())
    }

    fn init(&self, _dir: &Path) -> GreenfieldResult<()> {
        self.record("init");
        Ok(())
    }

    fn add_all(&self, _dir: &Path) -> GreenfieldResult<()> {
        self.record("add-all");
        Ok(())
    }

    fn commit(&self, _dir: &Path, message: &str) -> GreenfieldResult<()> {
        self.record(format!("commit {message}"));
        Ok(())
    }

    fn add_remote(&self, _dir: &Path, name: &str, url: &str) -> GreenfieldResult<()> {
        self.record(format!("add-remote {name} {url}"));
        Ok(())
    }

    fn push(&self, _dir: &Path, remote: &str, branch_spec: &str) -> GreenfieldResult<()> {
        self.record(format!("push {remote} {branch_spec}"));
        Ok(())
    }
}

#[derive(Clone)]
struct StubHosting {
    refuse_with: Option<u16>,
}

impl HostingApi for StubHosting {
    fn create_repository(
        &self,
        spec: &RepositorySpec,
        _credentials: &RemoteCredentials,
    ) -> GreenfieldResult<CreatedRepository> {
        match self.refuse_with {
            Some(status) => Err(ApplicationError::HostingRefused {
                status,
                body: "stubbed refusal".into(),
            }
            .into()),
            None => Ok(CreatedRepository {
                clone_url: format!("https://github.com/sam/{}.git", spec.name),
            }),
        }
    }
}

#[derive(Clone, Default)]
struct RecordingEnv {
    created: Arc<Mutex<Vec<PathBuf>>>,
}

impl EnvManager for RecordingEnv {
    fn create_env(&self, env_dir: &Path) -> GreenfieldResult<()> {
        self.created.lock().unwrap().push(env_dir.to_path_buf());
        Ok(())
    }

    fn upgrade_installer(&self, _env_dir: &Path) -> GreenfieldResult<()> {
        Ok(())
    }
}

// ── fixtures ──────────────────────────────────────────────────────────────────

const TEMPLATE_DIR: &str = "/repos/st-experiment-template";

/// Seed the template the way the real one ships: hyphen-named root, snake
/// source dir, token references spread across files, and its own history.
fn seed_template(fs: &MemoryFilesystem) {
    fs.add_file(
        format!("{TEMPLATE_DIR}/README.md"),
        "# st-experiment-template\n\nUsage: import st_experiment_template\n",
    );
    fs.add_file(
        format!("{TEMPLATE_DIR}/setup.py"),
        "setup(name='st-experiment-template', packages=['st_experiment_template'])\n",
    );
    fs.add_file(
        format!("{TEMPLATE_DIR}/st_experiment_template/__init__.py"),
        "\"\"\"st_experiment_template package.\"\"\"\n",
    );
    fs.add_file(
        format!("{TEMPLATE_DIR}/st_experiment_template/main.py"),
        "from st_experiment_template import config\n",
    );
    fs.add_file(format!("{TEMPLATE_DIR}/.git/HEAD"), "ref: refs/heads/main\n");
    fs.add_file(format!("{TEMPLATE_DIR}/.git/config"), "[core]\n");
}

fn config(sync: bool) -> BootstrapConfig {
    let credentials = sync.then(|| RemoteCredentials::new("sam", "token").unwrap());
    BootstrapConfig::new(
        ProjectName::parse("my-widget").unwrap(),
        "/projects",
        sync,
        credentials,
    )
    .unwrap()
}

fn service(fs: &MemoryFilesystem, vcs: &RecordingVcs, hosting: StubHosting, env: &RecordingEnv) -> BootstrapService {
    BootstrapService::new(
        Box::new(fs.clone()),
        Box::new(vcs.clone()),
        Box::new(hosting),
        Box::new(env.clone()),
    )
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[test]
fn local_bootstrap_scrubs_every_template_token() {
    let fs = MemoryFilesystem::new();
    seed_template(&fs);
    let vcs = RecordingVcs::default();
    let env = RecordingEnv::default();

    let report = service(&fs, &vcs, StubHosting { refuse_with: None }, &env).run(
        &config(false),
        &TemplateSource::LocalPath(TEMPLATE_DIR.into()),
    );

    assert!(report.is_success(), "failure: {:?}", report.failure());
    assert_eq!(report.completed(), &Stage::ALL);

    let repo = Path::new("/projects/my-widget/my-widget");

    // inherited history purged, source dir renamed
    assert!(!fs.exists(&repo.join(".git")));
    assert!(!fs.exists(&repo.join("st_experiment_template")));
    assert!(fs.exists(&repo.join("my_widget")));

    // no leftover tokens anywhere, new tokens present
    for file in fs.list_files() {
        if !file.starts_with(repo) {
            continue;
        }
        let content = String::from_utf8(fs.file_bytes(&file).unwrap()).unwrap();
        assert!(
            !content.contains("st_experiment_template") && !content.contains("st-experiment-template"),
            "leftover token in {}",
            file.display()
        );
    }
    let readme = String::from_utf8(fs.file_bytes(&repo.join("README.md")).unwrap()).unwrap();
    assert!(readme.contains("# my-widget"));
    assert!(readme.contains("import my_widget"));

    // local mode: one init/add/commit, no remote traffic
    assert_eq!(
        vcs.calls(),
        vec!["init", "add-all", "commit init project template"]
    );

    // environment rooted under the project dir
    assert_eq!(
        env.created.lock().unwrap().clone(),
        vec![PathBuf::from("/projects/my-widget/.venv")]
    );

    // the template itself was not modified
    let template_readme =
        String::from_utf8(fs.file_bytes(Path::new("/repos/st-experiment-template/README.md")).unwrap())
            .unwrap();
    assert!(template_readme.contains("st-experiment-template"));
}

#[test]
fn sync_bootstrap_registers_and_pushes_the_created_remote() {
    let fs = MemoryFilesystem::new();
    seed_template(&fs);
    let vcs = RecordingVcs::default();
    let env = RecordingEnv::default();

    let report = service(&fs, &vcs, StubHosting { refuse_with: None }, &env).run(
        &config(true),
        &TemplateSource::LocalPath(TEMPLATE_DIR.into()),
    );

    assert!(report.is_success(), "failure: {:?}", report.failure());
    assert_eq!(
        vcs.calls(),
        vec![
            "init",
            "add-all",
            "commit init project template",
            "add-remote origin https://github.com/sam/my-widget.git",
            "push origin HEAD",
        ]
    );
}

#[test]
fn hosting_refusal_stops_the_pipeline_after_the_commit() {
    let fs = MemoryFilesystem::new();
    seed_template(&fs);
    let vcs = RecordingVcs::default();
    let env = RecordingEnv::default();

    let report = service(&fs, &vcs, StubHosting { refuse_with: Some(422) }, &env).run(
        &config(true),
        &TemplateSource::LocalPath(TEMPLATE_DIR.into()),
    );

    let failure = report.failure().expect("run should fail");
    assert_eq!(failure.stage, Stage::RepoInit);

    // local commit exists, nothing was pushed, no environment was created
    assert_eq!(
        vcs.calls(),
        vec!["init", "add-all", "commit init project template"]
    );
    assert!(env.created.lock().unwrap().is_empty());
}

#[test]
fn second_run_into_the_same_project_dir_fails_untouched() {
    let fs = MemoryFilesystem::new();
    seed_template(&fs);
    let vcs = RecordingVcs::default();
    let env = RecordingEnv::default();
    let source = TemplateSource::LocalPath(TEMPLATE_DIR.into());

    let first = service(&fs, &vcs, StubHosting { refuse_with: None }, &env)
        .run(&config(false), &source);
    assert!(first.is_success());
    let files_after_first = fs.list_files();

    let second = service(&fs, &vcs, StubHosting { refuse_with: None }, &env)
        .run(&config(false), &source);

    let failure = second.into_failure().expect("second run must fail");
    assert_eq!(failure.stage, Stage::WorkspaceInit);
    assert_eq!(fs.list_files(), files_after_first, "first run's output was modified");
}
