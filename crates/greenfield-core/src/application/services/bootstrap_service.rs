//! Bootstrap Service - main application orchestrator.
//!
//! This service runs the four pipeline stages in strict order:
//! 1. Workspace init — materialize the template at the repo directory
//! 2. Template rewrite — rename the source subdirectory, substitute tokens
//! 3. Repo init — fresh repository, initial commit, optional remote + push
//! 4. Env provision — isolated environment under the project directory
//!
//! Every stage is fail-fast and single-attempt. Completed stages are never
//! rolled back; the returned [`RunReport`] records what ran and, on failure,
//! which stage stopped the pipeline and why.

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{EnvManager, Filesystem, HostingApi, RepositorySpec, VersionControl},
    },
    domain::{
        BootstrapConfig, DomainError, ProjectPaths, RunReport, Stage, TemplateSource, TokenMap,
    },
    error::GreenfieldResult,
};

/// Message for the one commit every bootstrapped repository starts with.
const INITIAL_COMMIT_MESSAGE: &str = "init project template";

/// Name under which the hosted repository is registered.
const REMOTE_NAME: &str = "origin";

/// Refspec pushed after the remote is created; pushes whatever branch
/// `init` made the default without hard-coding its name.
const PUSH_BRANCH_SPEC: &str = "HEAD";

/// Version-control metadata purged after materialization so the new project
/// inherits no history.
const VCS_METADATA_DIR: &str = ".git";

/// Fixed location of the isolated environment, relative to the project dir.
const ENV_DIR_NAME: &str = ".venv";

/// Main bootstrap service.
///
/// Owns one adapter per external system and runs the pipeline against them.
pub struct BootstrapService {
    filesystem: Box<dyn Filesystem>,
    vcs: Box<dyn VersionControl>,
    hosting: Box<dyn HostingApi>,
    env: Box<dyn EnvManager>,
}

impl BootstrapService {
    /// Create a new bootstrap service with the given adapters.
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        vcs: Box<dyn VersionControl>,
        hosting: Box<dyn HostingApi>,
        env: Box<dyn EnvManager>,
    ) -> Self {
        Self {
            filesystem,
            vcs,
            hosting,
            env,
        }
    }

    /// Run the full pipeline.
    ///
    /// Stages run strictly in order; the first failure seals the report.
    /// Nothing that already completed is undone (a failed push leaves the
    /// local commit, a failed rewrite leaves a partially substituted tree).
    #[instrument(
        skip_all,
        fields(
            project = %config.project_name(),
            sync = config.sync_remote(),
            source = %source,
        )
    )]
    pub fn run(&self, config: &BootstrapConfig, source: &TemplateSource) -> RunReport {
        let paths = ProjectPaths::derive(config);
        let mut report = RunReport::new();

        info!(project_dir = %paths.project_dir.display(), "Bootstrap started");

        if let Err(e) = self.init_workspace(&paths, source) {
            return report.fail(Stage::WorkspaceInit, e);
        }
        report.complete(Stage::WorkspaceInit);

        if let Err(e) = self.rewrite_template(&paths, config, source) {
            return report.fail(Stage::TemplateRewrite, e);
        }
        report.complete(Stage::TemplateRewrite);

        if let Err(e) = self.init_repository(&paths, config) {
            return report.fail(Stage::RepoInit, e);
        }
        report.complete(Stage::RepoInit);

        if let Err(e) = self.provision_environment(&paths) {
            return report.fail(Stage::EnvProvision, e);
        }
        report.complete(Stage::EnvProvision);

        info!("Bootstrap completed successfully");
        report
    }

    // -------------------------------------------------------------------------
    // Stage 1: workspace init
    // -------------------------------------------------------------------------

    /// Materialize the template tree at `repo_dir`, free of inherited history.
    fn init_workspace(&self, paths: &ProjectPaths, source: &TemplateSource) -> GreenfieldResult<()> {
        // Refuse to touch an existing project; this check is also what keeps
        // two concurrent runs from sharing a target directory.
        if self.filesystem.exists(&paths.project_dir) {
            return Err(ApplicationError::ProjectDirExists {
                path: paths.project_dir.clone(),
            }
            .into());
        }
        self.filesystem.create_dir_new(&paths.project_dir)?;

        match source {
            TemplateSource::LocalPath(template_dir) => {
                debug!(template = %template_dir.display(), "Copying local template");
                self.filesystem.copy_tree(template_dir, &paths.repo_dir)?;
            }
            TemplateSource::RemoteRef { url, branch } => {
                debug!(url = %url, branch = %branch, "Cloning remote template");
                self.filesystem.create_dir_new(&paths.repo_dir)?;
                self.vcs.clone_branch(url, &paths.repo_dir, branch)?;
            }
        }

        // Purge the template's own history so the project starts clean.
        let metadata_dir = paths.repo_dir.join(VCS_METADATA_DIR);
        if self.filesystem.exists(&metadata_dir) {
            self.filesystem.remove_dir_all(&metadata_dir)?;
        } else {
            debug!("Template shipped without version-control metadata");
        }

        info!(repo_dir = %paths.repo_dir.display(), "Workspace materialized");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Stage 2: template rewrite
    // -------------------------------------------------------------------------

    /// Turn the generic template content into project-specific content,
    /// in place.
    fn rewrite_template(
        &self,
        paths: &ProjectPaths,
        config: &BootstrapConfig,
        source: &TemplateSource,
    ) -> GreenfieldResult<()> {
        let template_name = source.template_name()?;
        let tokens = TokenMap::derive(&template_name, config.project_name());

        // Step A: rename the template's source subdirectory.
        let template_src = paths.repo_dir.join(template_name.snake_case());
        if !self.filesystem.exists(&template_src) {
            return Err(ApplicationError::TemplateShapeMismatch {
                expected: template_name.snake_case(),
                repo_dir: paths.repo_dir.clone(),
            }
            .into());
        }
        let project_src = paths.repo_dir.join(config.project_name().snake_case());
        self.filesystem.rename(&template_src, &project_src)?;

        // Step B: substitute both token pairs in every file. No transaction
        // boundary: an I/O failure mid-walk leaves earlier files rewritten.
        let mut rewritten = 0usize;
        for file in self.filesystem.walk_files(&paths.repo_dir)? {
            let content = self.filesystem.read_file(&file)?;
            if let Some(updated) = tokens.apply(&content) {
                self.filesystem.write_file(&file, &updated)?;
                rewritten += 1;
            }
        }

        info!(
            files = rewritten,
            from = %template_name,
            to = %config.project_name(),
            "Template rewritten"
        );
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Stage 3: repo init
    // -------------------------------------------------------------------------

    /// Produce a committed local repository and, when requested, a
    /// synchronized remote counterpart.
    fn init_repository(&self, paths: &ProjectPaths, config: &BootstrapConfig) -> GreenfieldResult<()> {
        self.vcs.init(&paths.repo_dir)?;
        self.vcs.add_all(&paths.repo_dir)?;
        self.vcs.commit(&paths.repo_dir, INITIAL_COMMIT_MESSAGE)?;
        info!("Initial commit created");

        if !config.sync_remote() {
            return Ok(());
        }

        // Unreachable for configs built through the validated constructor;
        // kept as a guard for hand-rolled configs.
        let credentials = config
            .remote_credentials()
            .ok_or(DomainError::MissingCredentials)?;

        let spec = RepositorySpec::private(config.project_name().as_str());
        let created = self.hosting.create_repository(&spec, credentials)?;
        info!(remote = %created.clone_url, "Remote repository created");

        self.vcs
            .add_remote(&paths.repo_dir, REMOTE_NAME, &created.clone_url)?;
        self.vcs.push(&paths.repo_dir, REMOTE_NAME, PUSH_BRANCH_SPEC)?;
        info!("Initial commit pushed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Stage 4: env provision
    // -------------------------------------------------------------------------

    /// Create the isolated environment and bring its installer up to date.
    fn provision_environment(&self, paths: &ProjectPaths) -> GreenfieldResult<()> {
        let env_dir = paths.project_dir.join(ENV_DIR_NAME);
        self.env.create_env(&env_dir)?;
        self.env.upgrade_installer(&env_dir)?;
        info!(env_dir = %env_dir.display(), "Environment provisioned");
        Ok(())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use mockall::Sequence;

    use super::*;
    use crate::application::ports::output::{
        CreatedRepository, MockEnvManager, MockFilesystem, MockHostingApi, MockVersionControl,
    };
    use crate::domain::{ProjectName, RemoteCredentials};
    use crate::error::GreenfieldError;

    const ROOT: &str = "/home/sam/projects";
    const PROJECT_DIR: &str = "/home/sam/projects/my-widget";
    const REPO_DIR: &str = "/home/sam/projects/my-widget/my-widget";
    const TEMPLATE: &str = "/home/sam/repos/st-experiment-template";

    fn local_config() -> BootstrapConfig {
        BootstrapConfig::new(
            ProjectName::parse("my-widget").unwrap(),
            ROOT,
            false,
            None,
        )
        .unwrap()
    }

    fn sync_config() -> BootstrapConfig {
        BootstrapConfig::new(
            ProjectName::parse("my-widget").unwrap(),
            ROOT,
            true,
            Some(RemoteCredentials::new("sam", "token").unwrap()),
        )
        .unwrap()
    }

    fn local_source() -> TemplateSource {
        TemplateSource::LocalPath(TEMPLATE.into())
    }

    /// Filesystem mock for a clean local run over one template file.
    fn happy_filesystem() -> MockFilesystem {
        let mut fs = MockFilesystem::new();
        // project dir absent, template .git present, template src dir present
        fs.expect_exists()
            .returning(|path| path != Path::new(PROJECT_DIR));
        fs.expect_create_dir_new().times(1).returning(|_| Ok(()));
        fs.expect_copy_tree().times(1).returning(|_, _| Ok(()));
        fs.expect_remove_dir_all()
            .withf(|p| p == Path::new(REPO_DIR).join(".git"))
            .times(1)
            .returning(|_| Ok(()));
        fs.expect_rename()
            .withf(|from, to| {
                from == Path::new(REPO_DIR).join("st_experiment_template")
                    && to == Path::new(REPO_DIR).join("my_widget")
            })
            .times(1)
            .returning(|_, _| Ok(()));
        fs.expect_walk_files()
            .times(1)
            .returning(|_| Ok(vec![PathBuf::from(REPO_DIR).join("README.md")]));
        fs.expect_read_file()
            .returning(|_| Ok(b"# st-experiment-template".to_vec()));
        fs.expect_write_file()
            .withf(|_, content| content == b"# my-widget")
            .times(1)
            .returning(|_, _| Ok(()));
        fs
    }

    fn happy_vcs() -> MockVersionControl {
        let mut vcs = MockVersionControl::new();
        vcs.expect_init().times(1).returning(|_| Ok(()));
        vcs.expect_add_all().times(1).returning(|_| Ok(()));
        vcs.expect_commit()
            .withf(|_, message| message == "init project template")
            .times(1)
            .returning(|_, _| Ok(()));
        vcs
    }

    fn happy_env() -> MockEnvManager {
        let mut env = MockEnvManager::new();
        env.expect_create_env()
            .withf(|dir| dir == Path::new(PROJECT_DIR).join(".venv"))
            .times(1)
            .returning(|_| Ok(()));
        env.expect_upgrade_installer().times(1).returning(|_| Ok(()));
        env
    }

    fn service(
        fs: MockFilesystem,
        vcs: MockVersionControl,
        hosting: MockHostingApi,
        env: MockEnvManager,
    ) -> BootstrapService {
        BootstrapService::new(Box::new(fs), Box::new(vcs), Box::new(hosting), Box::new(env))
    }

    // ── happy paths ───────────────────────────────────────────────────────

    #[test]
    fn local_run_completes_all_stages_in_order() {
        let mut hosting = MockHostingApi::new();
        hosting.expect_create_repository().never();

        let svc = service(happy_filesystem(), happy_vcs(), hosting, happy_env());
        let report = svc.run(&local_config(), &local_source());

        assert!(report.is_success(), "failure: {:?}", report.failure());
        assert_eq!(report.completed(), &Stage::ALL);
    }

    #[test]
    fn sync_run_creates_remote_then_pushes() {
        let mut seq = Sequence::new();

        let mut vcs = MockVersionControl::new();
        vcs.expect_init().times(1).returning(|_| Ok(()));
        vcs.expect_add_all().times(1).returning(|_| Ok(()));
        vcs.expect_commit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));

        let mut hosting = MockHostingApi::new();
        hosting
            .expect_create_repository()
            .withf(|spec, creds| {
                spec.name == "my-widget"
                    && spec.private
                    && spec.has_issues
                    && spec.has_wiki
                    && creds.username() == "sam"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Ok(CreatedRepository {
                    clone_url: "https://github.com/sam/my-widget.git".into(),
                })
            });

        vcs.expect_add_remote()
            .withf(|_, name, url| name == "origin" && url.ends_with("my-widget.git"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        vcs.expect_push()
            .withf(|_, remote, spec| remote == "origin" && spec == "HEAD")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));

        let svc = service(happy_filesystem(), vcs, hosting, happy_env());
        let report = svc.run(&sync_config(), &local_source());

        assert!(report.is_success(), "failure: {:?}", report.failure());
    }

    #[test]
    fn remote_source_clones_instead_of_copying() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(|path| path != Path::new(PROJECT_DIR));
        // project dir + repo dir are both created before the clone
        fs.expect_create_dir_new().times(2).returning(|_| Ok(()));
        fs.expect_copy_tree().never();
        fs.expect_remove_dir_all().times(1).returning(|_| Ok(()));
        fs.expect_rename().times(1).returning(|_, _| Ok(()));
        fs.expect_walk_files().returning(|_| Ok(vec![]));

        let mut vcs = happy_vcs();
        vcs.expect_clone_branch()
            .withf(|url, dir, branch| {
                url == "https://github.com/sam/st-experiment-template.git"
                    && dir == Path::new(REPO_DIR)
                    && branch == "main"
            })
            .times(1)
            .returning(|_, _, _| Ok(()));
        vcs.expect_add_remote().returning(|_, _, _| Ok(()));
        vcs.expect_push().returning(|_, _, _| Ok(()));

        let mut hosting = MockHostingApi::new();
        hosting.expect_create_repository().times(1).returning(|_, _| {
            Ok(CreatedRepository {
                clone_url: "https://github.com/sam/my-widget.git".into(),
            })
        });

        let source = TemplateSource::RemoteRef {
            url: "https://github.com/sam/st-experiment-template.git".into(),
            branch: "main".into(),
        };
        let report = service(fs, vcs, hosting, happy_env()).run(&sync_config(), &source);

        assert!(report.is_success(), "failure: {:?}", report.failure());
    }

    // ── precondition failures ─────────────────────────────────────────────

    #[test]
    fn existing_project_dir_fails_before_any_side_effect() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .withf(|p| p == Path::new(PROJECT_DIR))
            .return_const(true);
        fs.expect_create_dir_new().never();
        fs.expect_copy_tree().never();

        let mut vcs = MockVersionControl::new();
        vcs.expect_init().never();

        let report = service(fs, vcs, MockHostingApi::new(), MockEnvManager::new())
            .run(&local_config(), &local_source());

        let failure = report.failure().unwrap();
        assert_eq!(failure.stage, Stage::WorkspaceInit);
        assert!(matches!(
            failure.error,
            GreenfieldError::Application(ApplicationError::ProjectDirExists { .. })
        ));
        assert!(report.completed().is_empty());
    }

    #[test]
    fn missing_template_subdirectory_is_a_shape_mismatch() {
        let mut fs = MockFilesystem::new();
        let template_src = Path::new(REPO_DIR).join("st_experiment_template");
        fs.expect_exists().returning(move |path| {
            // project dir absent, template .git present, source dir absent
            path != Path::new(PROJECT_DIR) && path != template_src
        });
        fs.expect_create_dir_new().returning(|_| Ok(()));
        fs.expect_copy_tree().returning(|_, _| Ok(()));
        fs.expect_remove_dir_all().returning(|_| Ok(()));
        fs.expect_rename().never();
        fs.expect_walk_files().never();

        let mut vcs = MockVersionControl::new();
        vcs.expect_init().never();

        let report = service(fs, vcs, MockHostingApi::new(), MockEnvManager::new())
            .run(&local_config(), &local_source());

        let failure = report.failure().unwrap();
        assert_eq!(failure.stage, Stage::TemplateRewrite);
        assert!(matches!(
            failure.error,
            GreenfieldError::Application(ApplicationError::TemplateShapeMismatch { .. })
        ));
        assert_eq!(report.completed(), &[Stage::WorkspaceInit]);
    }

    // ── external failures ─────────────────────────────────────────────────

    #[test]
    fn hosting_refusal_aborts_before_push_and_keeps_local_commit() {
        let mut vcs = MockVersionControl::new();
        vcs.expect_init().times(1).returning(|_| Ok(()));
        vcs.expect_add_all().times(1).returning(|_| Ok(()));
        // the commit still happens — local state is kept on hosting failure
        vcs.expect_commit().times(1).returning(|_, _| Ok(()));
        vcs.expect_add_remote().never();
        vcs.expect_push().never();

        let mut hosting = MockHostingApi::new();
        hosting.expect_create_repository().times(1).returning(|_, _| {
            Err(ApplicationError::HostingRefused {
                status: 422,
                body: r#"{"message":"name already exists on this account"}"#.into(),
            }
            .into())
        });

        let mut env = MockEnvManager::new();
        env.expect_create_env().never();

        let report =
            service(happy_filesystem(), vcs, hosting, env).run(&sync_config(), &local_source());

        let failure = report.failure().unwrap();
        assert_eq!(failure.stage, Stage::RepoInit);
        assert!(matches!(
            failure.error,
            GreenfieldError::Application(ApplicationError::HostingRefused { status: 422, .. })
        ));
        assert_eq!(
            report.completed(),
            &[Stage::WorkspaceInit, Stage::TemplateRewrite]
        );
    }

    #[test]
    fn env_failure_is_reported_after_the_project_exists() {
        let mut env = MockEnvManager::new();
        env.expect_create_env().times(1).returning(|_| {
            Err(ApplicationError::Environment {
                reason: "python3 not found".into(),
            }
            .into())
        });
        env.expect_upgrade_installer().never();

        let mut hosting = MockHostingApi::new();
        hosting.expect_create_repository().never();

        let report =
            service(happy_filesystem(), happy_vcs(), hosting, env).run(&local_config(), &local_source());

        let failure = report.failure().unwrap();
        assert_eq!(failure.stage, Stage::EnvProvision);
        assert_eq!(
            report.completed(),
            &[Stage::WorkspaceInit, Stage::TemplateRewrite, Stage::RepoInit]
        );
    }
}
