use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, info};

use lvc_chain::Commit;
use lvc_index::WorkdirStatus;
use lvc_store::{FsObjectStore, ObjectStore};
use lvc_types::ObjectId;

use crate::codec::codec_for;
use crate::config::RepoConfig;
use crate::error::{SdkError, SdkResult};
use crate::ops;
use crate::persist::{FsStateStore, StateStore};
use crate::state::RepositoryState;
use crate::worktree::Worktree;

pub const CONFIG_FILE: &str = "config.toml";
pub const STATE_FILE: &str = "state";
pub const BLOBS_DIR: &str = "blobs";

/// High-level lvc repository API.
///
/// Every command method is one load, transition, save cycle over the
/// persisted [`RepositoryState`].
pub struct Lvc {
    worktree: Worktree,
    config: RepoConfig,
    states: Box<dyn StateStore>,
    objects: Box<dyn ObjectStore>,
}

impl Lvc {
    /// Create (or re-create) a repository in `root`.
    ///
    /// Any previous state is replaced by a fresh root commit. Existing blobs
    /// and an existing config file are kept.
    pub fn init(root: impl Into<PathBuf>) -> SdkResult<Self> {
        let worktree = Worktree::new(root);
        let meta = worktree.metadata_dir();
        fs::create_dir_all(&meta)?;

        let config_path = meta.join(CONFIG_FILE);
        let config = RepoConfig::load(&config_path)?;
        if !config_path.exists() {
            config.save(&config_path)?;
        }

        let repo = Self::assemble(worktree, config)?;
        let state = RepositoryState::new(&repo.config.user.name, Utc::now());
        repo.states.save(&state)?;
        info!(root = %repo.worktree.root().display(), head = %state.head.short_hex(), "initialized repository");
        Ok(repo)
    }

    /// Open the repository in `root`.
    pub fn open(root: impl Into<PathBuf>) -> SdkResult<Self> {
        let worktree = Worktree::new(root);
        let meta = worktree.metadata_dir();
        if !meta.is_dir() {
            return Err(SdkError::NotInitialized(meta));
        }
        let config = RepoConfig::load(&meta.join(CONFIG_FILE))?;
        let repo = Self::assemble(worktree, config)?;
        if !repo.states.exists() {
            return Err(SdkError::NotInitialized(meta.join(STATE_FILE)));
        }
        Ok(repo)
    }

    /// Build a repository from explicit parts, e.g. in-memory stores.
    pub fn from_parts(
        worktree: Worktree,
        config: RepoConfig,
        states: Box<dyn StateStore>,
        objects: Box<dyn ObjectStore>,
    ) -> Self {
        Self {
            worktree,
            config,
            states,
            objects,
        }
    }

    fn assemble(worktree: Worktree, config: RepoConfig) -> SdkResult<Self> {
        let meta = worktree.metadata_dir();
        let objects = FsObjectStore::open(meta.join(BLOBS_DIR))?;
        let states = FsStateStore::new(meta.join(STATE_FILE), codec_for(config.storage.codec));
        Ok(Self::from_parts(worktree, config, Box::new(states), Box::new(objects)))
    }

    pub fn root(&self) -> &Path {
        self.worktree.root()
    }

    pub fn config(&self) -> &RepoConfig {
        &self.config
    }

    pub fn worktree(&self) -> &Worktree {
        &self.worktree
    }

    pub fn objects(&self) -> &dyn ObjectStore {
        self.objects.as_ref()
    }

    /// The currently persisted state.
    pub fn state(&self) -> SdkResult<RepositoryState> {
        self.states.load()
    }

    fn tip_name(&self) -> &str {
        &self.config.history.tip
    }

    /// Load, apply `op`, and save only if it succeeded.
    fn transact<T>(&self, op: impl FnOnce(&mut RepositoryState) -> SdkResult<T>) -> SdkResult<T> {
        let mut state = self.states.load()?;
        let value = op(&mut state)?;
        self.states.save(&state)?;
        Ok(value)
    }

    // ---- Staging ----

    /// Stage files. Paths staged before a failing one are still saved.
    pub fn add<S: AsRef<str>>(&self, paths: &[S]) -> SdkResult<Vec<String>> {
        let mut state = self.states.load()?;
        let result = ops::add(&mut state, &self.worktree, self.objects.as_ref(), paths);
        if let Err(e) = &result {
            debug!(error = %e, "saving paths staged before the failure");
        }
        self.states.save(&state)?;
        result
    }

    pub fn remove<S: AsRef<str>>(&self, paths: &[S]) -> SdkResult<Vec<String>> {
        self.transact(|state| ops::remove(state, &self.worktree, paths))
    }

    // ---- History ----

    pub fn commit(&self, message: &str) -> SdkResult<ObjectId> {
        let author = self.config.user.name.as_str();
        self.transact(|state| ops::commit(state, message, author, Utc::now()))
    }

    pub fn checkout(&self, revision: &str) -> SdkResult<ObjectId> {
        self.transact(|state| {
            ops::checkout_revision(state, &self.worktree, self.objects.as_ref(), revision, self.tip_name())
        })
    }

    pub fn checkout_paths<S: AsRef<str>>(&self, paths: &[S]) -> SdkResult<Vec<String>> {
        self.transact(|state| ops::checkout_paths(state, &self.worktree, self.objects.as_ref(), paths))
    }

    pub fn reset(&self, revision: &str) -> SdkResult<ObjectId> {
        self.transact(|state| {
            ops::reset(state, &self.worktree, self.objects.as_ref(), revision, self.tip_name())
        })
    }

    // ---- Queries ----

    pub fn log(&self, revision: Option<&str>) -> SdkResult<Vec<Commit>> {
        let state = self.states.load()?;
        ops::log(&state, revision, self.tip_name())
    }

    pub fn status(&self) -> SdkResult<WorkdirStatus> {
        let state = self.states.load()?;
        ops::status(&state, &self.worktree)
    }

    /// Hash of the commit `revision` names, e.g. `HEAD~2`.
    pub fn resolve(&self, revision: &str) -> SdkResult<ObjectId> {
        let state = self.states.load()?;
        ops::resolve(&state, revision, self.tip_name())
    }

    pub fn head(&self) -> SdkResult<Commit> {
        let state = self.states.load()?;
        state.head_commit().cloned()
    }

    pub fn is_detached(&self) -> SdkResult<bool> {
        self.states.load()?.is_detached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecKind;
    use crate::persist::InMemoryStateStore;
    use lvc_store::InMemoryObjectStore;

    #[test]
    fn init_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Lvc::init(dir.path()).unwrap();
        let meta = dir.path().join(".lvc");
        assert!(meta.join(STATE_FILE).is_file());
        assert!(meta.join(CONFIG_FILE).is_file());
        assert!(meta.join(BLOBS_DIR).is_dir());

        let head = repo.head().unwrap();
        assert!(head.is_root());
        assert_eq!(head.author(), "Test user");
        assert_eq!(repo.log(None).unwrap().len(), 1);
    }

    #[test]
    fn open_requires_init() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(Lvc::open(dir.path()), Err(SdkError::NotInitialized(_))));
        Lvc::init(dir.path()).unwrap();
        assert!(Lvc::open(dir.path()).is_ok());
    }

    #[test]
    fn reinit_starts_fresh_history() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Lvc::init(dir.path()).unwrap();
        repo.commit("one").unwrap();
        let repo = Lvc::init(dir.path()).unwrap();
        assert_eq!(repo.log(None).unwrap().len(), 1);
    }

    #[test]
    fn init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let meta = dir.path().join(".lvc");
        fs::create_dir_all(&meta).unwrap();
        fs::write(meta.join(CONFIG_FILE), "[user]\nname = \"alice\"\n[storage]\ncodec = \"bincode\"\n").unwrap();

        let repo = Lvc::init(dir.path()).unwrap();
        assert_eq!(repo.config().storage.codec, CodecKind::Bincode);
        assert_eq!(repo.head().unwrap().author(), "alice");
        let id = repo.commit("by alice").unwrap();
        assert_eq!(Lvc::open(dir.path()).unwrap().head().unwrap().hash(), id);
    }

    #[test]
    fn failed_command_does_not_save() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Lvc::init(dir.path()).unwrap();
        let before = repo.state().unwrap();
        assert!(repo.checkout("HEAD~5").is_err());
        assert_eq!(repo.state().unwrap(), before);
    }

    #[test]
    fn add_saves_partial_progress() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Lvc::init(dir.path()).unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        assert!(matches!(
            repo.add(&["a.txt", "missing.txt"]),
            Err(SdkError::FileNotFound { .. })
        ));
        assert!(repo.state().unwrap().staging.is_added("a.txt"));
    }

    #[test]
    fn custom_tip_name() {
        let dir = tempfile::tempdir().unwrap();
        let meta = dir.path().join(".lvc");
        fs::create_dir_all(&meta).unwrap();
        fs::write(meta.join(CONFIG_FILE), "[history]\ntip = \"trunk\"\n").unwrap();
        let repo = Lvc::init(dir.path()).unwrap();
        let id = repo.commit("one").unwrap();
        repo.checkout("HEAD~1").unwrap();
        assert!(repo.is_detached().unwrap());
        assert_eq!(repo.resolve("trunk").unwrap(), id);
        assert!(matches!(repo.resolve("master"), Err(SdkError::UnknownRevision(_))));
    }

    #[test]
    fn in_memory_parts() {
        let dir = tempfile::tempdir().unwrap();
        let states = InMemoryStateStore::new();
        states.save(&RepositoryState::new("mem", Utc::now())).unwrap();
        let repo = Lvc::from_parts(
            Worktree::new(dir.path()),
            RepoConfig::default(),
            Box::new(states),
            Box::new(InMemoryObjectStore::new()),
        );
        fs::write(dir.path().join("f.txt"), "x").unwrap();
        repo.add(&["f.txt"]).unwrap();
        let id = repo.commit("mem commit").unwrap();
        assert_eq!(repo.head().unwrap().hash(), id);
        assert!(repo.objects().contains(&ObjectId::from_bytes(b"x")).unwrap());
        // nothing written under the working directory besides the file itself
        assert!(!dir.path().join(".lvc").exists());
    }
}
