//! State transitions behind each command.
//!
//! Every function here takes the loaded [`RepositoryState`] by mutable
//! reference and touches nothing but that state, the working tree and the
//! object store it is given. Loading and saving is the caller's job (see
//! [`Lvc`](crate::Lvc)); a transition that returns an error leaves the state
//! in an unspecified intermediate form that should not be saved, except for
//! [`add`], whose earlier paths stay staged.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use lvc_chain::{Commit, Revision};
use lvc_index::{FileStatus, StatusEntry, WorkdirStatus};
use lvc_store::ObjectStore;
use lvc_types::ObjectId;

use crate::error::{SdkError, SdkResult};
use crate::state::RepositoryState;
use crate::worktree::Worktree;

/// Token separating `checkout` options from paths.
pub const PATH_SEPARATOR: &str = "--";

/// Fail with `HeadDetached` if head records a successor.
pub fn ensure_attached(state: &RepositoryState, command: &'static str) -> SdkResult<()> {
    if state.is_detached()? {
        return Err(SdkError::HeadDetached(command));
    }
    Ok(())
}

/// Resolve a revision specifier against head.
pub fn resolve(state: &RepositoryState, rev: &str, tip_name: &str) -> SdkResult<ObjectId> {
    let revision = Revision::parse(rev, tip_name)?;
    let commit = state.chain.resolve(&state.head, &revision)?;
    Ok(commit.hash())
}

/// Store each file's content and stage it.
///
/// Stops at the first unreadable path; the paths before it remain staged.
pub fn add<S: AsRef<str>>(
    state: &mut RepositoryState,
    worktree: &Worktree,
    objects: &dyn ObjectStore,
    paths: &[S],
) -> SdkResult<Vec<String>> {
    ensure_attached(state, "add")?;
    let mut staged = Vec::with_capacity(paths.len());
    for path in paths {
        let rel = worktree.normalize(path.as_ref())?;
        let data = worktree
            .read(&rel)
            .map_err(|source| SdkError::FileNotFound {
                path: rel.clone(),
                source,
            })?;
        let id = objects.store(&data)?;
        state.staging.stage_add(&rel, id)?;
        debug!(path = %rel, id = %id.short_hex(), "staged addition");
        staged.push(rel);
    }
    Ok(staged)
}

/// Stage deletions. The files may be missing or untracked.
pub fn remove<S: AsRef<str>>(
    state: &mut RepositoryState,
    worktree: &Worktree,
    paths: &[S],
) -> SdkResult<Vec<String>> {
    ensure_attached(state, "rm")?;
    let mut removed = Vec::with_capacity(paths.len());
    for path in paths {
        let rel = worktree.normalize(path.as_ref())?;
        state.staging.stage_delete(&rel)?;
        debug!(path = %rel, "staged deletion");
        removed.push(rel);
    }
    Ok(removed)
}

/// Record the staged changes as a child of head and move head to it.
pub fn commit(
    state: &mut RepositoryState,
    message: &str,
    author: &str,
    now: DateTime<Utc>,
) -> SdkResult<ObjectId> {
    ensure_attached(state, "commit")?;
    let parent = state.head_commit()?;
    let child = Commit::child(message, author, now, parent, &state.staging);
    let id = state.chain.append(child)?;
    state.staging.clear();
    state.head = id;
    info!(commit = %id.short_hex(), "created commit");
    Ok(id)
}

/// Move head to `rev` and make the working tree match it.
pub fn checkout_revision(
    state: &mut RepositoryState,
    worktree: &Worktree,
    objects: &dyn ObjectStore,
    rev: &str,
    tip_name: &str,
) -> SdkResult<ObjectId> {
    let target = resolve(state, rev, tip_name)?;
    rewrite_worktree(state, worktree, objects, &target)?;
    state.head = target;
    info!(head = %target.short_hex(), "checked out");
    Ok(target)
}

/// Restore individual files to head's version, dropping any staged
/// addition of them. A literal `--` is skipped.
///
/// Every path is checked and its content fetched before any file is
/// written, so a bad path leaves both the tree and staging untouched.
pub fn checkout_paths<S: AsRef<str>>(
    state: &mut RepositoryState,
    worktree: &Worktree,
    objects: &dyn ObjectStore,
    paths: &[S],
) -> SdkResult<Vec<String>> {
    let head = state.head_commit()?;
    let mut pending = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if path == PATH_SEPARATOR {
            continue;
        }
        let rel = worktree.normalize(path)?;
        let digest = head
            .tracked_digest(&rel)
            .ok_or_else(|| SdkError::NotTracked(rel.clone()))?;
        let data = objects.fetch(digest)?;
        pending.push((rel, data));
    }

    let mut restored = Vec::with_capacity(pending.len());
    for (rel, data) in pending {
        worktree.write(&rel, &data)?;
        state.staging.unstage(&rel);
        debug!(path = %rel, "restored from head");
        restored.push(rel);
    }
    Ok(restored)
}

/// Move head to `rev`, rewrite the working tree, and drop the target's
/// successor so the abandoned line is no longer reachable as the tip.
pub fn reset(
    state: &mut RepositoryState,
    worktree: &Worktree,
    objects: &dyn ObjectStore,
    rev: &str,
    tip_name: &str,
) -> SdkResult<ObjectId> {
    let target = resolve(state, rev, tip_name)?;
    rewrite_worktree(state, worktree, objects, &target)?;
    state.head = target;
    if let Some(severed) = state.chain.sever_successor(&target)? {
        info!(head = %target.short_hex(), abandoned = %severed.short_hex(), "reset");
    } else {
        info!(head = %target.short_hex(), "reset");
    }
    Ok(target)
}

/// Commits from `rev` (or head) back to the root, newest first.
pub fn log(state: &RepositoryState, rev: Option<&str>, tip_name: &str) -> SdkResult<Vec<Commit>> {
    let start = match rev {
        Some(rev) => resolve(state, rev, tip_name)?,
        None => state.head,
    };
    state.chain.require(&start)?;
    Ok(state.chain.ancestors(&start).cloned().collect())
}

/// Compare staging and the working tree against head.
pub fn status(state: &RepositoryState, worktree: &Worktree) -> SdkResult<WorkdirStatus> {
    ensure_attached(state, "status")?;
    let head = state.head_commit()?;
    let staging = &state.staging;
    let mut report = WorkdirStatus::new();

    for path in staging.added().keys() {
        let kind = if head.tracks(path) {
            FileStatus::Modified
        } else {
            FileStatus::New
        };
        report.staged.push(StatusEntry::new(path.clone(), kind));
    }

    for (path, digest) in head.tracked_files() {
        if staging.is_added(path) {
            continue;
        }
        match worktree.digest(path) {
            Ok(current) if current == *digest => {}
            Ok(_) => report.unstaged.push(StatusEntry::new(path.clone(), FileStatus::Modified)),
            // unreadable counts as deleted
            Err(_) => report.unstaged.push(StatusEntry::new(path.clone(), FileStatus::Deleted)),
        }
    }

    for path in worktree.files() {
        let path = path?;
        let untracked = !head.tracks(&path) && !staging.is_added(&path);
        if untracked || staging.is_deleted(&path) {
            report.untracked.push(path);
        }
    }
    report.untracked.sort();

    debug!(
        staged = report.staged.len(),
        unstaged = report.unstaged.len(),
        untracked = report.untracked.len(),
        "computed status"
    );
    Ok(report)
}

/// Make the working tree match `target`'s snapshot.
///
/// Files head tracks that the target does not are deleted, every file the
/// target tracks is written from the store, and staged additions of paths
/// the target does not track are dropped along with their files.
fn rewrite_worktree(
    state: &mut RepositoryState,
    worktree: &Worktree,
    objects: &dyn ObjectStore,
    target: &ObjectId,
) -> SdkResult<()> {
    let old: BTreeMap<String, ObjectId> = state.head_commit()?.tracked_files().clone();
    let new: BTreeMap<String, ObjectId> = state.chain.require(target)?.tracked_files().clone();

    for path in old.keys().filter(|path| !new.contains_key(*path)) {
        worktree.remove(path)?;
    }
    for (path, digest) in &new {
        let data = objects.fetch(digest)?;
        worktree.write(path, &data)?;
    }
    for path in state.staging.retain_added(|path, _| new.contains_key(path)) {
        worktree.remove(&path)?;
        debug!(path = %path, "discarded staged addition");
    }
    Ok(())
}
