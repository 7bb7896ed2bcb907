use std::cell::RefCell;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use git2::{Cred, CredentialType, ErrorCode, Oid, PushOptions, RemoteCallbacks, Repository, Signature, StatusOptions};
use spdlog::{debug, info};

use crate::config::Config;

/// Stages and commits the post on the current branch. Returns the new commit id.
pub fn commit_post(repo: &Repository, config: &Config, post_path: &Path) -> Result<Oid> {
    let work_dir = repo.workdir().ok_or_else(|| anyhow!("Repository has no working directory"))?;
    let work_dir = fs::canonicalize(work_dir)?;
    let post_path = fs::canonicalize(post_path)
        .with_context(|| format!("Could not find post {}", post_path.display()))?;
    let relative = post_path.strip_prefix(&work_dir)
        .with_context(|| format!("Post {} is outside of the repository {}", post_path.display(), work_dir.display()))?;

    let mut index = repo.index()?;
    index.add_path(relative)?;
    index.write()?;
    info!("added file {}", relative.display());

    log_status(repo)?;

    let tree = repo.find_tree(index.write_tree()?)?;
    let signature = Signature::now(&config.author, &config.email)?;
    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => None,
        Err(e) => return Err(e.into()),
    };
    let parents: Vec<_> = parent.iter().collect();

    info!("committing post");
    let oid = repo.commit(Some("HEAD"), &signature, &signature, config.commit_message(), &tree, &parents)?;
    info!("created commit {}", oid);

    Ok(oid)
}

fn log_status(repo: &Repository) -> Result<()> {
    info!("checking status");
    let mut options = StatusOptions::new();
    options.include_untracked(true);
    for entry in repo.statuses(Some(&mut options))?.iter() {
        info!("{:?} {}", entry.status(), entry.path().unwrap_or("?"));
    }
    Ok(())
}

/// Hands out each kind of credential once. libgit2 asks again after every
/// refused attempt, so a second request for the same kind is an error.
#[derive(Default)]
struct CredentialAttempts {
    ssh_agent: bool,
    credential_helper: bool,
    default: bool,
}

impl CredentialAttempts {
    fn next(&mut self, url: &str, username: Option<&str>, allowed: CredentialType) -> Result<Cred, git2::Error> {
        let username = username.unwrap_or("git");
        if allowed.contains(CredentialType::SSH_KEY) && !self.ssh_agent {
            self.ssh_agent = true;
            debug!("trying ssh-agent credentials for {}", username);
            return Cred::ssh_key_from_agent(username);
        }
        if allowed.contains(CredentialType::USER_PASS_PLAINTEXT) && !self.credential_helper {
            self.credential_helper = true;
            debug!("trying git credential helper for {}", url);
            let git_config = git2::Config::open_default()?;
            return Cred::credential_helper(&git_config, url, Some(username));
        }
        if allowed.contains(CredentialType::DEFAULT) && !self.default {
            self.default = true;
            return Cred::default();
        }
        Err(git2::Error::from_str(&format!("Authentication failed for {}", url)))
    }
}

/// Pushes the current branch to the configured remote.
pub fn push(repo: &Repository, config: &Config) -> Result<()> {
    let head = repo.head()?;
    let branch = head.name().ok_or_else(|| anyhow!("HEAD is not a valid reference name"))?;
    let refspec = format!("{}:{}", branch, branch);

    let mut remote = repo.find_remote(config.remote())
        .with_context(|| format!("Could not find remote {}", config.remote()))?;

    let rejected = RefCell::new(None);
    let mut callbacks = RemoteCallbacks::new();
    let mut attempts = CredentialAttempts::default();
    callbacks.credentials(move |url, username, allowed| attempts.next(url, username, allowed));
    callbacks.push_update_reference(|reference, status| {
        if let Some(message) = status {
            *rejected.borrow_mut() = Some(format!("{}: {}", reference, message));
        }
        Ok(())
    });

    let mut options = PushOptions::new();
    options.remote_callbacks(callbacks);

    info!("pushing {} to remote repository {}", branch, config.remote());
    remote.push(&[refspec.as_str()], Some(&mut options))?;
    drop(options);

    if let Some(reason) = rejected.into_inner() {
        bail!("Remote rejected the push of {}", reason);
    }
    debug!("push finished");
    Ok(())
}

pub fn deploy_post(config: &Config, post_path: &Path) -> Result<()> {
    info!("deploying post");
    let repo_path = fs::canonicalize(&config.project_path)
        .with_context(|| format!("Could not resolve blog repository {}", config.project_path.display()))?;
    let repo = Repository::open(&repo_path)
        .with_context(|| format!("Could not open git repository {}", repo_path.display()))?;

    commit_post(&repo, config, post_path)?;
    push(&repo, config)
}
