use std::fs::File;
use std::io::{BufRead, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::{fs, io};

use serde::{Deserialize, Serialize};
use spdlog::info;

use crate::prompt::Prompter;

pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_COMMIT_MESSAGE: &str = "feat(blog): add new post";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
    /// Console messages at this level or more severe go to stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr_level: Option<LogLevel>,
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub author: String,
    pub email: String,
    #[serde(rename = "projPath")]
    pub project_path: PathBuf,
    #[serde(rename = "postSubDir")]
    pub post_sub_dir: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
    #[serde(default, rename = "commitMessage", skip_serializing_if = "Option::is_none")]
    pub commit_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log: Option<Log>,
}

impl Config {
    pub fn remote(&self) -> &str {
        self.remote.as_deref().unwrap_or(DEFAULT_REMOTE)
    }

    pub fn commit_message(&self) -> &str {
        self.commit_message.as_deref().unwrap_or(DEFAULT_COMMIT_MESSAGE)
    }

    /// Posts directory with symlinks resolved. It must already exist.
    pub fn posts_dir(&self) -> io::Result<PathBuf> {
        let posts_dir = self.project_path.join(&self.post_sub_dir);
        match fs::canonicalize(&posts_dir) {
            Ok(path) => Ok(path),
            Err(e) => Err(io::Error::new(e.kind(), format!("Error resolving posts directory {}: {}", posts_dir.display(), e))),
        }
    }
}

pub fn default_config_path() -> io::Result<PathBuf> {
    match dirs::home_dir() {
        Some(home) => Ok(home.join(".blog").join(".config.json")),
        None => Err(io::Error::new(ErrorKind::NotFound, "Could not find user home directory")),
    }
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    match serde_json::from_str::<Config>(&cfg_content) {
        Ok(cfg) => Ok(cfg),
        Err(e) => Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file {}: {}", cfg_path.display(), e))),
    }
}

pub fn write_config(cfg_path: &Path, config: &Config) -> io::Result<()> {
    if let Some(parent) = cfg_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = match File::create(cfg_path) {
        Ok(file) => file,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error creating configuration file {}: {}", cfg_path.display(), e))),
    };
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, config)?;
    writeln!(writer)?;

    writer.flush()
}

// OS real name, or the login name when the real name is not set
fn default_author() -> String {
    let name = whoami::realname();
    if name.trim().is_empty() {
        return whoami::username();
    }
    name
}

fn ask_config<R: BufRead, W: Write>(prompter: &mut Prompter<R, W>) -> io::Result<Config> {
    let os_name = default_author();
    let author = prompter.ask_or(&format!("Enter your name [{}]: ", os_name), &os_name)?;
    let email = prompter.ask("Enter your email: ")?.trim().to_string();
    let project_path = prompter.ask("Path to git repo for blog: ")?.trim().to_string();
    let post_sub_dir = prompter.ask(&format!("Subdirectory containing blog posts: {}/", project_path))?.trim().to_string();

    Ok(Config {
        author,
        email,
        project_path: PathBuf::from(project_path),
        post_sub_dir: PathBuf::from(post_sub_dir),
        remote: None,
        commit_message: None,
        log: None,
    })
}

/// Loads the configuration, running the first time setup when the file does not exist yet.
pub fn load_or_setup<R: BufRead, W: Write>(cfg_path: &Path, prompter: &mut Prompter<R, W>) -> io::Result<Config> {
    info!("starting setup routine");
    if cfg_path.exists() {
        info!("found config file {}", cfg_path.display());
        return read_config(cfg_path);
    }

    info!("no config file found");
    let config = ask_config(prompter)?;
    write_config(cfg_path, &config)?;
    info!("wrote preferences to {}", cfg_path.display());

    Ok(config)
}
