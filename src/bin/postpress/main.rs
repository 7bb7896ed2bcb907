use std::ffi::OsString;
use std::path::PathBuf;
use std::{env, process};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use spdlog::{error, info, warn};

use postpress::config::{default_config_path, load_or_setup};
use postpress::deploy::deploy_post;
use postpress::logger::configure_logger;
use postpress::post::{ask_post_fields, Post};
use postpress::prompt::stdin_prompter;
use postpress::word_counter::scan_file;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to markdown file
    #[arg(short, long)]
    file: PathBuf,

    /// Commit the new blog post and push it to the remote repository
    #[arg(long)]
    push: bool,

    /// Config path. Defaults to ~/.blog/.config.json
    #[arg(short, long = "config")]
    config_path: Option<PathBuf>,
}

// Older scripts call the tool with a single dash: -push
fn normalize_args<I: IntoIterator<Item = OsString>>(args: I) -> Vec<OsString> {
    args.into_iter()
        .map(|arg| if arg == "-push" { OsString::from("--push") } else { arg })
        .collect()
}

fn run(args: Args) -> Result<()> {
    let mut prompter = stdin_prompter();

    let config_path = match args.config_path {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = load_or_setup(&config_path, &mut prompter)?;

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    let scan = scan_file(&args.file)?;
    let fields = ask_post_fields(&mut prompter)?;
    let post = Post::new(fields, &config.author, Local::now().naive_local(), scan);

    let posts_dir = config.posts_dir()?;
    let post_path = post.write(&posts_dir)
        .with_context(|| format!("Could not write post {}", post.slug))?;

    if args.push {
        deploy_post(&config, &post_path)?;
    }

    info!("post {} is ready", post_path.display());
    Ok(())
}

fn main() {
    let args = Args::parse_from(normalize_args(env::args_os()));

    if let Err(err) = run(args) {
        error!("{:#}", err);
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}
