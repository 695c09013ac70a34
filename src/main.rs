use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

use snapmark::config::EditorConfig;
use snapmark::core::shell::default_output_path;
use snapmark::session::messages::HostEvent;
use snapmark::{EditorSession, FileShell, SessionState};

const USAGE: &str = "usage: snapmark [--yes] <image> <script.json> [output.png]";

/// One step of a replay script
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Step {
    Event(HostEvent),
    ClearAll,
    Save,
    Cancel,
}

struct Args {
    image: PathBuf,
    script: PathBuf,
    output: Option<PathBuf>,
    assume_yes: bool,
}

impl Args {
    fn parse() -> anyhow::Result<Self> {
        let mut assume_yes = false;
        let mut positional = Vec::new();
        for arg in std::env::args_os().skip(1) {
            if arg == "--yes" || arg == "-y" {
                assume_yes = true;
            } else {
                positional.push(PathBuf::from(arg));
            }
        }
        let mut positional = positional.into_iter();
        let (Some(image), Some(script)) = (positional.next(), positional.next()) else {
            anyhow::bail!(USAGE);
        };
        let output = positional.next();
        if positional.next().is_some() {
            anyhow::bail!(USAGE);
        }
        Ok(Self {
            image,
            script,
            output,
            assume_yes,
        })
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse()?;
    let config = EditorConfig::load();

    let script = std::fs::read_to_string(&args.script)
        .with_context(|| format!("reading script {}", args.script.display()))?;
    let steps: Vec<Step> = serde_json::from_str(&script)
        .with_context(|| format!("parsing script {}", args.script.display()))?;

    let output = match args.output {
        Some(output) => output,
        None => default_output_path().context("could not determine the pictures directory")?,
    };

    let shell = FileShell::new(output, args.assume_yes);
    let mut session = EditorSession::open(&args.image, &config, shell).await?;

    for step in steps {
        match step {
            Step::Event(event) => {
                session.dispatch(event);
            }
            Step::ClearAll => {
                session.clear_all();
            }
            Step::Save => {
                if let Err(err) = session.save().await {
                    log::error!("Save failed: {err}");
                }
            }
            Step::Cancel => session.cancel(),
        }
        if session.state().is_ended() {
            break;
        }
    }

    match session.state() {
        SessionState::Saved => println!("{}", session.shell().output().display()),
        SessionState::Cancelled => {}
        state => log::warn!("Script finished in state {state:?} without saving"),
    }
    Ok(())
}
