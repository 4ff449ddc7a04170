//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use roteiro_core::config;
use roteiro_core::format::ScriptView;

use crate::logging;
use crate::runtime::Runtime;

mod commands;
mod resolve;

#[derive(Parser)]
#[command(name = "roteiro")]
#[command(version)]
#[command(about = "Screenplay drafting from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    #[command(flatten)]
    Script(ScriptCommands),
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Commands that operate on the stored script.
#[derive(clap::Subcommand)]
enum ScriptCommands {
    /// Manage scenes
    Scene {
        #[command(subcommand)]
        command: SceneCommands,
    },
    /// Manage the dialogues of a scene
    Dialogue {
        #[command(subcommand)]
        command: DialogueCommands,
    },
    /// Print a view of the script
    Show {
        /// full, scenes or dialogues
        #[arg(value_name = "VIEW", default_value_t = ScriptView::Full)]
        view: ScriptView,
    },
    /// Replace the script with edited full-view text
    Edit {
        /// Read the text from a file instead of stdin
        #[arg(short, long, value_name = "PATH")]
        file: Option<PathBuf>,
    },
    /// Copy a view or the last translation to the clipboard
    Copy {
        #[arg(value_enum, value_name = "WHAT", default_value_t = CopyTarget::Full)]
        target: CopyTarget,
    },
    /// Translate the dialogues view
    Translate {
        /// Also copy the translation to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Capture speech into a scene until the recognizer stops or Ctrl+C
    Listen {
        /// Scene position or id
        #[arg(value_name = "SCENE")]
        scene: String,
    },
    /// Show scene and dialogue counts
    Stats,
}

#[derive(clap::Subcommand)]
enum SceneCommands {
    /// Append an empty scene
    Add,
    /// Delete a scene and its dialogues
    Rm {
        /// Scene position or id
        #[arg(value_name = "SCENE")]
        scene: String,
    },
    /// Replace a scene's content
    Set {
        /// Scene position or id
        #[arg(value_name = "SCENE")]
        scene: String,
        /// New content (words are joined with spaces)
        #[arg(value_name = "CONTENT", required = true, num_args = 1..)]
        content: Vec<String>,
    },
    /// List scenes with their ids
    List,
}

#[derive(clap::Subcommand)]
enum DialogueCommands {
    /// Append a dialogue to a scene
    Add {
        /// Scene position or id
        #[arg(value_name = "SCENE")]
        scene: String,
        /// Character name (stored upper-case)
        #[arg(short, long)]
        character: Option<String>,
        /// Spoken line
        #[arg(short, long)]
        line: Option<String>,
    },
    /// Delete a dialogue
    Rm {
        /// Scene position or id
        #[arg(value_name = "SCENE")]
        scene: String,
        /// Dialogue position within the scene, or id
        #[arg(value_name = "DIALOGUE")]
        dialogue: String,
    },
    /// Change a dialogue's character or line
    #[command(group(
        clap::ArgGroup::new("field")
            .required(true)
            .multiple(true)
            .args(["character", "line"])
    ))]
    Set {
        /// Scene position or id
        #[arg(value_name = "SCENE")]
        scene: String,
        /// Dialogue position within the scene, or id
        #[arg(value_name = "DIALOGUE")]
        dialogue: String,
        /// Character name (stored upper-case)
        #[arg(short, long)]
        character: Option<String>,
        /// Spoken line
        #[arg(short, long)]
        line: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
}

/// Things `copy` can put on the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum CopyTarget {
    Full,
    Scenes,
    Dialogues,
    Translation,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let _log_guard = logging::init(&config::paths::logs_dir());

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        // Config commands must work even when the config file does not parse.
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Generate => commands::config::generate(),
        },
        Commands::Script(command) => dispatch_script(command).await,
    }
}

async fn dispatch_script(command: ScriptCommands) -> Result<()> {
    let config = config::Config::load().context("load config")?;
    let mut runtime = Runtime::from_config(config);

    match command {
        ScriptCommands::Scene { command } => match command {
            SceneCommands::Add => commands::scene::add(&mut runtime).await,
            SceneCommands::Rm { scene } => commands::scene::remove(&mut runtime, &scene).await,
            SceneCommands::Set { scene, content } => {
                commands::scene::set(&mut runtime, &scene, &content.join(" ")).await
            }
            SceneCommands::List => {
                commands::scene::list(&runtime);
                Ok(())
            }
        },

        ScriptCommands::Dialogue { command } => match command {
            DialogueCommands::Add {
                scene,
                character,
                line,
            } => {
                commands::dialogue::add(
                    &mut runtime,
                    &scene,
                    character.as_deref(),
                    line.as_deref(),
                )
                .await
            }
            DialogueCommands::Rm { scene, dialogue } => {
                commands::dialogue::remove(&mut runtime, &scene, &dialogue).await
            }
            DialogueCommands::Set {
                scene,
                dialogue,
                character,
                line,
            } => {
                commands::dialogue::set(
                    &mut runtime,
                    &scene,
                    &dialogue,
                    character.as_deref(),
                    line.as_deref(),
                )
                .await
            }
        },

        ScriptCommands::Show { view } => {
            commands::view::show(&runtime, view);
            Ok(())
        }
        ScriptCommands::Edit { file } => commands::view::edit(&mut runtime, file.as_deref()).await,
        ScriptCommands::Copy { target } => {
            let view = match target {
                CopyTarget::Full => Some(ScriptView::Full),
                CopyTarget::Scenes => Some(ScriptView::Scenes),
                CopyTarget::Dialogues => Some(ScriptView::Dialogues),
                CopyTarget::Translation => None,
            };
            commands::view::copy(&mut runtime, view).await
        }
        ScriptCommands::Stats => {
            commands::view::stats(&runtime);
            Ok(())
        }

        ScriptCommands::Translate { copy } => commands::translate::run(&mut runtime, copy).await,
        ScriptCommands::Listen { scene } => commands::listen::run(&mut runtime, &scene).await,
    }
}
