use clap::{Parser, Subcommand};

use self::play::{AutoArg, PlayArg};

mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Fly the plane manually with the arrow keys
    #[command(name = "play")]
    Play(#[clap(flatten)] PlayArg),
    /// Let the autopilot fly and learn from its own flights
    #[command(name = "auto")]
    Auto(#[clap(flatten)] AutoArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run_manual(&arg)?,
        Mode::Auto(arg) => play::run_auto(&arg)?,
    }
    Ok(())
}
