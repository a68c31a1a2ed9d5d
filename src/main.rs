mod commands;

use crate::commands::SubCommand;
use clap::{crate_authors, crate_version, Args, Parser, Subcommand};
use commands::profiles::ProfilesCommand;
use commands::release::ReleaseCommand;
use commands::template::TemplateCommand;
use simplelog::*;

#[derive(Parser)]
#[clap(author = crate_authors!("\n"), version = crate_version!(), about = "Patches ClusterServiceVersion manifests", long_about = None)]
#[command(propagate_version = true)]
struct App {
    #[clap(flatten)]
    global_opts: GlobalOpts,

    #[clap(subcommand)]
    command: SubCommands,
}

#[derive(Subcommand)]
enum SubCommands {
    Release(ReleaseCommand),
    Template(TemplateCommand),
    Profiles(ProfilesCommand),
}

impl SubCommand for SubCommands {
    fn execute(&self) -> Result<(), anyhow::Error> {
        match self {
            SubCommands::Release(cmd) => cmd.execute(),
            SubCommands::Template(cmd) => cmd.execute(),
            SubCommands::Profiles(cmd) => cmd.execute(),
        }
    }
}

#[derive(Args)]
struct GlobalOpts {
    /// Show more information in log output
    #[clap(short, long, global = true)]
    verbose: bool,
}

fn main() {
    let app = App::parse();

    let level = if app.global_opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    // stdout carries the manifests, so logs go to stderr only
    if let Err(e) = TermLogger::init(
        level,
        ConfigBuilder::new().set_time_level(LevelFilter::Off).build(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    ) {
        eprintln!("failed to initialise logging: {}", e);
    }

    if let Err(e) = app.command.execute() {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
