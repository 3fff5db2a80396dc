// crates/cli/src/main.rs

use anyhow::Result;
use clap::{Arg, Command};
use std::path::PathBuf;

mod commands;

fn build_cli() -> Command {
    Command::new("tasklink")
        .version("0.1.0")
        .about("Synchronize a local task collection with an external item store")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Path to the config file")
                .global(true),
        )
        .subcommand(Command::new("init").about("Write a default config file"))
        .subcommand(
            Command::new("add")
                .about("Add a task to the local store")
                .arg(
                    Arg::new("summary")
                        .required(true)
                        .value_name("SUMMARY")
                        .help("Task summary"),
                )
                .arg(
                    Arg::new("notes")
                        .short('n')
                        .long("notes")
                        .value_name("TEXT")
                        .help("Task notes"),
                )
                .arg(
                    Arg::new("category")
                        .long("category")
                        .value_name("NAME")
                        .help("Task category"),
                )
                .arg(
                    Arg::new("priority")
                        .short('p')
                        .long("priority")
                        .value_name("1-5")
                        .value_parser(clap::value_parser!(u8).range(1..=5))
                        .help("Task priority"),
                ),
        )
        .subcommand(
            Command::new("status")
                .about("Show what a sync would do, without applying anything")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the delta as JSON")
                        .action(clap::ArgAction::SetTrue),
                ),
        )
        .subcommand(Command::new("sync").about("Run one reconciliation cycle"))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let matches = build_cli().get_matches();
    let config_path = matches.get_one::<String>("config").map(PathBuf::from);

    match matches.subcommand() {
        Some(("init", _)) => commands::init(config_path),
        Some(("add", sub_matches)) => commands::add(config_path, sub_matches),
        Some(("status", sub_matches)) => commands::status(config_path, sub_matches.get_flag("json")),
        Some(("sync", _)) => commands::sync(config_path),
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}
