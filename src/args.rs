use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file, `APP_*` environment variables take precedence
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve host names or URLs and print the site variables
    Match {
        #[arg(required = true, value_name = "HOST_OR_URL")]
        hosts: Vec<String>,
    },
    /// Print the site variables of the active site without matching
    Vars {
        #[arg(long)]
        site: Option<String>,
        #[arg(long)]
        variant: Option<String>,
    },
    /// Print the host of the active site for the given variant
    Link { variant: String },
}
