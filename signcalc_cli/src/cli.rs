use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "signcalc",
    about = "Sign structure design: wind load, support member, foundation and rebar",
    version
)]
pub struct Cli {
    /// Design request JSON; a built-in demo request when omitted
    pub request: Option<PathBuf>,

    /// Engine configuration TOML
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory of standards packs (overrides config and SIGNCALC_PACKS_DIR)
    #[arg(long)]
    pub packs_dir: Option<String>,

    /// Print only the result JSON
    #[arg(long)]
    pub json: bool,
}
