//! sdkmirror - copy SDK archive files into an installed toolkit tree
//!
//! Usage:
//!   sdkmirror                                   Use the built-in roots
//!   sdkmirror --source-root <DIR> --dest-root <DIR>
//!
//! Mapping: bin -> bin, include -> include, lib -> lib/x64

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sdkmirror_fs::{
    C_NAME_PRODUCT_DEFAULT, C_PATH_DIR_DST_ROOT_DEFAULT, C_PATH_DIR_SRC_ROOT_DEFAULT,
    SpecMirrorOptions, destination_dir, mirror,
};

mod log;

#[derive(Parser)]
#[command(name = "sdkmirror")]
#[command(about = "Copy SDK bin/include/lib files into an installed toolkit")]
#[command(version)]
struct Cli {
    /// Extracted SDK archive directory
    #[arg(long, env = "SDKMIRROR_SOURCE_ROOT", default_value = C_PATH_DIR_SRC_ROOT_DEFAULT)]
    source_root: PathBuf,

    /// Installed toolkit directory
    #[arg(long, env = "SDKMIRROR_DEST_ROOT", default_value = C_PATH_DIR_DST_ROOT_DEFAULT)]
    dest_root: PathBuf,

    /// Product name for the completion message
    #[arg(long, env = "SDKMIRROR_PRODUCT", default_value = C_NAME_PRODUCT_DEFAULT)]
    product: String,

    /// Print the transfer plan and a counter summary to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let spec_options =
        SpecMirrorOptions::new(&cli.source_root, &cli.dest_root).with_product(cli.product);

    if cli.verbose {
        for spec_transfer in &spec_options.l_transfers {
            log::debug(&format!(
                "{} -> {}",
                cli.source_root.join(spec_transfer.name_dir_src).display(),
                destination_dir(&spec_options, spec_transfer).display()
            ));
        }
    }

    let report = mirror(&spec_options, |spec_record| println!("{spec_record}"))
        .with_context(|| {
            format!(
                "Failed to mirror {} into {}",
                cli.source_root.display(),
                cli.dest_root.display()
            )
        })?;

    for warning in &report.warnings {
        log::warn(warning);
    }
    println!("{}", report.completion_message());
    if cli.verbose {
        log::debug(&report.to_string());
    }

    Ok(())
}
