//! Renders the `fedicom.1` manual page from the command line definition.
//!
//! The page lands in `$OUT_DIR/man` unless `FEDICOM_MAN_DIR` names another
//! directory, which packaging scripts use to collect it.

use std::{env, fs, io, path::PathBuf};

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli.rs"]
#[allow(dead_code)]
mod cli;

fn man_dir() -> io::Result<PathBuf> {
    if let Some(dir) = env::var_os("FEDICOM_MAN_DIR") {
        return Ok(PathBuf::from(dir));
    }
    env::var_os("OUT_DIR")
        .map(|out| PathBuf::from(out).join("man"))
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "OUT_DIR is not set"))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-env-changed=FEDICOM_MAN_DIR");

    let dir = man_dir()?;
    fs::create_dir_all(&dir)?;
    let mut page = fs::File::create(dir.join("fedicom.1"))?;
    Man::new(cli::Cli::command()).render(&mut page)?;
    Ok(())
}
