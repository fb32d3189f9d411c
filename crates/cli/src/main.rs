//! Command-line interface for installing GSD into Mistral Vibe.
//!
//! The binary is a thin shell over the `gsd-install` crate: argument parsing
//! lives in [`cli`], dispatch and console output in [`app`].

mod app;
mod cli;

fn main() {
    if let Err(err) = app::run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}
