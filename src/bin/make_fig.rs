use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use episweep::figure;

/// Render a gnuplot script into a cropped PDF via the external
/// latex/dvips/ps2eps toolchain, removing every intermediate artifact.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Plot script carrying an `epsfile '...'` output line
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let pdf = figure::render(&args.script)?;
    println!("{}", pdf.display());
    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("make_fig failed: {err}");
        process::exit(1);
    }
}
