use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use episweep::temporal;

/// Average S and I by time step across all realizations of every lambda_*
/// subdirectory, writing one MEAN_TEMPORAL.dat per directory.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Base directory holding lambda_* subdirectories
    #[arg(value_name = "BASE", default_value = "./Temp")]
    base: PathBuf,
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let summaries = temporal::aggregate(&args.base)?;
    for summary in &summaries {
        println!(
            "{}: {} step(s) from {} realization(s)",
            summary.output_path.display(),
            summary.steps,
            summary.realizations
        );
    }
    println!("# processed {} lambda directories", summaries.len());
    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("average_realizations failed: {err}");
        process::exit(1);
    }
}
