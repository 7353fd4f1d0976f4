use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;

use episweep::sweep;

/// Average the trailing R0 column of every sweep data file in a directory
/// into MEAN_VALUES.dat, one row per parameter tuple.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory holding data_*.dat sweep output
    #[arg(value_name = "DIR", default_value = "./R0")]
    dir: PathBuf,
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let summary = sweep::aggregate(&args.dir)?;
    print!("{}", sweep::sweep_table(&summary.records));
    println!("# wrote {}", summary.output_path.display());
    if summary.skipped > 0 {
        println!("# skipped {} file(s)", summary.skipped);
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    if let Err(err) = run(&args) {
        eprintln!("average_r0 failed: {err}");
        process::exit(1);
    }
}
