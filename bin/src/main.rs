use std::{
    io::{stderr, stdin, stdout, Stderr, Stdout},
    path::PathBuf,
};

use clap::Parser;

use gox::{sample_expr, Driver, Emit};

#[derive(clap::Parser)]
#[command(about = "Scan and parse gox expressions")]
struct Args {
    /// What to print for each input
    #[arg(long, value_enum, default_value_t = Emit::Ast)]
    emit: Emit,
    /// Print a hand-built sample expression and exit
    #[arg(long, conflicts_with = "file")]
    sample: bool,
    /// Script to run, starts a prompt when omitted
    file: Option<PathBuf>,
}

fn run_file(path: PathBuf, driver: &mut Driver<Stdout, Stderr>) -> anyhow::Result<()> {
    let source = std::fs::read_to_string(path)?;
    driver.run(&source)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut driver = Driver::new(args.emit, stdout(), stderr());

    if args.sample {
        driver.print(&sample_expr())?;
        return Ok(());
    }

    match args.file {
        Some(file) => run_file(file, &mut driver),
        None => Ok(driver.run_prompt(stdin().lock())?),
    }
}
