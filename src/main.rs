use std::process;

use anyhow::Result;
use clap::Parser;
use mazepath::CLIArgs;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Usage errors exit with 1 like every other failure, help and version still exit with 0.
    let args = match CLIArgs::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            process::exit(1);
        }
        Err(e) => e.exit(),
    };

    let path = mazepath::run(&args)?;
    println!(
        "Found a path of {} step(s) from {} to {}, written to file({}).",
        path.len().saturating_sub(1),
        path.first().map(ToString::to_string).unwrap_or_default(),
        path.last().map(ToString::to_string).unwrap_or_default(),
        args.output_path.display()
    );

    Ok(())
}
