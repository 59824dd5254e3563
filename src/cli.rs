//! The safesys command line: runs shell commands in parallel, each through
//! the thread-safe system().

use anyhow::anyhow;
use argh::FromArgs;
use rayon::prelude::*;
use std::path::PathBuf;

use crate::{trace, FAILURE};

/// Run shell commands in parallel through a thread-safe system().
#[derive(FromArgs)]
struct Args {
    /// chdir before running
    #[argh(option, short = 'C')]
    dir: Option<PathBuf>,

    /// debugging tools (-d list to list)
    #[argh(option, short = 'd')]
    debug: Option<String>,

    /// commands to run at once [default: all of them]
    #[argh(option, short = 'j')]
    jobs: Option<usize>,

    /// directory for handoff files [default: current directory]
    #[argh(option)]
    handoff_dir: Option<PathBuf>,

    /// log executed command lines
    #[argh(switch, short = 'v')]
    verbose: bool,

    /// commands, each a single shell string
    #[argh(positional)]
    commands: Vec<String>,
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_env("SAFESYS_LOG")
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("logging: {}", err))
}

#[cfg(unix)]
fn configure_handoff(dir: PathBuf) -> anyhow::Result<()> {
    if !crate::SERIALIZED {
        tracing::warn!("--handoff-dir has no effect: this build calls system() directly");
    }
    crate::executor::configure(crate::executor::Config {
        handoff_dir: dir,
        ..Default::default()
    })
    .map_err(|_| anyhow!("executor already configured"))
}

#[cfg(not(unix))]
fn configure_handoff(_dir: PathBuf) -> anyhow::Result<()> {
    tracing::warn!("--handoff-dir has no effect: this build calls system() directly");
    Ok(())
}

/// Renders a status the way the platform's system() means it.
#[cfg(unix)]
fn describe(status: i32) -> String {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(status).to_string()
}

#[cfg(not(unix))]
fn describe(status: i32) -> String {
    format!("exit code: {}", status)
}

fn run_impl() -> anyhow::Result<i32> {
    let args: Args = argh::from_env();
    init_logging(args.verbose)?;

    if let Some(debug) = &args.debug {
        match debug.as_str() {
            "list" => {
                println!("debug tools:");
                println!("  trace  generate json performance trace");
                return Ok(1);
            }
            "trace" => trace::open("trace.json")?,
            _ => anyhow::bail!("unknown -d {:?}, use -d list to list", debug),
        }
    }

    if let Some(dir) = &args.dir {
        std::env::set_current_dir(dir).map_err(|err| anyhow!("chdir {:?}: {}", dir, err))?;
    }
    if let Some(dir) = args.handoff_dir {
        configure_handoff(dir)?;
    }

    if args.commands.is_empty() {
        anyhow::bail!("no commands given");
    }
    let jobs = match args.jobs {
        Some(0) => anyhow::bail!("invalid -j 0"),
        Some(n) => n,
        None => args.commands.len(),
    };

    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
    let statuses: Vec<i32> = pool.install(|| {
        args.commands
            .par_iter()
            .map(|cmd| trace::scope("command", || crate::system(cmd)))
            .collect()
    });

    let mut failed = false;
    for (cmd, &status) in args.commands.iter().zip(&statuses) {
        if status == FAILURE {
            println!("safesys: {}: lost track of command", cmd);
            failed = true;
        } else if status != 0 {
            println!("safesys: {}: {}", cmd, describe(status));
            failed = true;
        }
    }
    Ok(if failed { 1 } else { 0 })
}

pub fn run() -> anyhow::Result<i32> {
    let res = run_impl();
    trace::close()?;
    res
}
