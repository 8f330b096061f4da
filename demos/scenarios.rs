use clap::Parser;

use cornersat::decide::{Decider, DeciderConfig};
use cornersat::domain::Domains;
use cornersat::formula::Formula;
use cornersat::oracle::EvalOracle;

#[derive(Parser, Debug)]
#[command(author, version, about = "Classify a few formulas by sampling the corners of their variable box")]
struct Cli {
    /// Log level
    #[arg(long, default_value = "info")]
    log_level: simplelog::LevelFilter,

    /// Check corners on a thread pool
    #[arg(long)]
    parallel: bool,

    /// Number of worker threads (with --parallel)
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let domains = Domains::new().with("x", 0, 10).with("y", 0, 1).with("z", 0, 1);
    let config = DeciderConfig {
        threads: args.threads,
        ..Default::default()
    };
    let decider = Decider::with_config(domains, EvalOracle::new(), config);

    let x = Formula::var("x");
    let y = Formula::var("y");
    let z = Formula::var("z");
    let queries = [
        ("A", Formula::ge(x.clone(), Formula::int(0))),
        ("B", Formula::gt(x.clone(), Formula::int(10))),
        ("C", Formula::gt(x, Formula::int(5))),
        ("D", Formula::le(y + z, Formula::int(1))),
    ];

    for (name, query) in &queries {
        let report = if args.parallel {
            decider.decide_parallel_report(query)?
        } else {
            decider.decide_report(query)?
        };
        println!(
            "{}: {} is {} ({}/{} corners satisfiable)",
            name, query, report.degree, report.satisfiable, report.total
        );
    }

    println!("sessions opened: {}", decider.oracle().stats().opened());

    Ok(())
}
