use std::env;
use std::fs;
use std::io::{self, Read};
use std::time::Duration;

use anyhow::Error;
use clap::{App, AppSettings, Arg};
use env_logger::{fmt, Builder, Target};
use log::{error, info, Level, LevelFilter, Record};

use candy_dimacs::DimacsParser;
use candy_gates::{GateAnalyzer, GateRecognitionConfig};
use candy_oracle::solver::IncrementalSolver;

fn main() {
    let exit_code = match main_with_err() {
        Err(err) => {
            error!("{}", err);
            1
        }
        Ok(exit_code) => exit_code,
    };
    std::process::exit(exit_code);
}

fn init_logging() {
    let format = |buf: &mut fmt::Formatter, record: &Record| {
        use std::io::Write;
        if record.level() == Level::Info {
            writeln!(buf, "c {}", record.args())
        } else {
            writeln!(buf, "c {}: {}", record.level(), record.args())
        }
    };

    let mut builder = Builder::new();
    builder
        .target(Target::Stdout)
        .format(format)
        .filter(None, LevelFilter::Info);

    if let Ok(ref env_var) = env::var("CANDY_LOG") {
        builder.parse_filters(env_var);
    }

    builder.init();
}

fn banner() {
    info!("This is candy-gates {}", env!("CANDY_VERSION"));
    info!(
        "  {} build - {}",
        env!("CANDY_PROFILE"),
        env!("CANDY_RUSTC_VERSION")
    );
}

fn main_with_err() -> Result<i32, Error> {
    let matches = App::new("candy-gates")
        .version(env!("CANDY_VERSION"))
        .setting(AppSettings::DisableHelpSubcommand)
        .about("Recovers a gate structure from a DIMACS CNF formula")
        .arg_from_usage("[INPUT] 'The input CNF file to use (stdin if omitted)'")
        .arg_from_usage("[tries] --tries=[N] 'Rarest-literal rounds to run after unit-clause seeding'")
        .arg_from_usage("[no-patterns] --no-patterns 'Disable the syntactic pattern checker'")
        .arg_from_usage("[no-semantic] --no-semantic 'Disable the semantic oracle checker'")
        .arg_from_usage("[holistic] --holistic 'Load the whole formula into the oracle up front'")
        .arg_from_usage("[lookahead] --lookahead 'Enable the VE-blocked decomposition checker'")
        .arg_from_usage("[intensify] --intensify 'Re-run rejected candidates under escalating rule sets'")
        .arg(
            Arg::from_usage("[lookahead-threshold] --lookahead-threshold=[N]")
                .help("Resolvents examined by the decomposition checker before giving up"),
        )
        .arg(
            Arg::from_usage("[semantic-budget] --semantic-budget=[N]")
                .help("Conflict budget per semantic oracle call, 0 for unlimited"),
        )
        .arg_from_usage("[timeout] --timeout=[SECONDS] 'Wall-clock budget for the whole analysis'")
        .arg_from_usage("[normalize-roots] --normalize-roots 'Replace the root clauses with a single artificial unit'")
        .get_matches();

    init_logging();
    banner();

    let mut config = GateRecognitionConfig::default();
    if let Some(tries) = matches.value_of("tries") {
        config.tries = tries.parse()?;
    }
    if matches.is_present("no-patterns") {
        config.patterns = false;
    }
    if matches.is_present("no-semantic") {
        config.semantic = false;
    }
    if matches.is_present("holistic") {
        config.holistic = true;
    }
    if matches.is_present("lookahead") {
        config.lookahead = true;
    }
    if matches.is_present("intensify") {
        config.intensify = true;
    }
    if let Some(threshold) = matches.value_of("lookahead-threshold") {
        config.lookahead_threshold = threshold.parse()?;
    }
    if let Some(budget) = matches.value_of("semantic-budget") {
        config.semantic_budget = budget.parse()?;
    }
    if let Some(timeout) = matches.value_of("timeout") {
        config.timeout = Some(Duration::from_secs_f64(timeout.parse()?));
    }

    let stdin = io::stdin();

    let mut locked_stdin;
    let mut opened_file;

    let file = match matches.value_of("INPUT") {
        Some(path) => {
            info!("Reading file '{}'", path);
            opened_file = fs::File::open(path)?;
            &mut opened_file as &mut dyn Read
        }
        None => {
            info!("Reading from stdin");
            locked_stdin = stdin.lock();
            &mut locked_stdin as &mut dyn Read
        }
    };

    let formula = DimacsParser::parse(file)?;

    info!(
        "Parsed formula with {} variables and {} clauses",
        formula.var_count(),
        formula.len()
    );

    let mut oracle = IncrementalSolver::new();
    let mut problem = GateAnalyzer::new(&formula, &mut oracle, config).analyze();

    if matches.is_present("normalize-roots") {
        problem.normalize_roots();
    }

    problem.log_summary();

    println!("c vars {}", problem.var_count());
    println!("c clauses {}", problem.clause_count());
    println!("c gates {}", problem.gate_count());
    println!("c roots {}", problem.roots().len());
    println!("c timed_out {}", problem.has_timeout());

    let stats = problem.stats();
    println!(
        "c gate_kinds monotone={} pattern={} semantic={} decompose_blocked={}",
        stats.monotone_gates, stats.pattern_gates, stats.semantic_gates, stats.decompose_blocked
    );
    println!("c semantic_calls {}", stats.semantic_calls);

    for (var, gate) in problem.gates() {
        let inputs: Vec<String> = gate.inputs().iter().map(|l| l.to_string()).collect();
        println!(
            "g {} <- [{}]{}",
            var,
            inputs.join(", "),
            if gate.has_non_monotone_parent() { " (non-monotone)" } else { "" }
        );
    }

    Ok(if problem.gate_count() > 0 { 0 } else { 10 })
}
