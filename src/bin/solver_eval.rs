use clap::Parser;
use gemfall::engine::{Board, Color, Swap};
use gemfall::solver::{solve_exhaustive, solve_simulated};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Number of seeded boards to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: u64,

    /// Board dimension
    #[clap(short, long, default_value_t = 5)]
    size: usize,

    /// Number of colors (2 to 5)
    #[clap(short, long, default_value_t = 4)]
    colors: usize,

    /// Simulation iterations for the simulated solver
    #[clap(short, long, default_value_t = 5)]
    loops: u32,

    /// First board seed; board i uses start_seed + i
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Show per-iteration solver diagnostics
    #[clap(short, long)]
    verbose: bool,
}

fn setup_logger(verbose: bool) -> Result<(), fern::InitError> {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}] {}", record.level(), message))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

/// Commits a recommendation on the given board and reports the score it
/// produced; a `None` recommendation scores 0.
fn committed_delta(board: &mut Board, recommendation: Option<Swap>) -> i32 {
    match recommendation {
        Some((a, b)) => {
            let kept = board
                .swap(a, b)
                .expect("solver recommendations are in bounds");
            assert!(kept, "a recommended swap must match");
            board.score()
        }
        None => 0,
    }
}

fn main() {
    let args = Args::parse();
    setup_logger(args.verbose).expect("logger initialization failed");
    if !(2..=Color::ALL.len()).contains(&args.colors) {
        eprintln!("--colors must be between 2 and {}", Color::ALL.len());
        std::process::exit(1);
    }
    let palette = &Color::ALL[..args.colors];

    type StrategyFn = Box<dyn Fn(&mut Board) -> Option<Swap>>;
    let loops = args.loops;
    let strategies: Vec<(String, StrategyFn)> = vec![
        ("exhaustive".to_string(), Box::new(solve_exhaustive)),
        (
            format!("simulated({})", loops),
            Box::new(move |board: &mut Board| solve_simulated(board, loops)),
        ),
    ];

    let mut totals: Vec<i64> = vec![0; strategies.len()];

    println!(
        "Evaluating {} boards ({}x{}, {} colors, seeds {}..{})...",
        args.boards,
        args.size,
        args.size,
        args.colors,
        args.start_seed,
        args.start_seed + args.boards
    );

    for board_idx in 0..args.boards {
        let seed = args.start_seed + board_idx;
        print!("Board {:>3} (seed {:>4}):", board_idx, seed);
        for (idx, (name, strategy)) in strategies.iter().enumerate() {
            // Each strategy gets its own copy of the identical seeded board.
            let mut board = Board::with_seed(args.size, palette, seed)
                .expect("evaluation board configuration rejected");
            let recommendation = strategy(&mut board);
            let delta = committed_delta(&mut board, recommendation);
            totals[idx] += i64::from(delta);
            print!("  {} {:>4}", name, delta);
        }
        println!();
    }

    println!("\n--- Average committed score per move ---");
    let mut averages: Vec<(&str, f64)> = strategies
        .iter()
        .zip(&totals)
        .map(|((name, _), total)| (name.as_str(), *total as f64 / args.boards as f64))
        .collect();
    averages.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    for (name, average) in averages {
        println!("Strategy {:<14}: {:.2}", name, average);
    }
}
