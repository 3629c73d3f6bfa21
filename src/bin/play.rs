use clap::Parser;
use gemfall::engine::{Board, Cell, Color};
use std::io::{self, Write};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Board dimension (recommended: between 5 and 10)
    #[clap(short, long, default_value_t = 7)]
    size: usize,

    /// Number of colors to play with (2 to 5)
    #[clap(short, long, default_value_t = 4)]
    colors: usize,

    /// Number of turns; a turn is consumed only by a swap that matches
    #[clap(short, long, default_value_t = 10)]
    turns: u32,

    /// Seed for a reproducible board; random when omitted
    #[clap(long)]
    seed: Option<u64>,
}

fn is_adjacent(a: Cell, b: Cell) -> bool {
    a.0.abs_diff(b.0) + a.1.abs_diff(b.1) == 1
}

fn parse_move(input: &str) -> Option<(Cell, Cell)> {
    let parts: Vec<usize> = input
        .split_whitespace()
        .map(|p| p.parse::<usize>())
        .collect::<Result<_, _>>()
        .ok()?;
    if parts.len() != 4 {
        return None;
    }
    Some(((parts[0], parts[1]), (parts[2], parts[3])))
}

fn main() {
    let args = Args::parse();
    if !(2..=Color::ALL.len()).contains(&args.colors) {
        eprintln!("--colors must be between 2 and {}", Color::ALL.len());
        std::process::exit(1);
    }
    let palette = &Color::ALL[..args.colors];

    let mut board = match args.seed {
        Some(seed) => Board::with_seed(args.size, palette, seed),
        None => Board::new(args.size, palette),
    }
    .expect("board configuration rejected");

    println!("Welcome to Gemfall!");
    println!("Cells are addressed as 'col row' counted from the top-left.");

    let mut turns_left = args.turns;
    while turns_left > 0 {
        println!("---------------------");
        println!("Turns left: {}, Score: {}", turns_left, board.score());
        println!("{}", board);

        print!("Enter your move (col1 row1 col2 row2), or 'q' to quit: ");
        io::stdout().flush().unwrap();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            println!("Error reading input. Please try again.");
            continue;
        }
        let trimmed = input.trim();

        if trimmed == "q" {
            println!("Thanks for playing!");
            return;
        }

        let (a, b) = match parse_move(trimmed) {
            Some(pair) => pair,
            None => {
                println!("Invalid input format. Use four numbers like '2 0 2 1', or 'q'.");
                continue;
            }
        };

        let size = board.size();
        if a.0 >= size || a.1 >= size || b.0 >= size || b.1 >= size {
            println!(
                "Invalid coordinates: columns and rows must be between 0 and {}.",
                size - 1
            );
            continue;
        }
        // The engine swaps any two cells; adjacency is this layer's rule.
        if !is_adjacent(a, b) {
            println!("Cells must be horizontal or vertical neighbors.");
            continue;
        }

        match board.swap(a, b) {
            Ok(true) => {
                println!("Match!");
                turns_left -= 1;
            }
            Ok(false) => {
                println!("That swap matches nothing; the board was left unchanged.");
            }
            Err(e) => {
                println!("Invalid move: {}", e);
            }
        }
    }

    println!("---------------------");
    println!("GAME OVER! Final score: {}", board.score());
}
