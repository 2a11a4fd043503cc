use std::env;
use std::fs;
use std::process;

use crossfill::{render_grid, solve, FillFailure, GridModel, Vocabulary};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("Usage: crossfill STRUCTURE WORDS [OUTPUT]");
        process::exit(2);
    }

    let template = fs::read_to_string(&args[1]).expect("failed to read the structure file");
    let word_list = fs::read_to_string(&args[2]).expect("failed to read the word list");

    let model = match GridModel::from_template(&template) {
        Ok(model) => model,
        Err(err) => {
            eprintln!("Invalid structure: {err}");
            process::exit(2);
        }
    };
    let vocab = Vocabulary::new(word_list.lines());

    match solve(&model, &vocab) {
        Ok(result) => {
            let rendered = render_grid(&model, &result.assignment, &vocab);
            println!("{rendered}");
            println!("{:?}", result.statistics);
            if let Some(output) = args.get(3) {
                fs::write(output, rendered).expect("failed to write the output file");
            }
        }
        Err(FillFailure::Unsolvable) => println!("No solution."),
        Err(FillFailure::BudgetExhausted) => println!("Search aborted."),
    }
}
