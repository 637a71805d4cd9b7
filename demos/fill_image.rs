//! Fill transparent pixels of a single image with a solid color.
//!
//! Usage:
//! ```sh
//! cargo run --example fill_image -- input.png output.png "#00ff00"
//! ```

use std::env;
use std::process;

use alpha_fill::{parse_hex, process_file, FillOptions, Rgb};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <input> <output> [#rrggbb]", args[0]);
        process::exit(1);
    }

    let input = &args[1];
    let output = &args[2];
    let color = match args.get(3) {
        Some(hex) => parse_hex(hex).expect("invalid fill color"),
        None => Rgb::WHITE,
    };

    let opts = FillOptions {
        color,
        ..FillOptions::default()
    };
    let result = process_file(input.as_ref(), output.as_ref(), &opts);

    if result.skipped {
        println!("Skipped: {}", result.message);
    } else if result.success {
        println!("Done: {}", result.message);
    } else {
        eprintln!("Error: {}", result.message);
        process::exit(1);
    }
}
