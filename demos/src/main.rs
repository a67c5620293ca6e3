// SPDX-License-Identifier: Apache-2.0

use std::env;
use std::fs::File;
use std::io::Read;

use jsonpull::{JsonReader, Node, SliceSource};

fn main() {
    env_logger::init();

    let args: Vec<_> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        println!("Usage: {} file.json [field]", args[0]);
        std::process::exit(1);
    }
    let path = &args[1];
    let mut text = String::new();
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error: Unable to open file '{}': {}", path, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = file.read_to_string(&mut text) {
        eprintln!("Error: Unable to read file '{}': {}", path, e);
        std::process::exit(1);
    }

    let mut capture = [0u8; 1024];
    let mut reader = JsonReader::new(&mut capture);
    reader.begin(SliceSource::new(text.as_bytes()));

    // With a field name, seek it anywhere in the document and print its
    // value; otherwise tokenize the whole file.
    if let Some(field) = args.get(2) {
        if !reader.skip_to_field(field, true) {
            eprintln!("Error: field '{}' not found", field);
            std::process::exit(1);
        }
        reader.advance();
        reader.undecorate();
        println!("{} = {}", field, reader.raw_value().unwrap_or("<non-scalar>"));
        std::process::exit(0);
    }

    let mut tokens = 0usize;
    while reader.advance() {
        tokens += 1;
    }
    if reader.node() == Node::Error {
        let reason = reader
            .last_error()
            .map(|code| code.to_string())
            .unwrap_or_default();
        eprintln!(
            "Error: {} at line {} column {}",
            reason,
            reader.line(),
            reader.column()
        );
        std::process::exit(1);
    }
    println!("{}: {} tokens", path, tokens);
}
