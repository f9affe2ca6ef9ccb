//! Minimal example: list every tag in an ABIF file with its decoded type
//!
//! Run with: cargo run --example dump_tags -- sample.ab1

use abif_decoder::Reader;
use std::path::Path;

fn main() {
    env_logger::init();

    let path = std::env::args().nth(1).expect("usage: dump_tags <file.ab1>");
    let mut reader = Reader::open(Path::new(&path)).expect("failed to open ABIF file");

    println!("version {}, {} tags\n", reader.version(), reader.len());

    let mut tags = reader.tags();
    tags.sort();
    for tag in tags {
        match reader.value(tag) {
            Ok(value) => println!("{}: {}", tag, value.type_name()),
            Err(e) => println!("{}: {}", tag, e),
        }
    }
}
