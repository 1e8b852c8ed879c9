use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};

use librefuzz_grammar::{backends::json::JsonGenerator, grammar::FormulaGrammar};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Signature corpus: files with one extracted signature per line, or
    /// directories searched recursively for .txt files
    #[arg(long = "signatures", required = true)]
    signatures: Vec<PathBuf>,

    #[arg(short, long)]
    output: PathBuf,

    #[arg(short, long)]
    entrypoint: Option<String>,

    /// Zero-argument functions to author explicitly
    #[arg(long = "nullary")]
    nullary: Vec<String>,
}

fn collect_txt_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = fs::read_dir(dir).expect("Could not read signature directory");

    for entry in entries {
        let path = entry.expect("Could not read directory entry").path();

        if path.is_dir() {
            collect_txt_files(&path, files);
        } else if path.extension().is_some_and(|ext| ext == "txt") {
            files.push(path);
        }
    }
}

/// The assembler promises identical output for identical ordered input, so
/// the corpus is flattened into lexicographic path order here.
fn corpus_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            collect_txt_files(path, &mut files);
        } else {
            files.push(path.clone());
        }
    }

    files.sort();
    files
}

fn main() {
    let args = Args::parse();

    let mut assembler = FormulaGrammar::assembler();

    for file in corpus_files(&args.signatures) {
        assembler = assembler
            .signature_file(&file)
            .expect("Could not read signature file");
    }

    for name in &args.nullary {
        assembler = assembler.nullary_function(name.as_str());
    }

    if let Some(entrypoint) = args.entrypoint {
        assembler = assembler.entrypoint(entrypoint);
    }

    let summary = assembler.summary();

    let grammar = match assembler.build() {
        Ok(grammar) => grammar,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        },
    };

    if let Err(e) = JsonGenerator::new().generate(&args.output, &grammar) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    println!("{summary}");
}
