//! lumen2d - interactive 2D light-transport sandbox.

use std::env;
use std::path::PathBuf;

fn print_usage(prog: &str) {
    eprintln!("lumen2d {} ({})", env!("CARGO_PKG_VERSION"), env!("LUMEN_BUILD_DATE"));
    eprintln!();
    eprintln!("Usage: {prog} [scene.data]");
    eprintln!();
    eprintln!("Keys:");
    eprintln!("  1 / 2 / 3   brush material: diffuse / reflective / light");
    eprintln!("  click       place a vertex, every third closes a triangle");
    eprintln!("  C           clear the scene");
    eprintln!("  D           dump shapes to the log");
    eprintln!("  Ctrl+S      save scene as...");
    eprintln!("  Ctrl+O      open scene...");
    eprintln!("  Esc         quit (the scene is saved on exit)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RUST_LOG=debug   log filter");
    eprintln!("  LUMEN_TRACE=1    write a Chrome trace to trace.json");
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("lumen2d");

    let mut scene: Option<PathBuf> = None;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "-V" | "--version" => {
                println!("lumen2d {} ({})", env!("CARGO_PKG_VERSION"), env!("LUMEN_BUILD_DATE"));
                return;
            }
            "-h" | "--help" => {
                print_usage(prog);
                return;
            }
            other if other.starts_with('-') => {
                eprintln!("Unknown option: {other}");
                print_usage(prog);
                std::process::exit(2);
            }
            path => scene = Some(PathBuf::from(path)),
        }
    }

    if let Err(e) = lumen2d::viewer::run(scene) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
