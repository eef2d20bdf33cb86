use std::process;

fn main() {
    env_logger::init();
    if let Err(e) = cfg_analyzer::cli::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
