use std::process;

fn main() {
    if let Err(e) = textbook_rsa::cli::app::run() {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
