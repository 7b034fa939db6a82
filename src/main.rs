fn main() {
    if let Err(err) = charla::cli::main() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
