fn main() {
    if let Err(err) = plotsheet_lib::run() {
        eprintln!("plotsheet: {}", err);
        std::process::exit(1);
    }
}
