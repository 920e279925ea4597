fn main() {
    if let Err(err) = fretboard_renderer::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
