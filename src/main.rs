fn main() {
    if let Err(err) = infographic_renderer::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
