fn main() {
    if let Err(err) = crimes_prep::run() {
        eprintln!("ERROR: {err:#}");
        std::process::exit(1);
    }
}
