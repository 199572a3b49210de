fn main() {
    if let Err(err) = studyjam_report::run() {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
