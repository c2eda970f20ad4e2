fn main() {
    if let Err(error) = mpcec_forecast::cli::run_from_env() {
        eprintln!("{}", error);
        std::process::exit(1);
    }
}
