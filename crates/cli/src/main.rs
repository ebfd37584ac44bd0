fn main() {
    fetchgen_cli::logging::init_tracing();
    std::process::exit(fetchgen_cli::run_cli(std::env::args_os()));
}
