use json_tsgen::cli::{self, CommandLineInterface};

fn main() {
    // stdout carries the generated declarations; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(cli::log_filter())
        .with_writer(std::io::stderr)
        .init();

    let command_line_interface = CommandLineInterface::load();
    if let Err(error) = command_line_interface.run() {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
