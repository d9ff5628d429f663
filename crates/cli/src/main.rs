use std::process::ExitCode;

fn main() -> ExitCode {
    frajola_cli::run()
}
