//! cce CLI binary
//!
//! Minimal entrypoint: argument parsing, stage dispatch, and error
//! printing all live in the library's `cli` module.

fn main() {
    // cli::run() prints summaries and errors; main only maps the
    // returned code to a process exit.
    if let Err(code) = cce::cli::run() {
        std::process::exit(code.as_i32());
    }
}
