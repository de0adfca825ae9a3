mod api;
mod cli;
mod config;
mod database;
mod error;
mod logging;
mod pagination;
mod products;
mod query;
mod schema;
mod server;
mod service;

use cli::Cli;
use log::error;

fn main() {
    // Log level comes from config.toml; RUST_LOG overrides it:
    // ERROR → WARN → INFO → DEBUG → TRACE
    if let Err(err) = Cli::handle_command_line() {
        error!("{:?}", err);
        eprintln!("{}", err);
        std::process::exit(1);
    }
}
