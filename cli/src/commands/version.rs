//! Version command

/// Run the version command.
pub fn run() {
    println!("fleetjoin {}", env!("CARGO_PKG_VERSION"));
}
