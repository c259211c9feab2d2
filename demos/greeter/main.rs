//! # fieldfig demo application
//!
//! A small greeter that takes all of its settings from fieldfig. It exists
//! to demonstrate and manually verify the library, not to be useful.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example greeter -- --name World
//! cargo run --example greeter -- --help
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature            | How to exercise it                                                    |
//! |--------------------|-----------------------------------------------------------------------|
//! | Defaults           | `cargo run --example greeter -- -n World`                             |
//! | Flags and aliases  | `cargo run --example greeter -- -n World -g Hi --repeat 3 --shout`    |
//! | Env vars           | `NAME=World SERVER_PORT=9000 cargo run --example greeter`             |
//! | Env override name  | `GREETER_LOG=debug cargo run --example greeter -- -n World`           |
//! | TOML files         | `cargo run --example greeter -- --load-config greeter.toml`           |
//! | Durations          | `cargo run --example greeter -- -n World --repeat 2 --pause 300ms`    |
//! | Validation         | `cargo run --example greeter -- -n World --repeat 0`                  |
//! | Secret redaction   | `SERVER_API_KEY=supersecret cargo run --example greeter -- -n World`  |
//! | Help and version   | `cargo run --example greeter -- --help` / `-V`                        |

mod config;

use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use fieldfig::{Fieldfig, marshal_as_log_group};

use config::GreeterConfig;

fn main() {
    let mut config: GreeterConfig = Fieldfig::builder()
        .program_name("greeter")
        .version(env!("CARGO_PKG_VERSION"))
        .description("Greets someone, configured by flags, files and the environment")
        .default_load_config_flag()
        .must_load_and_validate();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_writer(std::io::stderr)
        .init();

    match marshal_as_log_group(&mut config, "config") {
        Ok(group) => info!(%group, "configuration loaded"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }

    let mut line = format!("{}, {}!", config.greeting, config.name);
    if config.shout {
        line = line.to_uppercase();
    }
    for i in 0..config.repeat {
        if i > 0 && !config.pause.is_zero() {
            std::thread::sleep(config.pause);
        }
        println!("{line}");
    }
    debug!(
        host = %config.server.host,
        port = config.server.port,
        "would post greeting upstream"
    );
}
