use crate::cli::{Args, ColorChoice};

pub struct AppConfig {
    pub color_enabled: bool,
    pub verbose: bool,
    /// Greet the user when the REPL starts.
    pub banner: bool,
    /// Value of `USER`, if any, for the greeting.
    pub user: Option<String>,
}

impl AppConfig {
    pub fn from_args(args: &Args) -> Self {
        let color_enabled = match args.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => atty::is(atty::Stream::Stderr) && atty::is(atty::Stream::Stdout),
        };

        AppConfig {
            color_enabled,
            verbose: args.verbose,
            banner: !args.quiet,
            user: std::env::var("USER").ok().filter(|user| !user.is_empty()),
        }
    }

    /// Default `tracing` filter directive when `RUST_LOG` is unset.
    pub fn log_directive(&self) -> &'static str {
        if self.verbose {
            "kestrel=debug"
        } else {
            "warn"
        }
    }
}
