//! Server settings, read from flags with environment fallbacks.
//!
//! Call [`load_dotenv`] before parsing so values from a local `.env` file are
//! visible as environment variables.

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Settings {
    /// SQLite database file, created on first start
    #[clap(long, env = "DB_PATH")]
    pub db_path: String,
    /// Host name or IP address to listen on
    #[clap(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,
    #[clap(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
    /// tracing filter directives, e.g. `info,sqlx=warn`
    #[clap(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
    /// Log span enter/exit events
    #[clap(long, env = "INCLUDE_SPAN_EVENTS")]
    pub include_span_events: bool,
}

impl Settings {
    /// Host and port as given; names are resolved when the listener binds.
    pub fn listen_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

pub fn load_dotenv() {
    dotenv::dotenv().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Settings {
        let mut argv = vec!["server", "--db-path", "trivia.db"];
        argv.extend_from_slice(args);
        Settings::try_parse_from(argv).unwrap()
    }

    #[test]
    fn flags_set_listen_addr() {
        let settings = parse(&["--host", "127.0.0.1", "--port", "5000"]);
        assert_eq!(settings.db_path, "trivia.db");
        assert_eq!(settings.listen_addr(), ("127.0.0.1", 5000));
    }

    #[tokio::test]
    async fn host_names_resolve() {
        let settings = parse(&["--host", "localhost", "--port", "5000"]);
        let addrs: Vec<_> = tokio::net::lookup_host(settings.listen_addr())
            .await
            .unwrap()
            .collect();
        assert!(!addrs.is_empty());
        assert!(addrs.iter().all(|a| a.port() == 5000));
    }

    #[test]
    fn logging_flags() {
        let settings = parse(&["--log-level", "debug,sqlx=warn", "--include-span-events"]);
        assert_eq!(settings.log_level, "debug,sqlx=warn");
        assert!(settings.include_span_events);
    }
}
