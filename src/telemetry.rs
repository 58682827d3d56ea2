use prometheus::register_int_counter_vec;
use prometheus::IntCounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref QUIZ_QUESTIONS_SERVED: IntCounterVec = register_int_counter_vec!(
        "quiz_questions_served_total",
        "Number of quiz rounds answered, by category and whether a question was left",
        &["category", "outcome"]
    )
    .expect("quiz counter is registered once");
}

pub fn log_filter(directives: &str) -> anyhow::Result<EnvFilter> {
    EnvFilter::try_new(directives)
        .map_err(|e| anyhow::anyhow!("Invalid log filter {directives:?}: {e}"))
}

/// Install the global subscriber. Fails on bad filter directives or when a
/// subscriber is already installed.
pub fn init_tracing(directives: &str, include_span_events: bool) -> anyhow::Result<()> {
    let span_events = if include_span_events {
        FmtSpan::ENTER | FmtSpan::EXIT
    } else {
        FmtSpan::NONE
    };
    let fmt_layer = fmt::layer().with_span_events(span_events);

    tracing_subscriber::registry()
        .with(log_filter(directives)?)
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_directives_are_validated() {
        assert!(log_filter("info").is_ok());
        assert!(log_filter("trivia_api=debug,sqlx=warn").is_ok());
        assert!(log_filter("sqlx=loud").is_err());
    }
}
