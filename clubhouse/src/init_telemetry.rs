use anyhow::Result;
use tracing::{info, Subscriber};
use tracing_subscriber::{layer::SubscriberExt, registry::LookupSpan, Layer};
use tracing_subscriber::{registry, EnvFilter};

pub fn build_reduced_logger_text<S>() -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if cfg!(debug_assertions) {
        Box::new(
            tracing_subscriber::fmt::layer()
                .with_line_number(false)
                .with_thread_names(false)
                .with_timer(tracing_subscriber::fmt::time::SystemTime)
                .with_target(true)
                .with_span_events(tracing_subscriber::fmt::format::FmtSpan::NONE)
                .event_format(tracing_subscriber::fmt::format().compact()),
        )
    } else {
        Box::new(
            tracing_subscriber::fmt::layer()
                .with_timer(tracing_subscriber::fmt::time::SystemTime)
                .with_target(true),
        )
    }
}

/// Log filter from `RUST_LOG`; defaults to warnings plus clubhouse and audit info
pub fn build_loglevel_filter_layer() -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,clubhouse=info,audit=info"))
}

pub fn init_tracing(debug: bool) -> Result<()> {
    let filter = if debug {
        build_loglevel_filter_layer().add_directive("clubhouse=debug".parse()?)
    } else {
        build_loglevel_filter_layer()
    };

    let subscriber = registry()
        .with(filter)
        .with(build_reduced_logger_text());
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Logging initialized");
    Ok(())
}
