// CLI modules
mod cli;
mod state;

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use cli::{args::Args, op::Op, Add, Delete, Init, List, Types, Verify, Version};

command_enum! {
    (Add, Add),
    (Delete, Delete),
    (Init, Init),
    (List, List),
    (Types, Types),
    (Verify, Verify),
    (Version, Version),
}

/// Install the stderr log layer. The guard must outlive every log call.
fn init_logging(level: tracing::Level) -> tracing_appender::non_blocking::WorkerGuard {
    let (stderr_writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stderr_writer)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();
    guard
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let guard = init_logging(args.log_level);

    let ctx = cli::op::OpContext::from_args(&args);

    let code = match args.command.execute(&ctx).await {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    // flush buffered log lines before exiting
    drop(guard);
    std::process::exit(code);
}
