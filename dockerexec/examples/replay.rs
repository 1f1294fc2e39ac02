//! Replay example: restyle prompts in recorded shell output.
//!
//! Reads raw terminal output on stdin and writes it to stdout with every
//! `user@host:path#` prompt rewritten, the same way a live session would.
//!
//! # Usage
//!
//! ```bash
//! printf 'root@4ac0a1a3eb6c:/# ' | cargo run --example replay
//! cargo run --example replay -- '\u@\w:\p ' '$' < session.log
//! ```

use std::env;

use dockerexec::{PromptStyle, SessionBuilder};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = env::args().skip(1);
    let mut builder = SessionBuilder::new();
    if let Some(style) = args.next() {
        builder = builder.style(PromptStyle::unescaped(&style));
    }
    if let Some(symbol) = args.next() {
        builder = builder.symbol(symbol);
    }

    let transformer = builder.build_transformer()?;
    transformer
        .run(&mut tokio::io::stdin(), &mut tokio::io::stdout())
        .await?;
    Ok(())
}
