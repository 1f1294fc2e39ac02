use clap::Parser;
use log::debug;

use dockerexec::{
    CrosstermTerminal, DockerExec, ExecConfig, PromptStyle, RemoteSessionProvider, SessionBuilder,
};

/// Prompt style as typed on the command line, before unescaping.
const DEFAULT_STYLE_FLAG: &str = "👨 \\u ~> 📂\\w\\r\\n\\p";

/// Open an interactive shell inside a running container with a restyled prompt.
///
/// Placeholders in --promptStyle: \u user, \w working directory, \p prompt
/// symbol. \n, \r and \t are turned into newline, carriage return and tab.
#[derive(Parser, Debug)]
#[command(name = "dockerexec", version, about)]
struct Args {
    /// The shell to use
    #[arg(long, default_value = dockerexec::transport::config::DEFAULT_SHELL)]
    shell: String,

    /// The user to run the shell as (default: the image's user)
    #[arg(long, default_value = "")]
    user: String,

    /// The prompt style to use
    #[arg(long = "promptStyle", visible_alias = "prompt-style", default_value = DEFAULT_STYLE_FLAG)]
    prompt_style: String,

    /// The prompt symbol to use
    #[arg(long = "promptSymbol", visible_alias = "prompt-symbol", default_value = dockerexec::channel::DEFAULT_SYMBOL)]
    prompt_symbol: String,

    /// Container CLI binary
    #[arg(long, default_value = dockerexec::transport::config::DEFAULT_DOCKER_BINARY)]
    docker: String,

    /// Container id or name
    container: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let code = match run(args).await {
        Ok(()) => 0,
        Err(e) => {
            debug!("session failed: {:?}", e);
            eprintln!("{}", report(&e));
            1
        }
    };

    // The stdin reader thread cannot be cancelled; exit without waiting on it.
    std::process::exit(code);
}

async fn run(args: Args) -> Result<(), dockerexec::Error> {
    let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
    let config = ExecConfig::new(&args.container)
        .shell(&args.shell)
        .user(&args.user)
        .docker_binary(&args.docker)
        .terminal_size(cols, rows);

    debug!(
        "Opening {} session inside container with id: {}",
        config.shell, config.container
    );
    let (remote_in, remote_out, _process) = DockerExec::new().open(&config)?.into_parts();

    SessionBuilder::new()
        .style(PromptStyle::unescaped(&args.prompt_style))
        .symbol(args.prompt_symbol)
        .build(CrosstermTerminal::new())?
        .run(tokio::io::stdin(), tokio::io::stdout(), remote_in, remote_out)
        .await
}

/// The single stderr line printed when the session fails.
fn report(err: &dockerexec::Error) -> String {
    let message = format!("Error: {}", err);
    message.lines().collect::<Vec<_>>().join(" ")
}
