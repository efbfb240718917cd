use adt_shell::{Config, Interpreter};
use argh::FromArgs;
use log::info;
use std::io::IsTerminal;

#[derive(FromArgs)]
/// Interactive shell for creating abstract data types and calling operations on them.
struct Args {
    #[argh(option, default = "String::from(\">> \")")]
    /// text printed before each input line.
    prompt: String,

    #[argh(switch, short = 'q')]
    /// do not print the version banner on startup.
    quiet: bool,

    #[argh(switch, short = 'v')]
    /// log debug messages to standard error.
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();
    init_logging(args.verbose);

    let config = Config {
        prompt: args.prompt,
        banner: !args.quiet,
    };
    let mut interpreter = Interpreter::with_config(config);

    let stdin = std::io::stdin();
    let shutdown = if stdin.is_terminal() {
        interpreter.repl()?
    } else {
        interpreter.run(stdin.lock(), &mut std::io::stdout())?
    };

    info!("session ended: {:?}", shutdown);
    std::process::exit(shutdown.exit_code())
}
