use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use hive::controller::{ControllerConfig, RequestController, SubmitError, SubmitPolicy};
use hive::llm::{GenerationClient, GenerationConfig, LlmClient, LlmError};
use hive::state::Phase;
use tokio::io::BufReader;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("LLM setup failed: {0}")]
    Llm(#[from] LlmError),
    #[error("{0}")]
    Submit(#[from] SubmitError),
    #[error("{0}")]
    Generation(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("state encode failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "hive", about = "Ask Your Hive — writing and research help from Gemini")]
struct Cli {
    /// What to do with a submission that arrives while one is still loading.
    #[arg(long, env = "HIVE_SUBMIT_POLICY", value_enum, default_value_t = PolicyArg::Reject)]
    policy: PolicyArg,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    Reject,
    Supersede,
}

impl From<PolicyArg> for SubmitPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Reject => Self::RejectWhileBusy,
            PolicyArg::Supersede => Self::Supersede,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send one prompt and print the answer.
    Ask {
        /// Prompt text; multiple words are joined with spaces.
        #[arg(required = true)]
        prompt: Vec<String>,
        /// Print the settled request state as JSON instead of plain text.
        #[arg(long)]
        json: bool,
    },
    /// Interactive drawer: one prompt per line, `:close` / `:open` / `:quit`.
    Drawer,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // A missing .env file is fine; real env vars still apply.
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    let llm = LlmClient::from_env()?;
    tracing::info!(model = llm.model(), "LLM client initialized");
    let client: Arc<dyn GenerationClient> = Arc::new(llm);
    let config = ControllerConfig { generation: GenerationConfig::FIXED, policy: cli.policy.into() };
    let controller = RequestController::new(client, config);

    match cli.command {
        Command::Ask { prompt, json } => run_ask(&controller, &prompt.join(" "), json).await,
        Command::Drawer => run_drawer(&controller).await,
    }
}

async fn run_ask(controller: &RequestController, prompt: &str, json: bool) -> Result<(), CliError> {
    controller.submit(prompt)?;
    let state = controller.settled().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    }

    match state.phase() {
        Phase::Succeeded => {
            if !json {
                println!("{}", state.result().unwrap_or_default());
            }
            Ok(())
        }
        _ => Err(CliError::Generation(state.error_message().unwrap_or("request did not complete").to_string())),
    }
}

async fn run_drawer(controller: &RequestController) -> Result<(), CliError> {
    let input = BufReader::new(tokio::io::stdin());
    hive::view::run(controller, input, tokio::io::stdout()).await?;
    Ok(())
}
