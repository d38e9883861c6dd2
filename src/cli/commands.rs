//! CLI command implementations.
//!
//! Each command resolves its configuration from explicit flags, then the
//! environment, then compiled-in defaults, and returns its output as a
//! string for `main` to print.

use std::io::{self, BufRead, Write as IoWrite};
use std::path::Path;
use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::agent::{
    AgentConfig, ChefAgent, LlmProvider, Settings, create_provider, execute_with_tools, prompt,
};
use crate::cli::output::{OutputFormat, format_config, format_response, format_search_result};
#[cfg(feature = "mcp")]
use crate::cli::parser::McpCommands;
use crate::cli::parser::{AgentArgs, Cli, Commands};
use crate::error::{CommandError, Result};
use crate::search::{SearchProvider, TavilyClient, WebSearchTool};

/// Executes the CLI command.
///
/// `settings` are read from the environment once at start-up; command-line
/// flags are layered on top of them here.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, a provider call fails,
/// or output cannot be written.
pub fn execute(cli: &Cli, settings: &Settings) -> Result<String> {
    let format = OutputFormat::parse(&cli.format);

    match &cli.command {
        Commands::Ask { ingredients, agent } => {
            cmd_ask(&ingredients.join(" "), agent, settings, cli.verbose, format)
        }
        Commands::Chat { agent } => cmd_chat(agent, settings, cli.verbose, format),
        Commands::Search {
            query,
            max_results,
            depth,
        } => cmd_search(query, *max_results, depth.as_deref(), settings, format),
        Commands::Config { agent } => cmd_config(agent, settings, format),
        Commands::InitPrompt { dir } => cmd_init_prompt(dir.as_deref(), format),
        #[cfg(feature = "mcp")]
        Commands::Mcp(cmd) => cmd_mcp(cmd, settings),
    }
}

// ==================== Wiring ====================

fn runtime() -> Result<tokio::runtime::Runtime> {
    // Create tokio runtime as sync/async bridge
    tokio::runtime::Runtime::new().map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to create async runtime: {e}")).into()
    })
}

/// Builds the Tavily client from the start-up settings plus flag overrides.
fn search_provider(
    settings: &Settings,
    max_results: Option<u32>,
    depth: Option<&str>,
) -> Result<Arc<dyn SearchProvider>> {
    let mut builder = settings.search.clone();
    if let Some(n) = max_results {
        builder = builder.max_results(n);
    }
    if let Some(d) = depth {
        builder = builder.search_depth(d);
    }
    let client = TavilyClient::new(builder.build()?)?;
    Ok(Arc::new(client))
}

/// Resolves the agent configuration.
///
/// System prompt precedence: `--prompt-file`, then `CHEF_SYSTEM_PROMPT_FILE`,
/// then an override file in the prompt directory, then the compiled-in
/// prompt. The last three are already folded into `settings`.
fn agent_config(
    args: &AgentArgs,
    settings: &Settings,
    search: Option<Arc<dyn SearchProvider>>,
) -> Result<AgentConfig> {
    let mut builder = settings.agent.clone();
    if let Some(model) = &args.model {
        builder = builder.model(model);
    }
    if let Some(t) = args.temperature {
        builder = builder.temperature(t);
    }
    if let Some(n) = args.max_tool_iterations {
        builder = builder.max_tool_iterations(n);
    }
    if let Some(path) = &args.prompt_file {
        debug!(path = %path.display(), "using system prompt file");
        builder = builder.system_prompt_file(path);
    }
    if let Some(provider) = search {
        builder = builder.web_search(provider);
    }
    Ok(builder.build()?)
}

fn chef_and_provider(
    args: &AgentArgs,
    settings: &Settings,
) -> Result<(ChefAgent, Box<dyn LlmProvider>, WebSearchTool)> {
    let search = search_provider(settings, args.max_results, None)?;
    let tool = WebSearchTool::new(Arc::clone(&search));
    let config = agent_config(args, settings, Some(search))?;
    let provider = create_provider(&settings.credentials)?;
    debug!(
        provider = provider.name(),
        model = %config.model,
        temperature = config.temperature,
        "agent ready"
    );
    Ok((ChefAgent::new(config), provider, tool))
}

// ==================== Commands ====================

fn cmd_ask(
    ingredients: &str,
    args: &AgentArgs,
    settings: &Settings,
    verbose: bool,
    format: OutputFormat,
) -> Result<String> {
    let (agent, provider, _) = chef_and_provider(args, settings)?;
    let rt = runtime()?;

    let response = rt.block_on(execute_with_tools(&agent, provider.as_ref(), ingredients))?;
    Ok(format_response(
        &response,
        &agent.config().model,
        verbose,
        format,
    ))
}

fn cmd_chat(
    args: &AgentArgs,
    settings: &Settings,
    verbose: bool,
    format: OutputFormat,
) -> Result<String> {
    let (agent, provider, _) = chef_and_provider(args, settings)?;
    let rt = runtime()?;
    let mut conversation = agent.conversation();

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "Personal chef ready. Tell me what you have left over. (/reset to start over, /quit to leave)"
    )
    .map_err(CommandError::Io)?;

    loop {
        write!(stdout, "> ").map_err(CommandError::Io)?;
        stdout.flush().map_err(CommandError::Io)?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).map_err(CommandError::Io)? == 0 {
            break;
        }
        let input = line.trim();
        match input {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" | "/clear" => {
                conversation.clear();
                writeln!(stdout, "(conversation cleared)").map_err(CommandError::Io)?;
                continue;
            }
            _ => {}
        }

        match rt.block_on(agent.respond(provider.as_ref(), &mut conversation, input)) {
            Ok(response) => {
                let text = format_response(&response, &agent.config().model, verbose, format);
                writeln!(stdout, "{text}\n").map_err(CommandError::Io)?;
            }
            // A failed turn leaves the history intact, so the session can go on.
            Err(e) => {
                tracing::error!(error = %e, "turn failed");
                writeln!(stdout, "Error: {e}\n").map_err(CommandError::Io)?;
            }
        }
    }

    Ok(String::new())
}

fn cmd_search(
    query: &str,
    max_results: Option<u32>,
    depth: Option<&str>,
    settings: &Settings,
    format: OutputFormat,
) -> Result<String> {
    let tool = WebSearchTool::new(search_provider(settings, max_results, depth)?);
    let rt = runtime()?;

    let result = rt.block_on(tool.search(query))?;
    Ok(format_search_result(&result, format))
}

fn cmd_config(args: &AgentArgs, settings: &Settings, format: OutputFormat) -> Result<String> {
    // Without a search key the tool list is shown empty rather than failing.
    let search = search_provider(settings, args.max_results, None).ok();
    let config = agent_config(args, settings, search)?;
    Ok(format_config(&config, &settings.credentials, format))
}

fn cmd_init_prompt(dir: Option<&Path>, format: OutputFormat) -> Result<String> {
    let target_dir = dir
        .map(Path::to_path_buf)
        .or_else(prompt::default_dir)
        .ok_or_else(|| {
            CommandError::ExecutionFailed(
                "Could not determine home directory for default prompt path".to_string(),
            )
        })?;

    let (path, written) = prompt::write_default(&target_dir).map_err(|e| {
        CommandError::ExecutionFailed(format!("Failed to write prompt file: {e}"))
    })?;

    match format {
        OutputFormat::Text => Ok(if written {
            format!(
                "Wrote system prompt to: {}\n\nEdit this file to customize the chef.",
                path.display()
            )
        } else {
            format!("System prompt already exists: {}", path.display())
        }),
        OutputFormat::Json => serde_json::to_string_pretty(&json!({
            "path": path.to_string_lossy(),
            "written": written,
        }))
        .map_err(|e| CommandError::OutputFormat(format!("JSON serialization failed: {e}")).into()),
    }
}

/// Starts the MCP server with the specified transport.
///
/// Runs until the client disconnects (stdio) or the process is interrupted
/// (http).
#[cfg(feature = "mcp")]
fn cmd_mcp(cmd: &McpCommands, settings: &Settings) -> Result<String> {
    use crate::mcp::{ChefMcpServer, serve_http, serve_stdio};

    let McpCommands::Serve {
        transport,
        host,
        port,
        agent,
    } = cmd;

    let (chef, provider, search) = chef_and_provider(agent, settings)?;
    let server = ChefMcpServer::new(chef, Arc::from(provider), search);
    let rt = runtime()?;

    rt.block_on(async {
        match transport.as_str() {
            "stdio" => serve_stdio(server).await,
            "http" => serve_http(server, host, *port).await,
            other => Err(anyhow::anyhow!(
                "unknown transport '{other}' (expected stdio or http)"
            )),
        }
    })
    .map_err(|e| CommandError::ExecutionFailed(format!("MCP server error: {e}")))?;

    Ok(String::new())
}
