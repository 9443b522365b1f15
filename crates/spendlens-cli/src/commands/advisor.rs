//! Advisor commands: ask, config

use std::path::Path;

use anyhow::{Context, Result};
use spendlens_core::config::{ENV_API_KEY, ENV_BASE_URL, ENV_MODEL};
use spendlens_core::{Advice, Advisor, AdvisorConfig, PromptId, PromptLibrary};

use super::ledger::load_session;
use crate::cli::LedgerArgs;

/// Resolve config and build an advisor, with the CLI's error context
pub fn build_advisor(config_path: Option<&Path>, recent: Option<usize>) -> Result<Advisor> {
    let config = AdvisorConfig::load(config_path).context("Failed to load advisor config")?;
    let advisor = Advisor::from_config(&config).context("Advisor is not configured")?;
    Ok(match recent {
        Some(n) => advisor.with_recent_limit(n),
        None => advisor,
    })
}

pub async fn cmd_ask(
    config_path: Option<&Path>,
    args: &LedgerArgs,
    recent: Option<usize>,
    question: &str,
) -> Result<Advice> {
    let mut session = load_session(args)?;
    let advisor = build_advisor(config_path, recent)?;

    println!("🤖 Asking the advisor...");
    let advice = session.ask(&advisor, question).await;
    match advice {
        Advice::Reply(ref reply) => {
            println!();
            println!("{}", reply);
        }
        Advice::Failed(_) => eprintln!("{}", advice),
    }

    Ok(advice)
}

pub fn cmd_config(config_path: Option<&Path>) -> Result<()> {
    let config = AdvisorConfig::load(config_path).context("Failed to load advisor config")?;
    let provider = &config.provider;

    println!();
    println!("⚙️  Advisor Configuration");
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Source:       {}", config.source);
    println!("   Provider:     {} ({})", config.provider_name, provider.envelope);
    println!("   Endpoint:     {}", provider.endpoint());
    println!("   Model:        {}", provider.model);
    println!("   Max tokens:   {}", provider.max_tokens);
    println!("   Temperature:  {}", provider.temperature);
    println!("   Timeout:      {}s", config.timeout.as_secs());
    println!("   Recent limit: {}", config.recent_limit);

    match (&config.api_key, provider.requires_key) {
        (Some(key), _) => println!("   API key:      {}", key.masked()),
        (None, true) => println!("   API key:      ❌ not set (set {})", ENV_API_KEY),
        (None, false) => println!("   API key:      not required"),
    }

    let prompts = PromptLibrary::new();
    match prompts.override_dir() {
        Some(dir) if prompts.has_override(PromptId::FinancialAdvice) => println!(
            "   Prompt:       {} (override in {})",
            PromptId::FinancialAdvice.as_str(),
            dir.display()
        ),
        Some(dir) => println!("   Prompt:       built-in (overrides go in {})", dir.display()),
        None => println!("   Prompt:       built-in"),
    }

    println!();
    println!("   Environment overrides: {}, {}, {}", ENV_API_KEY, ENV_MODEL, ENV_BASE_URL);

    Ok(())
}
