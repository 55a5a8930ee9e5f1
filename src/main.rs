use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use formrecall::client::{InteractionType, ServiceCredentials};
use formrecall::config::Config;
use formrecall::engine::RecallEngine;
use formrecall::keywords::extract_keywords;
use formrecall::logging;

/// Environment variable the service credential provider reads the bearer
/// token from.
const TOKEN_ENV_VAR: &str = "FORMRECALL_STORE_TOKEN";

#[derive(Parser)]
#[command(
    name = "formrecall",
    version,
    about = "Contextual memory retrieval and relevance ranking engine"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract ranked keywords from a prompt (no network call)
    Keywords {
        prompt: String,
    },
    /// Search memories for a prompt and print the ranked results
    Search {
        #[arg(long)]
        user: String,
        prompt: String,
        /// Maximum number of results (default from config)
        #[arg(long)]
        limit: Option<usize>,
        /// Restrict to one memory type (e.g. form_interaction)
        #[arg(long)]
        memory_type: Option<String>,
    },
    /// Print the enhancement context string for a prompt
    Enhance {
        #[arg(long)]
        user: String,
        prompt: String,
    },
    /// Fetch the store's pre-rendered user context for a query
    Context {
        #[arg(long)]
        user: String,
        query: String,
    },
    /// Fetch form interaction history
    History {
        #[arg(long)]
        user: String,
        /// Narrow to a single form
        #[arg(long)]
        form_id: Option<String>,
    },
    /// Fetch stored user preferences
    Preferences {
        #[arg(long)]
        user: String,
    },
    /// Record a form interaction (best-effort)
    TrackInteraction {
        #[arg(long)]
        user: String,
        #[arg(long)]
        form_id: String,
        #[arg(long)]
        title: String,
        /// One of: created, filled, analyzed, viewed, edited
        #[arg(long)]
        interaction_type: InteractionType,
        /// Details as a JSON object
        #[arg(long, default_value = "{}")]
        details: String,
    },
    /// Record a user preference (best-effort)
    TrackPreference {
        #[arg(long)]
        user: String,
        #[arg(long)]
        preference_type: String,
        #[arg(long)]
        value: String,
        #[arg(long)]
        context: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    logging::init_logging(&config);

    let cli = Cli::parse();

    let credentials = Arc::new(ServiceCredentials::new(TOKEN_ENV_VAR));
    let engine = RecallEngine::new(&config, credentials)?;

    match cli.command {
        Commands::Keywords { prompt } => {
            for keyword in extract_keywords(&prompt) {
                println!("{}", keyword);
            }
        }
        Commands::Search { user, prompt, limit, memory_type } => {
            let result = engine
                .search_with_context(&user, &prompt, limit, memory_type.as_deref())
                .await?;
            println!("{} of {} matching memories:", result.records.len(), result.total_count);
            for record in result.records {
                println!("  [{}] {}", record.relevance_score, record.text);
            }
        }
        Commands::Enhance { user, prompt } => {
            let context = engine.get_enhanced_context(&user, &prompt).await;
            if context.is_empty() {
                eprintln!("no enhancement available");
            } else {
                println!("{}", context);
            }
        }
        Commands::Context { user, query } => {
            let ctx = engine.client().get_user_context(&user, &query).await?;
            println!("{} memories", ctx.memories_count);
            println!("{}", ctx.context);
        }
        Commands::History { user, form_id } => {
            let history = engine
                .client()
                .get_form_history(&user, form_id.as_deref())
                .await?;
            println!("{} interactions", history.total_count);
            for interaction in history.interactions {
                println!("{}", serde_json::to_string(&interaction)?);
            }
        }
        Commands::Preferences { user } => {
            let prefs = engine.client().get_user_preferences(&user).await?;
            println!("{} preferences", prefs.total_count);
            println!("{}", serde_json::to_string_pretty(&prefs.preferences)?);
        }
        Commands::TrackInteraction {
            user,
            form_id,
            title,
            interaction_type,
            details,
        } => {
            let details: serde_json::Value = serde_json::from_str(&details)?;
            engine
                .track_form_interaction(&user, &form_id, &title, interaction_type, &details)
                .await;
        }
        Commands::TrackPreference { user, preference_type, value, context } => {
            engine
                .track_user_preference(&user, &preference_type, &value, context.as_deref())
                .await;
        }
    }

    Ok(())
}
