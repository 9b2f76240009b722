use anyhow::Result;
use flowsmith_graph::{Edge, Engine, LLMConfig, Node, PipelineGraph, RunEvent};
use flowsmith_llm::OpenAIClient;
use std::io::{self, Write};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    println!("╔════════════════════════════════════════════════════════════╗");
    println!("║         Flowsmith Refine Loop - Interactive Demo           ║");
    println!("╚════════════════════════════════════════════════════════════╝");
    println!();
    println!("Each line you type runs through a three-step pipeline:");
    println!("  • Fix spelling and grammar");
    println!("  • Polish repeatedly while the model thinks it can do better");
    println!("  • Route long results to a summarizer");
    println!();
    println!("Type 'exit' to quit");

    let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
        anyhow::anyhow!("OPENAI_API_KEY must be set. Run: export OPENAI_API_KEY=your_key_here")
    })?;

    let client = Arc::new(OpenAIClient::new(api_key)?);
    let engine = Engine::builder()
        .chat_client(client, LLMConfig::new("gpt-4o").with_temperature(0.3))
        .build()?;

    loop {
        print!("\n\x1b[1;36m Text: \x1b[0m");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            println!("\nGoodbye!");
            break;
        }

        let mut events = engine.spawn_run(pipeline(), Some(input.to_string()));

        while let Some(event) = events.recv().await {
            match event {
                RunEvent::InitStream { .. } => {}
                RunEvent::NodeStarted { node_id, node_type } => {
                    print!("\n\x1b[2m▶ {} ({})\x1b[0m", node_id, node_type);
                }
                RunEvent::Iteration { index, continued, .. } => {
                    print!("\n\x1b[1;33m  ↻ iteration {} (continue: {})\x1b[0m", index, continued);
                }
                RunEvent::Condition { result, .. } => {
                    print!("\n\x1b[1;33m  ? condition: {}\x1b[0m", result);
                }
                RunEvent::NodeOutput { .. } => {}
                RunEvent::Error { kind, node_id, message } => {
                    print!(
                        "\n\n\x1b[1;31m❌ {} at {}: {}\x1b[0m",
                        kind,
                        node_id.as_deref().unwrap_or("pipeline"),
                        message
                    );
                }
                RunEvent::EndStream { output, total_duration_ms, .. } => {
                    if let Some(output) = output {
                        print!("\n\n\x1b[1;32mResult:\x1b[0m {}", output);
                    }
                    print!("\n\n\x1b[2m[Completed in {}ms]\x1b[0m", total_duration_ms);
                }
            }
            io::stdout().flush()?;
        }

        println!();
    }

    Ok(())
}

fn pipeline() -> PipelineGraph {
    PipelineGraph::new(
        vec![
            Node::source("input", ""),
            Node::transform("spelling", "Fix spelling and grammar. Reply with the corrected text only."),
            Node::repeat(
                "polish",
                "Improve the clarity of the text. Reply with the improved text only.",
                "Could this text still be made noticeably clearer?",
            ),
            Node::decision("length", "Is the text longer than three sentences?", "summarize", "keep"),
            Node::transform("summarize", "Summarize this in at most three sentences: {input}"),
            Node::transform("keep", "Return the text exactly as given."),
            Node::sink("output"),
        ],
        vec![
            Edge::new("input", "spelling"),
            Edge::new("spelling", "polish"),
            Edge::new("polish", "length"),
            Edge::new("length", "summarize").with_handle("true"),
            Edge::new("length", "keep").with_handle("false"),
            Edge::new("summarize", "output"),
            Edge::new("keep", "output"),
        ],
    )
}
