use anyhow::Result;
use flowsmith_llm::{ChatClient, ChatRequest, Message, OpenAIClient};

#[tokio::main]
async fn main() -> Result<()> {
    let api_key = std::env::var("OPENAI_API_KEY")?;
    let client = OpenAIClient::new(api_key)?;

    let request = ChatRequest::new(
        "gpt-4o",
        vec![
            Message::system("Summarize the user's text in one sentence."),
            Message::human("Rust is a systems language focused on safety, speed, and concurrency."),
        ],
    );

    let response = client.chat(request).await?;

    println!("Response: {}", response.content.unwrap_or_default());

    if let Some(usage) = response.usage {
        println!("Tokens used: {}", usage.total_tokens);
    }

    Ok(())
}
