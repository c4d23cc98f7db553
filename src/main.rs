mod cli;
mod core;
mod error;
mod tui;

use crate::cli::{Cli, Commands};
use crate::core::{QueryEngine, TranscriptService, engine, extract_video_id};
use crate::error::{Error, Result};
use crate::tui::{App, EventHandler, init as tui_init, restore as tui_restore, ui};
use clap::Parser;
use serde::Serialize;

#[derive(Serialize)]
struct AnswerRecord {
    video_id: String,
    question: String,
    answer: String,
}

#[derive(Serialize)]
struct SummaryRecord {
    video_id: String,
    summary: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let languages = cli.language_list();

    match cli.command {
        Some(Commands::Ask { url, question, json }) => {
            run_ask(&url, &question, cli.api_key, &cli.model, &languages, json).await?;
        }
        Some(Commands::Summary { url, json }) => {
            run_summary(&url, cli.api_key, &cli.model, &languages, json).await?;
        }
        Some(Commands::Chat { url }) => {
            run_chat(cli.api_key, cli.model, languages, url).await?;
        }
        None => {
            run_chat(cli.api_key, cli.model, languages, None).await?;
        }
    }

    Ok(())
}

async fn build_engine(
    url: &str,
    api_key: Option<String>,
    model: &str,
    languages: &[String],
) -> Result<(String, QueryEngine)> {
    let video_id = extract_video_id(url).ok_or(Error::InvalidUrl)?;

    let language_refs: Vec<&str> = languages.iter().map(String::as_str).collect();
    let transcript = TranscriptService::new()?
        .fetch_text(&video_id, &language_refs)
        .await?;

    let engine = QueryEngine::new(&transcript, api_key, model)?;
    Ok((video_id, engine))
}

async fn run_ask(
    url: &str,
    question: &str,
    api_key: Option<String>,
    model: &str,
    languages: &[String],
    json: bool,
) -> Result<()> {
    let (video_id, engine) = build_engine(url, api_key, model, languages).await?;
    let answer = engine.query(question).await?;

    if json {
        let record = AnswerRecord {
            video_id,
            question: question.to_string(),
            answer,
        };
        println!("{}", serde_json::to_string_pretty(&record).expect("serializable record"));
    } else {
        println!("{answer}");
    }

    Ok(())
}

async fn run_summary(
    url: &str,
    api_key: Option<String>,
    model: &str,
    languages: &[String],
    json: bool,
) -> Result<()> {
    let (video_id, engine) = build_engine(url, api_key, model, languages).await?;
    let summary = engine.summarize().await?;

    if json {
        let record = SummaryRecord { video_id, summary };
        println!("{}", serde_json::to_string_pretty(&record).expect("serializable record"));
    } else {
        println!("{summary}");
    }

    Ok(())
}

async fn run_chat(
    api_key: Option<String>,
    model: String,
    languages: Vec<String>,
    url: Option<String>,
) -> Result<()> {
    // Resolve the credential before touching the terminal: a missing key is
    // a fatal configuration error, not something to discover mid-session.
    let api_key = engine::resolve_api_key(api_key)?;

    let mut terminal = tui_init()?;

    let mut app = App::new(api_key, model, languages)?;
    if let Some(url) = url {
        app.submit_url(&url);
    }

    let event_handler = EventHandler::new();

    loop {
        let event = event_handler.next_event()?;
        app.handle_event(event)?;

        terminal.draw(|f| {
            ui::draw(f, &mut app);
        })?;

        if app.should_quit {
            break;
        }
    }

    tui_restore()?;
    Ok(())
}
