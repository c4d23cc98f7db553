use crate::core::engine;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tubechat")]
#[command(about = "Chat with a YouTube video's captions")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// OpenAI API key (overrides the OPENAI_API_KEY environment variable)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Model used for completions
    #[arg(short, long, global = true, default_value = engine::DEFAULT_MODEL)]
    pub model: String,

    /// Preferred caption languages (comma-separated)
    #[arg(short, long, global = true, default_value = crate::core::transcript::DEFAULT_LANGUAGES)]
    pub languages: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a single question about a video and print the answer
    Ask {
        /// YouTube video URL
        url: String,

        /// Question about the video content
        question: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a concise summary of a video
    Summary {
        /// YouTube video URL
        url: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open the interactive chat interface
    Chat {
        /// YouTube video URL to process on startup
        url: Option<String>,
    },
}

impl Cli {
    pub fn language_list(&self) -> Vec<String> {
        self.languages
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    #[test]
    fn parses_language_list() {
        let cli = Cli::parse_from(["tubechat", "--languages", "en, es,,de"]);
        assert_eq!(cli.language_list(), ["en", "es", "de"]);
    }

    #[test]
    fn ask_takes_url_and_question() {
        let cli = Cli::parse_from(["tubechat", "ask", "https://youtu.be/abcdefghijk", "topic?"]);
        match cli.command {
            Some(super::Commands::Ask { url, question, json }) => {
                assert_eq!(url, "https://youtu.be/abcdefghijk");
                assert_eq!(question, "topic?");
                assert!(!json);
            }
            _ => panic!("expected ask subcommand"),
        }
    }
}
