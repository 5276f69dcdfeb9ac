//! Chat command implementation
//!
//! One-shot with `--message`, otherwise an interactive prompt. Slash commands
//! in the prompt: `/reset`, `/clear`, `/samples`, `/quit`.

use crate::cli::ChatArgs;
use crate::commands::api_client;
use crate::output::OutputWriter;
use crate::output_types::ChatOutput;
use crate::progress::create_spinner;
use anyhow::{bail, Result};
use console::style;
use dialoguer::{Input, Select};
use satlens_core::config::{ChatMode, LayeredConfig};
use satlens_core::models::{ChatMessage, ChatRole};
use satlens_session::chat::SAMPLE_QUESTIONS;
use satlens_session::ChatSession;
use std::sync::Arc;

pub async fn execute(args: ChatArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let mut session = match config.chat_mode.value {
        ChatMode::Demo => ChatSession::demo(config.reply_delay()),
        ChatMode::Live => ChatSession::live(Arc::new(api_client(config)), args.image_id),
    };

    match args.message {
        Some(message) => one_shot(&mut session, &message, output).await,
        None if output.is_json() => {
            bail!("Interactive chat cannot produce JSON output; pass --message")
        }
        None => interactive(&mut session, output).await,
    }
}

async fn one_shot(session: &mut ChatSession, message: &str, output: &OutputWriter) -> Result<()> {
    let Some(reply) = session.send(message).await? else {
        bail!("Message is empty");
    };

    if output.is_json() {
        output.result(ChatOutput {
            reply: reply.content,
            transcript: session.transcript().to_vec(),
        })?;
    } else {
        print_message(&reply);
    }

    Ok(())
}

async fn interactive(session: &mut ChatSession, output: &OutputWriter) -> Result<()> {
    println!("{}", style("SatLens Chat").bold().underlined());
    println!("{}", style("Commands: /samples /reset /clear /quit").dim());
    println!();
    for message in session.transcript() {
        print_message(message);
    }

    loop {
        let line: String = Input::new().with_prompt("You").allow_empty(true).interact_text()?;

        let message = match line.trim() {
            "/quit" | "/exit" => break,
            "/reset" => {
                session.reset();
                output.success("Conversation reset");
                for message in session.transcript() {
                    print_message(message);
                }
                continue;
            }
            "/clear" => {
                session.clear();
                output.success("Conversation cleared");
                continue;
            }
            "/samples" => {
                let picked = Select::new()
                    .with_prompt("Ask a sample question")
                    .items(&SAMPLE_QUESTIONS)
                    .default(0)
                    .interact_opt()?;
                match picked {
                    Some(index) => SAMPLE_QUESTIONS[index].to_string(),
                    None => continue,
                }
            }
            _ => line,
        };

        let spinner = create_spinner("Thinking...");
        let reply = session.send(&message).await;
        spinner.finish_and_clear();

        match reply {
            Ok(Some(reply)) => print_message(&reply),
            Ok(None) => {}
            Err(e) => output.warning(format!("Sorry, I couldn't answer that: {}", e)),
        }
    }

    Ok(())
}

fn print_message(message: &ChatMessage) {
    match message.role {
        ChatRole::Assistant => {
            println!("{} {}\n", style("Assistant:").cyan().bold(), message.content)
        }
        ChatRole::User => println!("{} {}\n", style("You:").green().bold(), message.content),
    }
}
