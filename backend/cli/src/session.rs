use std::future::Future;
use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

use relay_agent::TurnPipeline;
use relay_core::ChatMessage;

/// Command that ends the session cleanly.
pub const EXIT_COMMAND: &str = "exit";

/// Whether a line is the exit sentinel. Checked before any pipeline work.
pub fn is_exit_command(line: &str) -> bool {
    line.trim() == EXIT_COMMAND
}

/// The interactive loop: one pipeline turn per input line, full history
/// re-fed each turn. Ends on the exit sentinel, end of input, or ctrl-c.
pub async fn run(pipeline: TurnPipeline) -> Result<()> {
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    run_loop(pipeline, BufReader::new(tokio::io::stdin()), shutdown).await
}

/// One shutdown future for the whole session, selected against both the
/// line read and the in-flight turn. A ctrl-c that lands while a turn is
/// running ends the session, not just one that lands at the prompt.
async fn run_loop<R, S>(pipeline: TurnPipeline, input: R, shutdown: S) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = input.lines();
    let mut history: Vec<ChatMessage> = Vec::new();
    tokio::pin!(shutdown);

    println!("Type '{}' or press CTRL+C to quit.", EXIT_COMMAND);

    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            _ = &mut shutdown => {
                println!();
                info!("session interrupted");
                break;
            }
            line = lines.next_line() => line?,
        };

        let Some(line) = line else {
            break; // end of input
        };
        if is_exit_command(&line) {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        history.push(ChatMessage::user(line));
        let outcome = tokio::select! {
            _ = &mut shutdown => {
                println!();
                info!("session interrupted");
                break;
            }
            outcome = pipeline.run_turn(history.clone()) => outcome?,
        };
        println!("Assistant: {}", outcome.response);
        history.push(ChatMessage::assistant(outcome.response));
    }

    Ok(())
}
