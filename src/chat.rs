use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::Result;
use crate::rag::RagEngine;

fn is_exit(line: &str) -> bool {
    line.is_empty() || line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Answer, then evaluate when something was retrieved.
async fn run_turn<W>(engine: &RagEngine, query: &str, output: &mut W) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let result = engine.query(query).await?;
    output
        .write_all(format!("\nAssistant: {}\n", result.answer).as_bytes())
        .await?;
    output.flush().await?;

    if result.context.is_empty() {
        output
            .write_all("\n[Eval] Skipped – no context was retrieved.\n".as_bytes())
            .await?;
    } else {
        let evaluation = engine.evaluate(query, &result.context, &result.answer).await?;
        output
            .write_all(
                format!(
                    "\n[Eval] Score: {}/10  |  Verdict: {}\n       Reasoning: {}\n",
                    evaluation.score, evaluation.verdict, evaluation.reasoning
                )
                .as_bytes(),
            )
            .await?;
    }
    output.flush().await?;
    Ok(())
}

/// Interactive loop on stdin-style input. Ends on end of input, a blank line,
/// `exit`, `quit` or Ctrl-C; a failed turn is logged and the next prompt is shown.
pub async fn run_chat<R, W>(engine: &RagEngine, input: R, output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    run_chat_until(engine, input, output, interrupt).await
}

/// Same loop as [`run_chat`], stopped early once `shutdown` completes. An
/// in-flight turn is abandoned and a newline ends the transcript.
pub async fn run_chat_until<R, W, S>(
    engine: &RagEngine,
    input: R,
    mut output: W,
    shutdown: S,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    tracing::info!("=== Chat Mode === (type 'exit' or 'quit' to stop)");
    tokio::pin!(shutdown);
    let mut lines = input.lines();

    loop {
        output.write_all(b"\nYou: ").await?;
        output.flush().await?;

        let next = tokio::select! {
            _ = &mut shutdown => None,
            line = lines.next_line() => Some(line?),
        };
        let line = match next {
            None => {
                tracing::info!("Interrupted - exiting chat.");
                output.write_all(b"\n").await?;
                break;
            }
            Some(None) => {
                output.write_all(b"\n").await?;
                break;
            }
            Some(Some(line)) => line,
        };

        let query = line.trim();
        if is_exit(query) {
            tracing::info!("Exiting chat.");
            break;
        }

        let turn = tokio::select! {
            _ = &mut shutdown => None,
            result = run_turn(engine, query, &mut output) => Some(result),
        };
        match turn {
            None => {
                tracing::info!("Interrupted - exiting chat.");
                output.write_all(b"\n").await?;
                break;
            }
            Some(Err(e)) => tracing::error!("Error during chat turn: {}", e),
            Some(Ok(())) => {}
        }
    }

    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_keywords() {
        assert!(is_exit(""));
        assert!(is_exit("exit"));
        assert!(is_exit("QUIT"));
        assert!(!is_exit("exit strategy?"));
    }
}
