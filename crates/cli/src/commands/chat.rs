use std::io::Write;

use anyhow::Result;
use frajola_agent::{ConversationView, RenderSink};
use frajola_core::{normalize, MenuCatalog};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use super::{current_thread_runtime, Assistant, CommandResult, Session};

const COMMAND: &str = "chat";
const EXIT_WORD: &str = "sair";

/// Prints bot messages as they appear in the conversation log.
pub struct TranscriptPrinter<W> {
    out: W,
    assistant_name: String,
    printed: usize,
}

impl<W: Write> TranscriptPrinter<W> {
    pub fn new(out: W, assistant_name: impl Into<String>) -> Self {
        Self { out, assistant_name: assistant_name.into(), printed: 0 }
    }
}

impl<W: Write> RenderSink for TranscriptPrinter<W> {
    fn render(&mut self, view: &ConversationView<'_>) -> Result<()> {
        let start = self.printed.min(view.messages.len());
        for message in view.messages[start..].iter().filter(|message| message.is_bot()) {
            writeln!(self.out, "{}: {}", self.assistant_name, message.text)?;
        }
        self.printed = view.messages.len();

        if view.awaiting_completion {
            writeln!(self.out, "({} está digitando...)", self.assistant_name)?;
        }
        self.out.flush()?;
        Ok(())
    }
}

pub fn run() -> CommandResult {
    let stdout = std::io::stdout();
    run_with_io(BufReader::new(tokio::io::stdin()), stdout.lock())
}

/// Runs the interactive loop until `sair` or end of input.
pub fn run_with_io<R, W>(input: R, output: W) -> CommandResult
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let assistant = match Assistant::load(COMMAND) {
        Ok(assistant) => assistant,
        Err(result) => return result,
    };
    let mut session = match assistant.session(COMMAND) {
        Ok(session) => session,
        Err(result) => return result,
    };
    let runtime = match current_thread_runtime(COMMAND) {
        Ok(runtime) => runtime,
        Err(result) => return result,
    };

    let mut printer = TranscriptPrinter::new(output, &assistant.config.dialogue.assistant_name);
    let conversation = converse(&mut session, &assistant.catalog, input, &mut printer);
    match runtime.block_on(conversation) {
        Ok(turns) => {
            CommandResult::success(COMMAND, format!("conversation ended after {turns} turns"))
        }
        Err(error) => CommandResult::failure(COMMAND, "io", error.to_string(), 1),
    }
}

async fn converse<R, W>(
    session: &mut Session,
    catalog: &MenuCatalog,
    input: R,
    printer: &mut TranscriptPrinter<W>,
) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    printer.render(&session.view())?;

    let mut turns = 0;
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if normalize(text) == EXIT_WORD {
            break;
        }
        session.handle_message_with_sink(text, catalog, printer).await?;
        turns += 1;
    }
    Ok(turns)
}
