use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use brailletalk::adapters::gemini::API_KEY_ENV;
use brailletalk::adapters::{GeminiTranslator, ManualRecognizer, TomlConfigStore};
use brailletalk::app::SessionController;
use brailletalk::domain::StateEvent;
use brailletalk::infrastructure::init_logging;
use brailletalk::ports::ConfigStore;

/// Demo frontend: each line typed on stdin is treated as one press-and-hold
/// utterance (this environment has no live speech capability, so a
/// host-driven recognizer stands in for the microphone). The Braille
/// translation is printed above the original text, mirroring the
/// hover-to-reveal display.
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("brailletalk: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config_store = TomlConfigStore::new()?;
    let config = config_store.load()?;

    let _log_guard = init_logging(
        &config_store.logs_dir(),
        &config.logging.level,
        config.logging.file_logging,
    )?;

    info!("BrailleTalk starting up");

    // The API credential is a startup precondition.
    let api_key =
        std::env::var(API_KEY_ENV).with_context(|| format!("{API_KEY_ENV} must be set"))?;

    let translator = Arc::new(GeminiTranslator::new(&config.translation, api_key)?);
    let recognizer = Arc::new(ManualRecognizer::new());
    let controller = Arc::new(SessionController::new(
        Some(recognizer.clone()),
        translator,
    ));
    let _event_loop = controller.spawn_event_loop();

    println!("Type a line of English text and press Enter (empty line to quit).");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        let line = line.trim().to_string();
        if line.is_empty() {
            break;
        }

        let mut events = controller.subscribe();
        controller.request_start().await;
        recognizer.push_segment(&line, true);
        controller.request_stop().await;

        // Wait for this cycle's outcome before prompting again.
        let outcome = tokio::time::timeout(Duration::from_secs(60), async {
            loop {
                match events.recv().await {
                    Ok(StateEvent::TranslationReady { result }) => break Some(result),
                    Ok(StateEvent::Failed { error }) => {
                        eprintln!("{error}");
                        break None;
                    }
                    Ok(_) => continue,
                    Err(_) => break None,
                }
            }
        })
        .await
        .context("timed out waiting for translation")?;

        if let Some(result) = outcome {
            println!("{}", result.braille);
            println!("{}", result.original);
        }
    }

    info!("BrailleTalk shutting down");
    Ok(())
}
