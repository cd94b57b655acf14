use clap::{Arg, ArgAction, Command};
use neural_translate::command::{self, HELP, Input};
use neural_translate::mt::{LibreTranslateProvider, MachineTranslator, MockMode, MockTranslator};
use neural_translate::platform::{
    Clipboard, EspeakPlayer, MemoryClipboard, NoClipboard, NoSpeech, RecordingSpeech,
    SpeechPlayer, SystemClipboard,
};
use neural_translate::{ControllerConfig, SessionState, Status, TranslationController, catalog};
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    let matches = Command::new("neural-translate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Live translation in the terminal")
        .arg(
            Arg::new("message")
                .help("Text to translate once (omit for an interactive session)")
                .index(1),
        )
        .arg(
            Arg::new("source-locale")
                .long("source")
                .short('s')
                .help("Source language code (default: en)"),
        )
        .arg(
            Arg::new("target-locale")
                .long("target")
                .short('t')
                .help("Target language code (default: es)"),
        )
        .arg(
            Arg::new("mock")
                .long("mock")
                .short('m')
                .help("Use mock translator, speech and clipboard")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("speak")
                .long("speak")
                .help("Read the translation aloud")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("copy")
                .long("copy")
                .short('c')
                .help("Copy the translation to the clipboard")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("list-languages")
                .long("list-languages")
                .short('l')
                .help("List supported languages and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show detailed translation process")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");
    init_tracing(verbose);

    if matches.get_flag("list-languages") {
        print_languages();
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = ControllerConfig::from_env();
    if let Some(code) = matches.get_one::<String>("source-locale") {
        config.default_source = command::language_code(code)?;
    }
    if let Some(code) = matches.get_one::<String>("target-locale") {
        config.default_target = command::language_code(code)?;
    }

    let (translator, speech, clipboard): (
        Arc<dyn MachineTranslator>,
        Arc<dyn SpeechPlayer>,
        Arc<dyn Clipboard>,
    ) = if matches.get_flag("mock") {
        (
            Arc::new(MockTranslator::with_delay(MockMode::Suffix, 300)),
            Arc::new(RecordingSpeech::new()),
            Arc::new(MemoryClipboard::new()),
        )
    } else {
        let provider = LibreTranslateProvider::from_env()
            .map_err(|e| format!("Failed to initialize translator: {}", e))?;
        let speech: Arc<dyn SpeechPlayer> = match EspeakPlayer::detect() {
            Some(player) => Arc::new(player),
            None => {
                warn!("No espeak-ng binary found; speech is disabled");
                Arc::new(NoSpeech)
            }
        };
        let clipboard: Arc<dyn Clipboard> = match SystemClipboard::detect() {
            Some(clipboard) => Arc::new(clipboard),
            None => {
                warn!("No system clipboard found; copy is disabled");
                Arc::new(NoClipboard)
            }
        };
        (Arc::new(provider), speech, clipboard)
    };
    info!(provider = translator.provider_name(), speech = speech.name(), "Starting session");

    let controller = TranslationController::new(translator, speech, clipboard, config);

    match matches.get_one::<String>("message") {
        Some(message) => {
            let succeeded = run_once(
                &controller,
                message,
                matches.get_flag("speak"),
                matches.get_flag("copy"),
                verbose,
            )
            .await?;
            Ok(if succeeded {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        None => {
            run_interactive(&controller).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose {
        "neural_translate=debug,warn"
    } else {
        "neural_translate=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_languages() {
    for language in catalog::languages() {
        println!("{:4} {:12} {}", language.code, language.name, language.speech_locale);
    }
}

/// Translate `message` once. Session errors are printed here and reported
/// as `Ok(false)`; only I/O problems come back as `Err`.
async fn run_once(
    controller: &TranslationController,
    message: &str,
    speak: bool,
    copy: bool,
    verbose: bool,
) -> Result<bool, Box<dyn Error>> {
    let config = controller.config();
    if verbose {
        println!("📝 Source: \"{}\"", message);
        println!(
            "🌍 {} → {}",
            catalog::display_name(&config.default_source),
            catalog::display_name(&config.default_target)
        );
        println!();
    }

    controller.set_source_text(message);
    let state = controller.translate_now().await;
    if let Some(err) = state.error {
        eprintln!("❌ {}", err);
        return Ok(false);
    }
    if state.status != Status::Done {
        // Blank input: nothing to print
        return Ok(true);
    }
    println!("{}", state.translated_text);

    if copy {
        if let Err(err) = controller.copy() {
            eprintln!("❌ {}", err);
            return Ok(false);
        }
        if verbose {
            println!("📋 Copied successfully!");
        }
    }

    if speak {
        if let Err(err) = controller.speak_translation() {
            eprintln!("❌ {}", err);
            return Ok(false);
        }
        while controller.is_speaking() {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    Ok(true)
}

async fn run_interactive(controller: &TranslationController) -> Result<(), Box<dyn Error>> {
    let state = controller.snapshot();
    println!(
        "🌐 {} → {}. Type text to translate, :help for commands.",
        catalog::display_name(&state.source_lang),
        catalog::display_name(&state.target_lang)
    );

    let renderer = tokio::spawn(render(controller.subscribe()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match command::parse(&line) {
            Ok(Input::Quit) => break,
            Ok(input) => apply(controller, input),
            Err(e) => eprintln!("⚠️  {}", e),
        }
    }

    controller.shutdown();
    renderer.abort();
    Ok(())
}

fn apply(controller: &TranslationController, input: Input) {
    // Failures land in the session error and are printed by the renderer
    match input {
        Input::Text(text) => controller.set_source_text(text),
        Input::Source(code) => controller.set_source_lang(code),
        Input::Target(code) => controller.set_target_lang(code),
        Input::Swap => {
            let _ = controller.swap();
        }
        Input::Clear => controller.clear(),
        Input::Copy => {
            let _ = controller.copy();
        }
        Input::SpeakTranslation => {
            let _ = controller.speak_translation();
        }
        Input::SpeakSource => {
            let _ = controller.speak_source();
        }
        Input::Theme => {
            controller.toggle_dark_mode();
        }
        Input::Languages => print_languages(),
        Input::Help => println!("{}", HELP),
        Input::Quit => {}
    }
}

async fn render(mut rx: watch::Receiver<SessionState>) {
    let mut last = rx.borrow_and_update().clone();
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        for line in describe_changes(&last, &state) {
            println!("{}", line);
        }
        last = state;
    }
}

/// Lines to print for the transition from `prev` to `next`
fn describe_changes(prev: &SessionState, next: &SessionState) -> Vec<String> {
    let mut lines = Vec::new();

    if (&prev.source_lang, &prev.target_lang) != (&next.source_lang, &next.target_lang) {
        lines.push(format!(
            "🌍 {} → {}",
            catalog::display_name(&next.source_lang),
            catalog::display_name(&next.target_lang)
        ));
        if prev.source_text != next.source_text && next.has_source_text() {
            lines.push(format!("📝 {}", next.source_text));
        }
    }

    if prev.has_source_text() && next.source_text.is_empty() && next.translated_text.is_empty() {
        lines.push("🧹 Cleared".to_string());
    }

    if next.status != prev.status && next.is_loading() {
        lines.push(format!("⏳ Translating {} characters...", next.char_count()));
    }

    if next.status == Status::Done
        && (prev.status != Status::Done || prev.translated_text != next.translated_text)
    {
        lines.push(format!("✅ {}", next.translated_text));
    }

    if next.error != prev.error {
        if let Some(err) = &next.error {
            lines.push(format!("❌ {}", err));
        }
    }

    if next.copied && !prev.copied {
        lines.push("📋 Copied successfully!".to_string());
    }

    if next.dark_mode != prev.dark_mode {
        let theme = if next.dark_mode { "dark" } else { "light" };
        lines.push(format!("🌓 Theme: {}", theme));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use neural_translate::AppError;

    fn typed(text: &str) -> SessionState {
        let mut state = SessionState::default();
        state.source_text = text.to_string();
        state
    }

    #[test]
    fn test_describe_result_and_copy() {
        let mut prev = typed("Hello");
        prev.status = Status::Pending;
        let mut next = prev.clone();
        next.translated_text = "Hola".to_string();
        next.status = Status::Done;
        next.copied = true;

        assert_eq!(
            describe_changes(&prev, &next),
            vec!["✅ Hola".to_string(), "📋 Copied successfully!".to_string()]
        );
    }

    #[test]
    fn test_describe_pending_counts_characters() {
        let prev = typed("こんにちは");
        let mut next = prev.clone();
        next.status = Status::Pending;

        assert_eq!(
            describe_changes(&prev, &next),
            vec!["⏳ Translating 5 characters...".to_string()]
        );
    }

    #[test]
    fn test_describe_error_once() {
        let prev = SessionState::default();
        let mut next = prev.clone();
        next.error = Some(AppError::NothingToSwap);

        assert_eq!(
            describe_changes(&prev, &next),
            vec!["❌ Nothing to swap. Please enter some text first.".to_string()]
        );
        assert!(describe_changes(&next, &next.clone()).is_empty());
    }

    fn mock_controller(clipboard: MemoryClipboard) -> TranslationController {
        TranslationController::new(
            Arc::new(MockTranslator::new(MockMode::Suffix)),
            Arc::new(RecordingSpeech::new()),
            Arc::new(clipboard),
            ControllerConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_run_once_reports_success() {
        let controller = mock_controller(MemoryClipboard::new());
        let succeeded = run_once(&controller, "Hello", false, true, false).await.unwrap();
        assert!(succeeded);
        assert_eq!(controller.snapshot().translated_text, "Hello_es");
    }

    #[tokio::test]
    async fn test_run_once_session_error_is_failure_not_err() {
        let controller = mock_controller(MemoryClipboard::new());
        controller.set_target_lang("en");
        let outcome = run_once(&controller, "Hello", false, false, false).await;
        assert!(matches!(outcome, Ok(false)));
        assert_eq!(controller.snapshot().error, Some(AppError::SameLanguage));
    }

    #[tokio::test]
    async fn test_run_once_copy_failure_is_failure_not_err() {
        let controller = mock_controller(MemoryClipboard::denied());
        let outcome = run_once(&controller, "Hello", false, true, false).await;
        assert!(matches!(outcome, Ok(false)));
    }

    #[test]
    fn test_describe_swap() {
        let mut prev = typed("Hello");
        prev.translated_text = "Hola".to_string();
        prev.status = Status::Done;
        let mut next = prev.clone();
        next.source_lang = "es".to_string();
        next.target_lang = "en".to_string();
        next.source_text = "Hola".to_string();
        next.translated_text = "Hello".to_string();

        assert_eq!(
            describe_changes(&prev, &next),
            vec![
                "🌍 Spanish → English".to_string(),
                "📝 Hola".to_string(),
                "✅ Hello".to_string(),
            ]
        );
    }
}
