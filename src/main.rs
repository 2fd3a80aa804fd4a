use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use atlas_voyager::api::GeminiClient;
use atlas_voyager::app::App;
use atlas_voyager::audio::AudioPlayer;
use atlas_voyager::audio::utils::save_wav;
use atlas_voyager::config::{Config, load_config, resolve_api_key};
use atlas_voyager::model::BudgetTier;
use atlas_voyager::ui::assistant::{AssistantPage, run_assistant};
use atlas_voyager::ui::form::preselect;
use atlas_voyager::ui::input::{LineInput, StdinLines};
use atlas_voyager::ui::narration::Narration;
use atlas_voyager::ui::shell::{ABOUT, print_itinerary, run_shell};
use atlas_voyager::ui::{Reporter, TerminalReporter};
use atlas_voyager::{AppError, debug_log, log_error, log_info};

/// Plan a trip to Morocco and talk to Atlas, your virtual guide
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Gemini API key (overrides GEMINI_API_KEY / API_KEY and the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Path to an alternative config.json
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Echo log lines to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate an itinerary from flags and print it
    Plan(PlanArgs),

    /// Chat with Atlas by text (type /voice for voice mode)
    Chat,

    /// Talk to Atlas through the microphone
    Voice,

    /// What this tool does
    About,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// City or region to visit (repeatable)
    #[arg(short, long = "destination")]
    destinations: Vec<String>,

    /// Experience to focus on (repeatable)
    #[arg(short, long = "interest")]
    interests: Vec<String>,

    /// Trip length in days (3-21)
    #[arg(long, default_value_t = 7)]
    days: u32,

    /// Number of travelers
    #[arg(short, long, default_value_t = 2)]
    travelers: u32,

    /// Travel style: luxury, budget, balanced or adventure
    #[arg(short, long, default_value = "balanced")]
    budget: BudgetTier,

    /// Special requests
    #[arg(short, long)]
    notes: Option<String>,

    /// Play the spoken summary after printing the plan
    #[arg(long)]
    narrate: bool,

    /// Write the spoken summary to a WAV file
    #[arg(long, value_name = "FILE")]
    save_narration: Option<PathBuf>,

    /// Print the itinerary as JSON
    #[arg(long)]
    json: bool,
}

fn client_for(config: &Config) -> anyhow::Result<GeminiClient> {
    GeminiClient::new(config).map_err(|e| {
        TerminalReporter.report(&e);
        anyhow::Error::new(e)
    })
}

fn run_plan(args: PlanArgs, config: &Config) -> anyhow::Result<()> {
    let mut form = preselect(&args.destinations, &args.interests).map_err(anyhow::Error::msg)?;
    form.set_duration(args.days);
    form.set_travelers(args.travelers);
    form.set_budget(args.budget);
    if let Some(notes) = &args.notes {
        form.set_notes(notes);
    }
    let prefs = form.submit();
    let client = client_for(config)?;

    let mut app = App::new();
    eprintln!("Consulting the spirits of travel...");
    if !app.generate(&client, config, &prefs) || app.itinerary().is_none() {
        if let Some(message) = app.banner().message() {
            eprintln!("!! {}", message);
        }
        anyhow::bail!("itinerary generation failed");
    }
    let Some(itinerary) = app.itinerary() else {
        anyhow::bail!("itinerary generation failed");
    };

    let mut stdout = std::io::stdout();
    if args.json {
        println!("{}", serde_json::to_string_pretty(itinerary)?);
    } else {
        print_itinerary(&app, &mut stdout)?;
    }

    if args.narrate || args.save_narration.is_some() {
        let summary = itinerary.summary.clone();
        narrate(&client, config, &summary, args.narrate, args.save_narration.as_deref())?;
    }
    Ok(())
}

fn narrate(
    client: &GeminiClient,
    config: &Config,
    summary: &str,
    play: bool,
    save_to: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let audio = if play {
        let mut player = AudioPlayer::open().inspect_err(|e| TerminalReporter.report(e))?;
        let mut narration = Narration::new();
        if let Err(e) = narration.toggle(client, config, summary, &mut player) {
            TerminalReporter.report(&e);
            return Err(e.into());
        }
        eprintln!("Playing summary...");
        player.handle().drain();
        narration.audio().cloned()
    } else {
        let audio = atlas_voyager::api::generate_spoken_summary(client, config, summary)
            .inspect_err(|e| TerminalReporter.report(e))?;
        Some(audio)
    };

    if let (Some(path), Some(audio)) = (save_to, audio) {
        save_wav(&audio, path).with_context(|| format!("writing {}", path.display()))?;
        eprintln!("Saved narration to {}", path.display());
    }
    Ok(())
}

fn run_chat(config: &Config) -> anyhow::Result<()> {
    let client = client_for(config)?;
    let mut page = AssistantPage::new(&config.text_model);
    let mut input = StdinLines::spawn();
    run_assistant(
        &mut page,
        &client,
        config,
        &mut input,
        &mut std::io::stdout(),
        &mut TerminalReporter,
    )?;
    Ok(())
}

fn run_voice(config: &Config) -> anyhow::Result<()> {
    if config.gemini_api_key.trim().is_empty() {
        TerminalReporter.report(&AppError::MissingApiKey);
        anyhow::bail!(AppError::MissingApiKey);
    }
    let mut page = AssistantPage::new(&config.text_model);
    let mut reporter = TerminalReporter;
    if let Err(e) = page.start_voice(config) {
        reporter.report(&e);
        return Err(e.into());
    }
    eprintln!("Connecting... press Enter to hang up.");

    let mut input = StdinLines::spawn();
    while page.voice_active() {
        for event in page.pump_voice(&mut reporter) {
            log_info!("[Voice] {:?}", event);
        }
        if !matches!(
            input.next_line(Duration::from_millis(100)),
            atlas_voyager::ui::input::Line::Pending
        ) {
            break;
        }
    }
    page.leave();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    debug_log::set_verbose(cli.verbose);

    log_info!("========================================");
    log_info!("Atlas Voyager v{} STARTUP", env!("CARGO_PKG_VERSION"));
    log_info!("========================================");

    let mut config = load_config(cli.config.as_deref());
    resolve_api_key(&mut config, cli.api_key.as_deref());

    let result = match cli.command {
        None => {
            let client = client_for(&config)?;
            let mut app = App::new();
            let mut input = StdinLines::spawn();
            run_shell(&mut app, &client, &config, &mut input, &mut std::io::stdout())
                .map_err(anyhow::Error::from)
        }
        Some(Command::Plan(args)) => run_plan(args, &config),
        Some(Command::Chat) => run_chat(&config),
        Some(Command::Voice) => run_voice(&config),
        Some(Command::About) => {
            for line in textwrap::wrap(ABOUT, 76) {
                println!("{}", line);
            }
            Ok(())
        }
    };

    if let Err(e) = &result {
        log_error!("[Main] {:#}", e);
    }
    result
}
