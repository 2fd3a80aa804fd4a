//! Page loop for the interactive terminal session.

use std::io::Write;
use std::path::Path;

use super::assistant::{AssistantPage, run_assistant};
use super::form::run_form;
use super::input::LineInput;
use super::narration::{Narration, Press};
use super::render::render_itinerary;
use crate::api::ModelBackend;
use crate::app::{App, Page};
use crate::audio::utils::save_wav;
use crate::audio::AudioPlayer;
use crate::config::Config;

pub const ABOUT: &str = "Atlas Voyager plans trips across Morocco. Pick the cities and \
experiences you care about, and a Gemini model drafts a day-by-day itinerary with places \
to stay and eat. Listen to a spoken summary of the plan, or ask Atlas, our virtual guide, \
anything about Moroccan culture, food and logistics by text or by voice.";

/// Prints the day-count notice (if any) and the rendered itinerary.
pub fn print_itinerary(app: &App, out: &mut impl Write) -> std::io::Result<()> {
    let Some(itinerary) = app.itinerary() else {
        return Ok(());
    };
    let lines = render_itinerary(itinerary);
    let mut lines = lines.iter();
    // The notice sits directly under the title.
    for line in lines.by_ref().take(2) {
        writeln!(out, "{}", line)?;
    }
    if let Some(notice) = app.day_notice() {
        writeln!(out, "({})", notice)?;
    }
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

fn home_page(app: &mut App, input: &mut dyn LineInput, out: &mut impl Write) -> std::io::Result<bool> {
    writeln!(out)?;
    writeln!(out, "Atlas Voyager - discover the magic of Morocco")?;
    writeln!(out, "  1. Plan a trip")?;
    writeln!(out, "  2. Talk to Atlas")?;
    writeln!(out, "  3. About")?;
    writeln!(out, "  q. Quit")?;
    write!(out, "> ")?;
    out.flush()?;

    let Some(choice) = input.read_line() else {
        return Ok(false);
    };
    match choice.trim() {
        "1" => app.navigate(Page::Form),
        "2" => app.navigate(Page::Assistant),
        "3" => app.navigate(Page::About),
        "q" | "quit" => return Ok(false),
        other => writeln!(out, "  unknown choice '{}'", other)?,
    }
    Ok(true)
}

fn form_page(
    app: &mut App,
    backend: &dyn ModelBackend,
    config: &Config,
    input: &mut dyn LineInput,
    out: &mut impl Write,
) -> std::io::Result<()> {
    app.banner().show(out)?;
    match run_form(input, out)? {
        Some(prefs) => {
            writeln!(out, "Consulting the spirits of travel...")?;
            app.generate(backend, config, &prefs);
        }
        None => app.navigate(Page::Home),
    }
    Ok(())
}

fn itinerary_page(
    app: &mut App,
    backend: &dyn ModelBackend,
    config: &Config,
    input: &mut dyn LineInput,
    out: &mut impl Write,
) -> std::io::Result<()> {
    let summary = app.itinerary().map(|i| i.summary.clone()).unwrap_or_default();
    let mut narration = Narration::new();
    let mut player: Option<AudioPlayer> = None;

    print_itinerary(app, out)?;
    loop {
        app.banner().show(out)?;
        writeln!(out, "[n] narrate  [s <file.wav>] save narration  [r] new plan  [h] home")?;
        write!(out, "itinerary> ")?;
        out.flush()?;
        let Some(line) = input.read_line() else {
            app.navigate(Page::Home);
            break;
        };
        let line = line.trim();

        match line {
            "n" => {
                if player.is_none() {
                    match AudioPlayer::open() {
                        Ok(p) => player = Some(p),
                        Err(e) => {
                            app.reporter().report(&e);
                            continue;
                        }
                    }
                }
                let Some(sink) = player.as_mut() else { continue };
                match narration.toggle(backend, config, &summary, sink) {
                    Ok(Press::Fetch) => writeln!(out, "Playing summary...")?,
                    Ok(Press::Stopped) => writeln!(out, "Stopped.")?,
                    Ok(Press::Busy) => writeln!(out, "Still loading...")?,
                    Err(e) => app.reporter().report(&e),
                }
            }
            "r" => {
                app.reset();
                break;
            }
            "h" => {
                app.navigate(Page::Home);
                break;
            }
            _ if line.starts_with("s ") => {
                let path = Path::new(line[2..].trim());
                match narration.audio() {
                    Some(audio) => match save_wav(audio, path) {
                        Ok(()) => writeln!(out, "Saved narration to {}", path.display())?,
                        Err(e) => app.reporter().report(&e),
                    },
                    None => writeln!(out, "Play the narration first.")?,
                }
            }
            "" => {}
            other => writeln!(out, "  unknown command '{}'", other)?,
        }
    }

    if let Some(mut p) = player.take() {
        p.close();
    }
    Ok(())
}

/// Runs pages until the user quits or input ends.
pub fn run_shell(
    app: &mut App,
    backend: &dyn ModelBackend,
    config: &Config,
    input: &mut dyn LineInput,
    out: &mut impl Write,
) -> std::io::Result<()> {
    crate::log_info!("[Shell] Interactive session started");
    loop {
        match app.page {
            Page::Home => {
                if !home_page(app, input, out)? {
                    break;
                }
            }
            Page::Form => form_page(app, backend, config, input, out)?,
            Page::Itinerary => itinerary_page(app, backend, config, input, out)?,
            Page::Assistant => {
                let mut page = AssistantPage::new(&config.text_model);
                run_assistant(&mut page, backend, config, input, out, app.reporter())?;
                app.banner().show(out)?;
                app.navigate(Page::Home);
            }
            Page::About => {
                writeln!(out)?;
                for line in textwrap::wrap(ABOUT, 76) {
                    writeln!(out, "{}", line)?;
                }
                app.navigate(Page::Home);
            }
        }
    }
    Ok(())
}
