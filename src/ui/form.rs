//! Interactive preference form on the terminal.
//!
//! Commands, one per line:
//! `1`-`8` toggle a city, `i1`-`i6` toggle an interest, `+`/`-` adjust the
//! party size, `d <days>`, `t <travelers>`, `b <tier>`, `n <notes>`, `go` to
//! submit and `q` to go back.

use std::io::Write;

use super::input::LineInput;
use crate::model::preferences::catalogue_entry;
use crate::model::{BudgetTier, CITIES, INTERESTS, PreferenceForm, TravelPreferences};

#[derive(Debug, PartialEq)]
pub enum FormCommand {
    Updated,
    Submit,
    Cancel,
    Invalid(String),
}

/// Applies one command line to `form`.
pub fn apply_command(form: &mut PreferenceForm, line: &str) -> FormCommand {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head {
        "go" | "submit" => FormCommand::Submit,
        "q" | "back" => FormCommand::Cancel,
        "+" => {
            form.increment_travelers();
            FormCommand::Updated
        }
        "-" => {
            form.decrement_travelers();
            FormCommand::Updated
        }
        "d" => match rest.parse::<u32>() {
            Ok(days) => {
                form.set_duration(days);
                FormCommand::Updated
            }
            Err(_) => FormCommand::Invalid(format!("'{}' is not a number of days", rest)),
        },
        "t" => match rest.parse::<u32>() {
            Ok(count) => {
                form.set_travelers(count);
                FormCommand::Updated
            }
            Err(_) => FormCommand::Invalid(format!("'{}' is not a number of travelers", rest)),
        },
        "b" => match rest.parse::<BudgetTier>() {
            Ok(tier) => {
                form.set_budget(tier);
                FormCommand::Updated
            }
            Err(e) => FormCommand::Invalid(e),
        },
        "n" => {
            form.set_notes(rest);
            FormCommand::Updated
        }
        _ => {
            if let Some(idx) = head.strip_prefix('i').and_then(|n| n.parse::<usize>().ok()) {
                if let Some(interest) = idx.checked_sub(1).and_then(|i| INTERESTS.get(i)) {
                    form.toggle_interest(interest);
                    return FormCommand::Updated;
                }
            } else if let Some(city) = head
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| CITIES.get(i))
            {
                form.toggle_destination(city);
                return FormCommand::Updated;
            }
            FormCommand::Invalid(format!("unknown command '{}'", line))
        }
    }
}

/// A form with the named cities and interests chosen. Names are matched
/// against the catalogues; repeats are kept once.
pub fn preselect(destinations: &[String], interests: &[String]) -> Result<PreferenceForm, String> {
    let mut form = PreferenceForm::new();
    for name in destinations {
        let city = catalogue_entry(&CITIES, name).ok_or_else(|| {
            format!("unknown destination '{}' (choose from: {})", name, CITIES.join(", "))
        })?;
        form.select_destination(city);
    }
    for name in interests {
        let interest = catalogue_entry(&INTERESTS, name).ok_or_else(|| {
            format!("unknown interest '{}' (choose from: {})", name, INTERESTS.join(", "))
        })?;
        form.select_interest(interest);
    }
    Ok(form)
}

fn mark(selected: bool) -> &'static str {
    if selected { "[x]" } else { "[ ]" }
}

pub fn print_form(form: &PreferenceForm, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Where would you like to go?")?;
    for (i, city) in CITIES.iter().enumerate() {
        writeln!(out, "  {:>2}. {} {}", i + 1, mark(form.is_destination_selected(city)), city)?;
    }
    writeln!(out, "What do you enjoy?")?;
    for (i, interest) in INTERESTS.iter().enumerate() {
        writeln!(out, "  i{}. {} {}", i + 1, mark(form.is_interest_selected(interest)), interest)?;
    }
    let tiers: Vec<&str> = BudgetTier::ALL.iter().map(BudgetTier::as_str).collect();
    writeln!(out, "Duration: {} days   Travelers: {}", form.duration(), form.travelers())?;
    writeln!(out, "Style: {} ({})", form.budget(), tiers.join(" / "))?;
    if !form.notes().is_empty() {
        writeln!(out, "Special requests: {}", form.notes())?;
    }
    writeln!(out, "Commands: <n> city, i<n> interest, +/- travelers, d <days>, b <style>, n <notes>, go, q")
}

/// Runs the form until it is submitted (`Some`) or abandoned (`None`).
/// End of input counts as abandoning.
pub fn run_form(
    input: &mut dyn LineInput,
    out: &mut impl Write,
) -> std::io::Result<Option<TravelPreferences>> {
    let mut form = PreferenceForm::new();
    print_form(&form, out)?;

    loop {
        write!(out, "form> ")?;
        out.flush()?;
        let Some(line) = input.read_line() else {
            return Ok(None);
        };
        match apply_command(&mut form, &line) {
            FormCommand::Submit => return Ok(Some(form.submit())),
            FormCommand::Cancel => return Ok(None),
            FormCommand::Updated => print_form(&form, out)?,
            FormCommand::Invalid(msg) => writeln!(out, "  {}", msg)?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::input::ScriptedLines;

    #[test]
    fn commands_edit_the_form() {
        let mut form = PreferenceForm::new();
        assert_eq!(apply_command(&mut form, "1"), FormCommand::Updated);
        assert_eq!(apply_command(&mut form, "i1"), FormCommand::Updated);
        apply_command(&mut form, "d 40");
        apply_command(&mut form, "b luxury");
        apply_command(&mut form, "-");
        apply_command(&mut form, "-");

        assert_eq!(form.destinations(), ["Marrakech"]);
        assert_eq!(form.interests(), ["Culture & History"]);
        assert_eq!(form.duration(), 21);
        assert_eq!(form.budget(), BudgetTier::Luxury);
        assert_eq!(form.travelers(), 1);
    }

    #[test]
    fn bad_input_is_reported_not_applied() {
        let mut form = PreferenceForm::new();
        assert!(matches!(apply_command(&mut form, "9"), FormCommand::Invalid(_)));
        assert!(matches!(apply_command(&mut form, "i0"), FormCommand::Invalid(_)));
        assert!(matches!(apply_command(&mut form, "d soon"), FormCommand::Invalid(_)));
        assert!(matches!(apply_command(&mut form, "b cheap"), FormCommand::Invalid(_)));
        assert_eq!(form, PreferenceForm::new());
    }

    #[test]
    fn repeated_flags_keep_the_destination() {
        let names = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let form = preselect(&names(&["Fes", "fes", "Marrakech"]), &names(&["Photography"])).unwrap();
        assert_eq!(form.destinations(), ["Fes", "Marrakech"]);

        let prefs = form.submit();
        let prompt = crate::api::itinerary::build_prompt(&prefs);
        assert!(prompt.contains("Fes, Marrakech"));
        assert!(!prompt.contains("Best of Morocco"));
    }

    #[test]
    fn unknown_flag_values_are_refused() {
        let err = preselect(&["Paris".to_string()], &[]).unwrap_err();
        assert!(err.contains("unknown destination 'Paris'"));
        assert!(preselect(&[], &["Skiing".to_string()]).is_err());
    }

    #[test]
    fn scripted_session_submits() {
        let mut input = ScriptedLines::new(["1", "2", "i1", "d 5", "n  quiet riads ", "go"]);
        let mut out = Vec::new();
        let prefs = run_form(&mut input, &mut out).unwrap().unwrap();
        assert_eq!(prefs.destinations, ["Marrakech", "Fes"]);
        assert_eq!(prefs.duration, 5);
        assert_eq!(prefs.notes.as_deref(), Some("quiet riads"));
    }

    #[test]
    fn end_of_input_abandons() {
        let mut input = ScriptedLines::new(["1"]);
        let mut out = Vec::new();
        assert_eq!(run_form(&mut input, &mut out).unwrap(), None);
    }
}
