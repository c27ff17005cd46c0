//! Console front end for the classification session.

use std::io::{BufRead, Write};

use workout_core::body_part::BodyPart;
use workout_data::classifier::{Classifier, Decision};

/// Asks the operator for a body part over a line-oriented terminal.
///
/// Each exercise gets a numbered menu of every category. `s` skips the
/// exercise and `q` stops the session. End of input counts as `q`.
pub struct ConsoleClassifier<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsoleClassifier<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn print_menu(&mut self, exercise: &str, remaining: usize) -> std::io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "{exercise} ({remaining} left)")?;
        for (i, part) in BodyPart::ALL.iter().enumerate() {
            writeln!(self.output, "  {:>2}) {}", i + 1, part)?;
        }
        Ok(())
    }

    fn read_choice(&mut self) -> std::io::Result<Option<String>> {
        write!(
            self.output,
            "Body part [1-{}, s=skip, q=quit]: ",
            BodyPart::ALL.len()
        )?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn ask(&mut self, exercise: &str, remaining: usize) -> std::io::Result<Decision> {
        self.print_menu(exercise, remaining)?;
        loop {
            let Some(choice) = self.read_choice()? else {
                return Ok(Decision::Quit);
            };
            if let Some(decision) = parse_choice(&choice) {
                return Ok(decision);
            }
            writeln!(self.output, "Not a valid choice: {choice:?}")?;
        }
    }
}

impl<R: BufRead, W: Write> Classifier for ConsoleClassifier<R, W> {
    fn classify(&mut self, exercise: &str, remaining: usize) -> Decision {
        self.ask(exercise, remaining).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "console unavailable; stopping classification");
            Decision::Quit
        })
    }
}

/// A menu number, a category label, `s` or `q`.
fn parse_choice(choice: &str) -> Option<Decision> {
    match choice.to_lowercase().as_str() {
        "s" | "skip" => return Some(Decision::Skip),
        "q" | "quit" => return Some(Decision::Quit),
        _ => {}
    }
    if let Ok(n) = choice.parse::<usize>() {
        return n
            .checked_sub(1)
            .and_then(|i| BodyPart::ALL.get(i))
            .map(|part| Decision::Assign(*part));
    }
    BodyPart::from_label(choice).map(Decision::Assign)
}
