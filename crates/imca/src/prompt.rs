//! Interactive answers to run decisions.

use std::io::{BufRead, Write};

use rhizome_imca_rps::{ExistingOutput, ResumeChoice, RunDecider};
use tracing::warn;

/// Asks on a terminal unless an answer was fixed up front.
///
/// Unrecognized answers and I/O failures abort.
pub struct PromptDecider<R, W> {
    input: R,
    output: W,
    existing: Option<ExistingOutput>,
    resume: Option<ResumeChoice>,
}

impl<R: BufRead, W: Write> PromptDecider<R, W> {
    pub fn new(
        input: R,
        output: W,
        existing: Option<ExistingOutput>,
        resume: Option<ResumeChoice>,
    ) -> Self {
        Self {
            input,
            output,
            existing,
            resume,
        }
    }

    fn ask(&mut self, question: &str) -> String {
        let mut line = String::new();
        let read = write!(self.output, "{question} ")
            .and_then(|_| self.output.flush())
            .and_then(|_| self.input.read_line(&mut line));
        if let Err(e) = read {
            warn!(error = %e, "cannot read answer");
            return String::new();
        }
        line.trim().to_lowercase()
    }
}

impl<R: BufRead, W: Write> RunDecider for PromptDecider<R, W> {
    fn existing_output(&mut self, location: &str) -> ExistingOutput {
        if let Some(answer) = self.existing {
            return answer;
        }
        let answer = self.ask(&format!(
            "{location} already exists. Overwrite, continue or abort? [y/c/n]"
        ));
        match answer.as_str() {
            "y" | "yes" | "overwrite" => ExistingOutput::Overwrite,
            "c" | "continue" | "resume" => ExistingOutput::Resume,
            _ => ExistingOutput::Abort,
        }
    }

    fn resume(&mut self, completed: u64, requested: u64) -> ResumeChoice {
        if let Some(answer) = self.resume {
            return answer;
        }
        if completed < requested {
            let answer = self.ask(&format!(
                "{completed} iterations found. Add {requested} more (1) or fill up to {requested} (2)?"
            ));
            match answer.as_str() {
                "1" => ResumeChoice::Extend,
                "2" => ResumeChoice::FillUp,
                _ => ResumeChoice::Abort,
            }
        } else {
            let answer = self.ask(&format!(
                "{completed} iterations found. Add {requested} more? [y/n]"
            ));
            match answer.as_str() {
                "y" | "yes" => ResumeChoice::Extend,
                _ => ResumeChoice::Abort,
            }
        }
    }
}
