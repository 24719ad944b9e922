use colored::Colorize;
use log::debug;
use text_io::read;

use crate::libquiz::agent::{self, Difficulty};
use crate::libquiz::config::Config;
use crate::libquiz::quiz::{Outcome, Session};

#[derive(Debug, PartialEq)]
enum Choice {
    Option(usize),
    DontKnow,
    Quit,
}

impl Choice {
    fn from_str(option_count: usize, input: &str) -> Choice {
        match input.trim() {
            "q" => Choice::Quit,
            input => match input.parse::<usize>() {
                Ok(num) if (1..=option_count).contains(&num) => Choice::Option(num - 1),
                Ok(_) => {
                    println!(
                        "{}",
                        format!("There are only {} options available!", option_count).bright_red()
                    );
                    Choice::DontKnow
                }
                Err(_) => Choice::DontKnow,
            },
        }
    }
}

#[derive(Debug, PartialEq)]
enum LoopEnd {
    Finished,
    Quit,
}

/// Generates a quiz from the given text and walks the user through it.
/// Generation failures are shown to the user instead of propagated; the
/// process stays alive either way.
pub fn run(config: &Config, text: &str, question_count: u32, difficulty: Difficulty) {
    loop {
        println!(
            "{}",
            "Analyzing text and generating questions, this can take a moment...".cyan()
        );
        let questions = match agent::generate_quiz(config, text, question_count, difficulty) {
            Ok(questions) => questions,
            Err(err) => {
                println!("{}", err.to_string().bright_red());
                return;
            }
        };

        let mut session = Session::new(questions);
        println!(
            "{}",
            format!(
                "==========> Quiz Master ({} questions, {}) <==========",
                session.len(),
                difficulty
            )
            .cyan()
        );
        let end = quiz_loop(&mut session);
        println!(
            "{}",
            format!("Score: {}/{}", session.score(), session.len()).cyan()
        );
        if end == LoopEnd::Quit {
            return;
        }

        print!(
            "{} ",
            "Generate another quiz from the same text? (y/N):".cyan()
        );
        let again: String = read!("{}\n");
        if again.trim() != "y" {
            return;
        }
        // A fresh quiz replaces the old session wholesale.
    }
}

fn quiz_loop(session: &mut Session) -> LoopEnd {
    for idx in 0..session.len() {
        let leading = format!("{}/{}. ", idx + 1, session.len());
        let question = session.questions()[idx].clone();
        println!(
            "{}{}",
            leading.cyan(),
            question.question.black().bold().on_white()
        );

        let indent = " ".repeat(leading.len());
        for (i, option) in question.options.iter().enumerate() {
            println!("{}{}. {}", indent, format!("{}", i + 1).bold(), option);
        }
        let option_count = question.options.len();

        print!(
            "{} ",
            format!(
                "Answer (1-{}, q to quit prematurely and anything else if you don't know):",
                option_count
            )
            .cyan()
        );
        let choice_string: String = read!("{}\n");
        let choice = Choice::from_str(option_count, choice_string.as_str());
        debug!("choice: {:?}", choice);

        match choice {
            Choice::Option(num) => {
                session.select(idx, num);
                report(session.check(idx));
            }
            Choice::DontKnow => {
                println!(
                    "{}",
                    format!("The correct answer was: {}", question.answer).green()
                );
            }
            Choice::Quit => {
                println!("{}", "Quitting Early!".cyan());
                return LoopEnd::Quit;
            }
        }
    }
    LoopEnd::Finished
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Correct => println!("{}", "Correct!".bright_green()),
        Outcome::Incorrect {
            answer,
            explanation,
        } => {
            println!(
                "{}",
                format!("Incorrect! The correct answer was: {}", answer).bright_red()
            );
            if !explanation.is_empty() {
                println!("{}", format!("Explanation: {}", explanation).yellow());
            }
        }
        Outcome::NoSelection => println!(
            "{}",
            "No answer selected, counting that as a miss.".yellow()
        ),
    }
}
