extern crate ansi_term;
extern crate ctrlc;
extern crate linefeed;
use adventure::config::{EngineConfig, Variant};
use adventure::engine::Engine;
use adventure::error::Error;
use adventure::mach::Output;
use adventure::resource::DirBundle;
use ansi_term::Style;
use linefeed::{Completer, Completion, Interface, Prompter, ReadResult, Terminal};
use std::sync::atomic::Ordering;
use std::sync::Arc;

const KEYWORDS: &[&str] = &["quit", "state", "wait"];

pub fn main() {
    let args: Vec<String> = std::env::args().collect();
    let dir = match args.get(1) {
        Some(dir) => dir,
        None => {
            eprintln!("usage: adventure <bundle-dir> [classic|standard|scrolling]");
            return;
        }
    };
    let variant = match args.get(2).map(String::as_str) {
        Some("classic") => Variant::classic(),
        Some("scrolling") => Variant::scrolling(),
        _ => Variant::standard(),
    };
    let bundle = match DirBundle::open(dir) {
        Ok(bundle) => bundle,
        Err(error) => {
            eprintln!("{}", error);
            return;
        }
    };
    let engine = match Engine::new(EngineConfig::for_variant(variant), Box::new(bundle)) {
        Ok(engine) => engine,
        Err(error) => {
            eprintln!("{}", Style::new().bold().paint(error.to_string()));
            return;
        }
    };
    let quit = engine.quit_flag();
    if let Err(error) = ctrlc::set_handler(move || {
        quit.store(true, Ordering::SeqCst);
    }) {
        eprintln!("Error setting Ctrl-C handler: {}", error);
        return;
    }
    if let Err(error) = main_loop(engine) {
        eprintln!("{}", error);
    }
}

enum Command {
    Verb(i16, i16, i16),
    Wait(u64),
    State,
    Quit,
}

fn parse(line: &str) -> Option<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["quit"] => Some(Command::Quit),
        ["state"] => Some(Command::State),
        ["wait", n] => n.parse().ok().map(Command::Wait),
        [] => None,
        nums => {
            let mut v = [-1i16; 3];
            for (slot, word) in v.iter_mut().zip(nums.iter()) {
                *slot = word.parse().ok()?;
            }
            Some(Command::Verb(v[0], v[1], v[2]))
        }
    }
}

fn main_loop(mut engine: Engine) -> std::io::Result<()> {
    let command = Interface::new("adventure")?;
    command.set_completer(Arc::new(KeywordCompleter));
    command.set_prompt("> ")?;
    command.write_fmt(format_args!(
        "{} engine, session started {}\n",
        engine.config().variant.name,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ))?;
    loop {
        let period = engine.config().period();
        let step = engine.idle(period);
        if !report(&command, &mut engine, step.map(|_| ()))? || engine.quit_requested() {
            break;
        }
        let string = match command.read_line()? {
            ReadResult::Input(string) => string,
            ReadResult::Signal(_) | ReadResult::Eof => break,
        };
        let result = match parse(&string) {
            Some(Command::Quit) => break,
            Some(Command::State) => match engine.save_state() {
                Ok(state) => {
                    command.write_fmt(format_args!(
                        "{} items, {} timed events, digest {:08X}\n",
                        state.items.len(),
                        state.events.len(),
                        state.digest()
                    ))?;
                    Ok(())
                }
                Err(error) => Err(error),
            },
            Some(Command::Wait(seconds)) => engine.idle(seconds * 1000).map(|_| ()),
            Some(Command::Verb(verb, noun1, noun2)) => engine.handle_verb(verb, noun1, noun2).map(|_| ()),
            None => {
                command.write_fmt(format_args!("verb [noun1 [noun2]], wait SECONDS, state or quit\n"))?;
                continue;
            }
        };
        command.add_history_unique(string);
        if !report(&command, &mut engine, result)? {
            break;
        }
    }
    Ok(())
}

/// Prints script output and any error. False once the session is over.
fn report<T: Terminal>(command: &Interface<T>, engine: &mut Engine, result: Result<(), Error>) -> std::io::Result<bool> {
    for output in engine.take_output() {
        match output {
            Output::Message(s) => command.write_fmt(format_args!("{}\n", s))?,
            Output::Number(n) => command.write_fmt(format_args!("{}\n", n))?,
            Output::NoMatch => command.write_fmt(format_args!("I don't understand.\n"))?,
            Output::Quit => return Ok(false),
        }
    }
    if let Err(error) = result {
        command.write_fmt(format_args!("{}\n", Style::new().bold().paint(error.to_string())))?;
        return Ok(false);
    }
    Ok(true)
}

struct KeywordCompleter;

impl<Term: Terminal> Completer<Term> for KeywordCompleter {
    fn complete(&self, word: &str, _prompter: &Prompter<Term>, _start: usize, _end: usize) -> Option<Vec<Completion>> {
        let found: Vec<Completion> = KEYWORDS
            .iter()
            .filter(|k| k.starts_with(word))
            .map(|k| Completion::simple(k.to_string()))
            .collect();
        if found.is_empty() {
            None
        } else {
            Some(found)
        }
    }
}
