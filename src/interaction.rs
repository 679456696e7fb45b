use std::{io::Write, str::FromStr};

use lembrei_models::{
    alarm::{AlertType, Hours, InvalidOption, Minutes, UnknownAlertType},
    countdown::CountdownState,
};
use lembrei_storage::KeyValueStore;
use thiserror::Error;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::watch,
};

use crate::{
    alarm::{AlarmController, describe_interval},
    console::ConsoleNotifier,
};

const HELP: &str = "\
Commands:
  hours <1-12>                  set the hours of the interval
  minutes <0|30>                set the minutes of the interval
  alert <silent|vibrate|sound>  set how the alert is delivered
  start                         start the recurring reminder
  stop                          stop the recurring reminder
  status                        show the settings and the countdown
  options                       list the available choices
  watch                         follow the countdown until the next alert
  help                          show this message
  quit                          exit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Hours(Hours),
    Minutes(Minutes),
    Alert(AlertType),
    Start,
    Stop,
    Status,
    Options,
    Watch,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}'")]
    Unknown(String),

    #[error("Missing value for '{0}'")]
    MissingValue(&'static str),

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error(transparent)]
    InvalidOption(#[from] InvalidOption),

    #[error(transparent)]
    UnknownAlertType(#[from] UnknownAlertType),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let name = words.next().ok_or(ParseCommandError::Empty)?;

        let command = match name.to_lowercase().as_str() {
            "hours" => Command::Hours(Hours::try_from(number(words.next(), "hours")?)?),
            "minutes" => Command::Minutes(Minutes::try_from(number(words.next(), "minutes")?)?),
            "alert" => {
                let value = words.next().ok_or(ParseCommandError::MissingValue("alert"))?;
                Command::Alert(value.parse()?)
            }
            "start" => Command::Start,
            "stop" => Command::Stop,
            "status" => Command::Status,
            "options" => Command::Options,
            "watch" => Command::Watch,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(ParseCommandError::Unknown(other.to_owned())),
        };

        Ok(command)
    }
}

fn number(word: Option<&str>, command: &'static str) -> Result<u8, ParseCommandError> {
    let word = word.ok_or(ParseCommandError::MissingValue(command))?;
    word.parse()
        .map_err(|_| ParseCommandError::NotANumber(word.to_owned()))
}

/// Line-oriented stand-in for the reminder screen.
pub struct TerminalInteractionInterface;

impl TerminalInteractionInterface {
    /// Runs until `quit`, end of input or ctrl-c.
    pub async fn start<S: KeyValueStore>(
        controller: &mut AlarmController<S>,
        notifier: &ConsoleNotifier,
    ) -> anyhow::Result<()> {
        log::info!("Starting terminal interaction interface");
        println!("{HELP}");
        print_status(controller, notifier);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = tokio::select! {
                line = lines.next_line() => line?,
                _ = tokio::signal::ctrl_c() => {
                    log::info!("Interrupted");
                    break;
                }
            };

            let Some(line) = line else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }

            match line.parse::<Command>() {
                Ok(Command::Quit) => break,
                Ok(command) => execute(controller, notifier, command).await,
                Err(e) => println!("{e}. Type 'help' for the list of commands."),
            }
        }

        Ok(())
    }
}

async fn execute<S: KeyValueStore>(
    controller: &mut AlarmController<S>,
    notifier: &ConsoleNotifier,
    command: Command,
) {
    let accepted = match command {
        Command::Hours(hours) => controller.select_hours(hours).await,
        Command::Minutes(minutes) => controller.select_minutes(minutes).await,
        Command::Alert(alert_type) => controller.select_alert_type(alert_type).await,
        Command::Start => {
            controller.set_active(true).await;
            true
        }
        Command::Stop => {
            controller.set_active(false).await;
            true
        }
        Command::Help => {
            println!("{HELP}");
            return;
        }
        Command::Options => {
            print_options();
            return;
        }
        Command::Watch => {
            follow_countdown(controller.subscribe()).await;
            true
        }
        Command::Status | Command::Quit => true,
    };

    if !accepted {
        println!("Stop the reminder before changing its settings.");
    }
    print_status(controller, notifier);
}

fn print_status<S: KeyValueStore>(controller: &AlarmController<S>, notifier: &ConsoleNotifier) {
    let config = controller.config();
    let countdown = controller.countdown();

    println!(
        "Every {}, alert: {}",
        describe_interval(config),
        config.alert_type.label()
    );
    match countdown.next_alarm_date {
        Some(next) => println!(
            "Running. Next alert at {} (in {}). Alerts so far: {}",
            next.with_timezone(&lembrei_models::chrono::Local).format("%H:%M:%S"),
            countdown.remaining_display(),
            notifier.alerts_fired()
        ),
        None => println!("Stopped."),
    }
}

fn print_options() {
    let hours: Vec<String> = Hours::options().map(|h| h.get().to_string()).collect();
    let minutes: Vec<String> = Minutes::options().map(|m| m.get().to_string()).collect();
    let alerts: Vec<String> = AlertType::ALL
        .iter()
        .map(|a| a.label().to_lowercase())
        .collect();

    println!("hours:   {}", hours.join(", "));
    println!("minutes: {}", minutes.join(", "));
    println!("alert:   {}", alerts.join(", "));
}

/// Redraws the remaining time on one line until the countdown stops, the
/// next alert is reached or ctrl-c is pressed.
async fn follow_countdown(mut rx: watch::Receiver<CountdownState>) {
    let first = *rx.borrow_and_update();
    if !first.is_running() {
        println!("Nothing to watch, the reminder is stopped.");
        return;
    }
    let target = first.next_alarm_date;
    redraw(&first);

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }

        let state = *rx.borrow_and_update();
        if !state.is_running() || state.next_alarm_date != target {
            break;
        }
        redraw(&state);
    }
    println!();
}

fn redraw(state: &CountdownState) {
    print!("\r{}", state.remaining_display());
    let _ = std::io::stdout().flush();
}
