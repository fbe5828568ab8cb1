//! Terminal front end for the perception survey: wires the controller to
//! the configured image source and result sink and drives it from key
//! input. SPACE acknowledges (or starts/resumes), `s` skips, `r` resets,
//! `q` quits.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal;
use log::error;
use percept_core::{ImageSource, ResultSink, SurveyMode};
use percept_providers::{image_source, result_sink, ProviderConfig};
use percept_survey::{BroadcastError, SurveyConfig, SurveyController, SurveyEvent, SurveyStatus};
use percept_timing::MonotonicClock;
use rand::rngs::ThreadRng;

type AppController =
    SurveyController<Box<dyn ImageSource>, Box<dyn ResultSink>, MonotonicClock, ThreadRng>;

fn main() -> Result<()> {
    env_logger::init();

    let provider_config = ProviderConfig::from_env();
    let source = image_source(&provider_config);
    let sink = result_sink(&provider_config)?;

    let survey_config = SurveyConfig {
        mode: mode_from_env(),
        ..SurveyConfig::default()
    };

    let mut controller = SurveyController::new(
        source,
        sink,
        MonotonicClock::new(),
        rand::rng(),
        survey_config,
    );
    controller.initialize()?;

    let events: Rc<RefCell<VecDeque<SurveyEvent>>> = Rc::new(RefCell::new(VecDeque::new()));
    let queue = events.clone();
    controller.subscribe(move |event: &SurveyEvent| {
        queue.borrow_mut().push_back(event.clone());
        Ok(())
    });

    terminal::enable_raw_mode()?;
    let outcome = run(&mut controller, &events);
    terminal::disable_raw_mode()?;
    outcome
}

fn run(controller: &mut AppController, events: &RefCell<VecDeque<SurveyEvent>>) -> Result<()> {
    say("perception survey ready");
    say("press SPACE when you see a mockup appear; q quits, r resets");

    loop {
        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char(' ') | KeyCode::Enter => primary_action(controller),
                    KeyCode::Char('s') => log_broadcast(controller.skip()),
                    KeyCode::Char('r') => log_broadcast(controller.reset()),
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    _ => {}
                }
            }
        }

        log_broadcast(controller.tick());

        while let Some(event) = events.borrow_mut().pop_front() {
            show(controller, &event);
        }
    }
    Ok(())
}

/// SPACE does the contextual thing: start from idle, acknowledge a
/// visible trial, resume from a break.
fn primary_action(controller: &mut AppController) {
    match controller.status() {
        SurveyStatus::Idle => {
            if let Err(err) = controller.start() {
                error!("could not start survey: {err}");
            }
        }
        SurveyStatus::InProgress => {
            if let Some(trial) = controller.current_trial() {
                if !trial.hidden {
                    log_broadcast(controller.acknowledge(&trial));
                }
            }
        }
        SurveyStatus::OnBreak => log_broadcast(controller.resume()),
        _ => {}
    }
}

fn show(controller: &AppController, event: &SurveyEvent) {
    match event {
        SurveyEvent::Started => {
            let (_, total) = controller.progress();
            say(&format!("survey started: {total} trial(s)"));
        }
        SurveyEvent::TrialUpdated(trial) if trial.hidden => {
            let (position, total) = controller.progress();
            say(&format!("trial {position}/{total}: watch the screen..."));
        }
        SurveyEvent::TrialUpdated(trial) => {
            say(&format!(
                ">>> {} ({:?}) - press SPACE",
                trial.image.name, trial.image.mode
            ));
        }
        SurveyEvent::Break { current, total } => {
            say(&format!(
                "take a break ({current}/{total} done) - SPACE to continue"
            ));
        }
        SurveyEvent::Completed => say("survey complete, thank you"),
        SurveyEvent::Reset { session_id } => {
            say(&format!("survey reset (session {session_id})"));
        }
    }
}

fn mode_from_env() -> SurveyMode {
    match std::env::var("PERCEPT_MODE").as_deref() {
        Ok("light") => SurveyMode::Light,
        Ok("dark") => SurveyMode::Dark,
        _ => SurveyMode::Both,
    }
}

fn log_broadcast(result: std::result::Result<(), BroadcastError>) {
    if let Err(err) = result {
        error!("{err}");
    }
}

/// Raw mode needs explicit carriage returns.
fn say(line: &str) {
    print!("{line}\r\n");
}
