use std::time::Duration;

use crossterm::event::KeyCode;
use ratatui::{prelude::*, widgets::*};
use rand::Rng;

use self::{grid::GridView, tui::Screen};
use crate::{
    algo::{EpisodeStats, Evaluation, Evaluator, EvaluatorConfig},
    ds::QTable,
    env::Outcome,
    gym::GridWorld,
    Error, Result,
};

mod grid;
mod tui;
mod util;

fn status_lines(
    episode: u32,
    episodes: u32,
    current: &EpisodeStats,
    tally: &Evaluation,
) -> Vec<Line<'static>> {
    let outcome = match current.outcome {
        Some(Outcome::ReachedCheese) => "reached the cheese".light_green(),
        Some(Outcome::Captured) => "caught by the cat".red(),
        None => "running".white(),
    };
    vec![
        Line::from(format!("Episode {episode}/{episodes}")),
        Line::from(format!("Step {}", current.steps)),
        Line::from(format!("Reward {:.2}", current.total_reward)),
        Line::from(vec!["Mouse ".into(), outcome]),
        Line::from(""),
        Line::from(format!(
            "Cheese {} / caught {} / cut off {}",
            tally.successes, tally.captures, tally.truncated
        )),
        Line::from("q to quit".dark_gray()),
    ]
}

/// Play `episodes` greedy episodes on the terminal, pausing `delay` after every step
///
/// Pressing `q` stops after the current episode; the tally covers the episodes that ran.
pub fn play<R: Rng>(
    env: &mut GridWorld<R>,
    q_table: &QTable,
    config: EvaluatorConfig,
    episodes: u32,
    delay: Duration,
) -> Result<Evaluation> {
    q_table.ensure_matches(env.size(), env.layout())?;
    let layout = env.layout();
    let mut snapshot = env.snapshot();
    let evaluator = Evaluator::new(q_table, config);
    let mut tally = Evaluation::default();
    let mut screen = Screen::enter().map_err(Error::Terminal)?;
    let mut quit = false;
    let mut failure = None;

    for episode in 1..=episodes {
        let mut current = EpisodeStats::default();
        let stats = evaluator.go_with(env, |exp| {
            if quit || failure.is_some() {
                return;
            }
            (snapshot.mouse, snapshot.cat, snapshot.cheese) = layout.decode(&exp.next_state);
            current.total_reward += exp.reward;
            current.steps += 1;
            current.outcome = exp.outcome;

            let drawn = screen.draw(|frame| {
                let view = GridView::new(&snapshot, "Cat, mouse, cheese");
                let (width, height) = view.extent();
                let [grid_area, status_area] =
                    Layout::horizontal([Constraint::Length(width), Constraint::Fill(1)])
                        .areas(frame.size());
                let grid_area = Rect {
                    height: height.min(grid_area.height),
                    ..grid_area
                };
                frame.render_widget(view, grid_area);
                frame.render_widget(
                    Paragraph::new(status_lines(episode, episodes, &current, &tally)).block(
                        Block::bordered()
                            .border_type(BorderType::Rounded)
                            .title("Status"),
                    ),
                    status_area,
                );
            });
            if let Err(e) = drawn {
                failure = Some(e);
                return;
            }
            match util::poll_key(delay) {
                Ok(Some(KeyCode::Char('q'))) => quit = true,
                Ok(_) => {}
                Err(e) => failure = Some(e),
            }
        });

        let stats = stats?;
        tally.episodes += 1;
        match stats.outcome {
            Some(Outcome::ReachedCheese) => tally.successes += 1,
            Some(Outcome::Captured) => tally.captures += 1,
            None => tally.truncated += 1,
        }
        if quit || failure.is_some() {
            break;
        }
    }

    drop(screen);
    match failure {
        Some(e) => Err(Error::Terminal(e)),
        None => Ok(tally),
    }
}
