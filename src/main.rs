use std::{
    error::Error,
    path::{Path, PathBuf},
    time::Duration,
};

use cat_mouse_cheese::{
    algo::{Evaluator, EvaluatorConfig, Trainer, TrainerConfig},
    ds::QTable,
    gym::{GridWorld, Variant},
    report,
};
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// World to play in
    #[arg(short, long, default_value_t = Variant::Empty)]
    variant: Variant,

    /// Master seed for every random draw, fresh entropy when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Cut episodes off after this many steps
    #[arg(short, long)]
    max_steps: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-table from scratch and save it
    Train {
        /// Number of training episodes
        #[arg(short, long, default_value_t = 100_000)]
        episodes: u32,

        /// Where to write the trained table
        #[arg(short, long)]
        table: PathBuf,

        /// Where to write the learning curve as CSV
        #[arg(short, long)]
        curve: Option<PathBuf>,
    },

    /// Watch greedy episodes played by a saved table
    Test {
        /// Table to play with
        #[arg(short, long)]
        table: PathBuf,

        /// Number of episodes to show
        #[arg(short, long, default_value_t = 5)]
        episodes: u32,

        /// Pause between frames, in milliseconds
        #[arg(short, long, default_value_t = 300)]
        delay_ms: u64,
    },

    /// Report the success rate of a saved table over many greedy episodes
    Evaluate {
        /// Table to evaluate
        #[arg(short, long)]
        table: PathBuf,

        /// Number of episodes to run
        #[arg(short, long, default_value_t = 10_000)]
        episodes: u32,
    },
}

fn init_logging() {
    env_logger::builder()
        .format_target(false)
        .format_timestamp_secs()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init()
}

fn load_table(path: &Path, world: &GridWorld<StdRng>) -> cat_mouse_cheese::Result<QTable> {
    let table = QTable::load(path)?;
    table.ensure_matches(world.size(), world.layout())?;
    Ok(table)
}

#[cfg(feature = "viz")]
fn show(
    world: &mut GridWorld<StdRng>,
    table: &QTable,
    config: EvaluatorConfig,
    episodes: u32,
    delay: Duration,
) -> cat_mouse_cheese::Result<()> {
    let tally = cat_mouse_cheese::viz::play(world, table, config, episodes, delay)?;
    println!(
        "Reached the cheese in {}/{} episodes",
        tally.successes, tally.episodes
    );
    Ok(())
}

#[cfg(not(feature = "viz"))]
fn show(
    world: &mut GridWorld<StdRng>,
    table: &QTable,
    config: EvaluatorConfig,
    episodes: u32,
    delay: Duration,
) -> cat_mouse_cheese::Result<()> {
    use std::thread;

    let layout = world.layout();
    let mut frame = world.snapshot();
    let evaluator = Evaluator::new(table, config);
    for episode in 1..=episodes {
        let stats = evaluator.go_with(world, |exp| {
            (frame.mouse, frame.cat, frame.cheese) = layout.decode(&exp.next_state);
            println!("{frame}");
            println!("{:?} -> reward {:.2}\n", exp.action, exp.reward);
            thread::sleep(delay);
        })?;
        println!(
            "Episode {episode}: {:?} after {} steps, total reward {:.2}\n",
            stats.outcome, stats.steps, stats.total_reward
        );
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let cli = Cli::parse();

    let mut master = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut world = GridWorld::from_variant(cli.variant, StdRng::seed_from_u64(master.gen()))?;
    info!(
        "Playing the {} world ({size}x{size})",
        cli.variant,
        size = world.size()
    );

    match cli.command {
        Commands::Train {
            episodes,
            table,
            curve,
        } => {
            let config = TrainerConfig {
                max_steps: cli.max_steps,
                ..TrainerConfig::default()
            };
            let mut trainer = Trainer::new(
                config,
                world.empty_table(),
                StdRng::seed_from_u64(master.gen()),
            )?;
            trainer.train(&mut world, episodes)?;
            trainer.q_table().save(&table)?;
            info!("Saved Q-table to {}", table.display());
            if let Some(curve) = curve {
                report::write_learning_curve(&curve, trainer.history(), report::DEFAULT_WINDOW)?;
                info!("Saved learning curve to {}", curve.display());
            }
        }
        Commands::Test {
            table,
            episodes,
            delay_ms,
        } => {
            let q_table = load_table(&table, &world)?;
            let config = EvaluatorConfig {
                max_steps: cli.max_steps,
            };
            show(
                &mut world,
                &q_table,
                config,
                episodes,
                Duration::from_millis(delay_ms),
            )?;
        }
        Commands::Evaluate { table, episodes } => {
            let q_table = load_table(&table, &world)?;
            let config = EvaluatorConfig {
                max_steps: cli.max_steps,
            };
            let evaluation = Evaluator::new(&q_table, config).evaluate(&mut world, episodes)?;
            println!(
                "Success rate: {:.2}% ({}/{} reached the cheese, {} caught, {} cut off)",
                evaluation.success_rate() * 100.0,
                evaluation.successes,
                evaluation.episodes,
                evaluation.captures,
                evaluation.truncated
            );
        }
    }
    Ok(())
}
