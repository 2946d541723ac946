use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use threes_ai::bot::Bot;
use threes_ai::eval::{EmptySpaces, Evaluator, Openness, OpennessMatthew, TotalScore, Zero};
use threes_ai::selfplay::Game;
use threes_ai::trace::{Meta, Run};

#[derive(Parser, Debug)]
#[command(
    name = "batch",
    version,
    about = "Batch Threes self-play with the expectimax bot"
)]
struct Cli {
    /// Number of games to play
    #[arg(short = 'n', long, default_value_t = 100)]
    games: u32,
    /// Search depth (MAX plies)
    #[arg(short, long, default_value_t = 6)]
    depth: u32,
    /// Card-count horizon (1..=depth)
    #[arg(long, default_value_t = 3)]
    horizon: u32,
    /// Board evaluator
    #[arg(long, value_enum, default_value_t = EvaluatorKind::OpennessMatthew)]
    evaluator: EvaluatorKind,
    /// Seed for reproducible runs (random when omitted)
    #[arg(long)]
    seed: Option<u64>,
    /// Show a progress bar
    #[arg(long)]
    progress: bool,
    /// Write one .t3run trace per game into this directory
    #[arg(long, value_name = "DIR")]
    trace_dir: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum EvaluatorKind {
    Zero,
    TotalScore,
    EmptySpaces,
    Openness,
    OpennessMatthew,
}

impl EvaluatorKind {
    fn build(self) -> Box<dyn Evaluator> {
        match self {
            EvaluatorKind::Zero => Box::new(Zero),
            EvaluatorKind::TotalScore => Box::new(TotalScore),
            EvaluatorKind::EmptySpaces => Box::new(EmptySpaces),
            EvaluatorKind::Openness => Box::new(Openness),
            EvaluatorKind::OpennessMatthew => Box::new(OpennessMatthew),
        }
    }
}

struct GameReport {
    moves: u32,
    score: u64,
    highest_card: u32,
    evals: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let bot = Bot::new(cli.depth, cli.horizon, cli.evaluator.build())?;
    let seed = cli.seed.unwrap_or_else(|| rand::thread_rng().gen());
    if let Some(dir) = &cli.trace_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating trace dir {}", dir.display()))?;
    }

    let pb = if cli.progress {
        let pb = ProgressBar::new(cli.games as u64);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} games ({eta})",
            )
            .expect("valid progress template")
            .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let mut reports = Vec::with_capacity(cli.games as usize);
    for game_idx in 0..cli.games {
        let report = play_one(
            &bot,
            seed.wrapping_add(game_idx as u64),
            cli.trace_dir.as_deref(),
            game_idx,
        )?;
        if let Some(pb) = &pb {
            pb.inc(1);
        }
        reports.push(report);
    }
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    summarize(&bot, seed, &reports, start.elapsed().as_secs_f64());
    Ok(())
}

fn play_one(
    bot: &Bot,
    seed: u64,
    trace_dir: Option<&std::path::Path>,
    game_idx: u32,
) -> anyhow::Result<GameReport> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::new(&mut rng);
    let start_unix_s = threes_ai::trace::now_unix_seconds();
    let start = Instant::now();

    let mut states = vec![game.board().raw()];
    let mut moves = Vec::new();
    let mut total_evals = 0u64;
    loop {
        let (dir, evals) = bot.get_next_move_counted(game.board(), game.deck(), game.hint());
        total_evals = total_evals.saturating_add(evals);
        let Some(dir) = dir else {
            break;
        };
        game.advance(dir, &mut rng);
        states.push(game.board().raw());
        moves.push(dir as u8);
    }

    let report = GameReport {
        moves: moves.len() as u32,
        score: game.score(),
        highest_card: game.highest_card(),
        evals: total_evals,
    };

    if let Some(dir) = trace_dir {
        let meta = Meta {
            steps: report.moves,
            start_unix_s,
            elapsed_s: start.elapsed().as_secs_f32(),
            final_score: report.score,
            highest_card: report.highest_card,
            bot_str: Some(bot.describe()),
        };
        let run = Run::new(meta, states, moves).context("assembling run trace")?;
        let path = dir.join(format!("run-{:05}.t3run", game_idx));
        run.write_to_path(&path)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(report)
}

fn summarize(bot: &Bot, seed: u64, reports: &[GameReport], elapsed_s: f64) {
    let games = reports.len() as u64;
    let total_moves: u64 = reports.iter().map(|r| r.moves as u64).sum();
    let total_evals: u64 = reports.iter().map(|r| r.evals).sum();
    let mean_score = reports.iter().map(|r| r.score).sum::<u64>() as f64 / games.max(1) as f64;
    let max_score = reports.iter().map(|r| r.score).max().unwrap_or(0);

    let mut highest_cards: BTreeMap<u32, u32> = BTreeMap::new();
    for r in reports {
        *highest_cards.entry(r.highest_card).or_insert(0) += 1;
    }

    println!("bot: {} | seed: {}", bot.describe(), seed);
    println!(
        "games: {} | moves: {} | moves/sec: {:.1}",
        games,
        total_moves,
        total_moves as f64 / elapsed_s.max(1e-6)
    );
    println!(
        "score: mean {:.0}, max {} | moves evaluated: {}",
        mean_score, max_score, total_evals
    );
    print!("highest card:");
    for (card, count) in &highest_cards {
        print!(" {}x{}", card, count);
    }
    println!();
}
