use std::{ops::ControlFlow, path::PathBuf};

use anyhow::Context;
use dinorun_engine::{GenerationError, TickSnapshot, TrackSeed};

use crate::model::trained_model::TrainedModel;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Path to the model file (JSON format)
    model_file: PathBuf,
    /// Track seed as 32 hex digits; random if omitted
    #[arg(long)]
    seed: Option<TrackSeed>,
    /// Print one line per tick
    #[arg(long)]
    trace: bool,
    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let ReplayArg {
        model_file,
        seed,
        trace,
        max_ticks,
    } = arg;

    eprintln!("Loading model from {}", model_file.display());
    let model = TrainedModel::open(model_file)?;
    eprintln!(
        "Loaded {:?} (trained {}, fitness {:.3})",
        model.name, model.trained_at, model.final_fitness
    );

    let seed = seed.unwrap_or_else(rand::random);
    eprintln!("Track seed: {seed}");

    let mut observer = |snapshot: &TickSnapshot<'_>| {
        if *trace {
            eprintln!("{}", trace_line(snapshot));
        }
        match max_ticks {
            Some(max) if snapshot.tick() >= *max => ControlFlow::Break(()),
            _ => ControlFlow::Continue(()),
        }
    };
    let result = dinorun_engine::replay(
        Box::new(model.network.clone()),
        &model.config,
        seed,
        &mut observer,
    );

    match result {
        Ok(report) => {
            eprintln!("Replay finished: {}", report.termination);
            eprintln!("  Ticks: {}", report.ticks);
            eprintln!("  Score: {}", report.score);
            eprintln!("  Fitness: {:.3}", report.fitness.total());
        }
        Err(GenerationError::Aborted { tick, .. }) => {
            eprintln!("Replay stopped at tick {tick}");
        }
        Err(err) => return Err(err).context("Failed to replay model"),
    }
    Ok(())
}

fn trace_line(snapshot: &TickSnapshot<'_>) -> String {
    let runner = snapshot.agents().next().map_or_else(
        || "down".to_owned(),
        |(_, agent)| {
            let state = if agent.is_airborne() { "air" } else { "ground" };
            format!("y={:6.1} {state:6}", agent.y())
        },
    );
    let obstacle = snapshot
        .obstacle_groups()
        .iter()
        .find(|group| !group.is_passed())
        .map_or_else(
            || "-".to_owned(),
            |group| format!("x={:5} ({})", group.leading_x(), group.variant().segment_count()),
        );
    format!(
        "tick {:5} score {:3} {runner} next {obstacle}",
        snapshot.tick(),
        snapshot.score()
    )
}
