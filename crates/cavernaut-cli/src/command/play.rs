use std::path::PathBuf;

use anyhow::Context as _;
use cavernaut_autopilot::{
    DEFAULT_TRAIN_EPOCHS, FEATURE_LEN, FlightController, NeuralPolicy,
};
use cavernaut_engine::{FlightSession, TerrainSeed};
use cavernaut_training::CsvSampleWriter;
use chrono::Utc;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use ratatui_runtime::Runtime;

use crate::{app::FlightApp, schema::policy_model::PolicyModel, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Terrain seed as a 32-character hex string
    #[clap(long)]
    seed: Option<TerrainSeed>,
}

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoArg {
    /// Terrain seed as a 32-character hex string
    #[clap(long)]
    seed: Option<TerrainSeed>,
    /// Training epochs per retrain
    #[clap(long, default_value_t = DEFAULT_TRAIN_EPOCHS)]
    epochs: usize,
    /// CSV file the sampled rows are appended to
    #[clap(long, default_value = "./data/training_log.csv")]
    log: PathBuf,
    /// Model file (JSON); loaded at startup when present, saved on exit
    #[clap(long)]
    model: Option<PathBuf>,
}

fn make_session(seed: Option<TerrainSeed>) -> FlightSession {
    seed.map_or_else(FlightSession::new, FlightSession::with_seed)
}

pub(crate) fn run_manual(arg: &PlayArg) -> anyhow::Result<()> {
    let controller = FlightController::manual(make_session(arg.seed));
    let mut app = FlightApp::new(controller);
    Runtime::new().run(&mut app)?;
    Ok(())
}

pub(crate) fn run_auto(arg: &AutoArg) -> anyhow::Result<()> {
    let AutoArg {
        seed,
        epochs,
        log,
        model,
    } = arg;

    let policy = match model {
        Some(path) if path.exists() => {
            let stored = util::read_policy_model_file(path)?;
            anyhow::ensure!(
                stored.network.input_len() == FEATURE_LEN,
                "model {} expects {} inputs, the feature extractor produces {FEATURE_LEN}",
                path.display(),
                stored.network.input_len(),
            );
            NeuralPolicy::from_network(stored.network, Pcg32::from_rng(&mut rand::rng()))
        }
        _ => NeuralPolicy::new(FEATURE_LEN),
    };

    if let Some(parent) = log.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let writer = CsvSampleWriter::create(log.clone());

    let controller = FlightController::autopilot(make_session(*seed), policy, *epochs)
        .with_sink(Box::new(writer));
    let mut app = FlightApp::new(controller);
    Runtime::new().run(&mut app)?;

    if let Some(path) = model {
        let controller = app.into_controller();
        let flights = controller.flights();
        let best_time_secs = controller.best_time().as_secs_f64();
        let policy = controller.into_policy().expect("autopilot always has a policy");
        let stored = PolicyModel {
            name: "cavernaut-autopilot".to_owned(),
            trained_at: Utc::now(),
            flights,
            best_time_secs,
            network: policy.network().clone(),
        };
        util::write_policy_model_file(path, &stored)?;
    }

    Ok(())
}
