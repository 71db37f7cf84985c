use anyhow::Result;
use clap::Parser;

use fg_core::config::SweepConfig;
use fg_dataset::store::load_or_build;
use fg_dataset::table::FeatureTable;
use fg_eval::classifier::for_choice;
use fg_eval::report::{best_line, render_accuracy, render_confusion, write_json};
use fg_eval::sweep::{grid_pairs, optimize_feature_dimensions};
use fg_source::loader::DiscardPolicy;
use fg_source::scan::load_gesture_data;

pub mod cli;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Charger la config
    let mut config = resolve_config(&cli)?;

    // 3b. Appliquer les overrides CLI
    if let Some(ref dir) = cli.data_dir {
        config.data_dir.clone_from(dir);
    }
    if let Some(ref dir) = cli.out_dir {
        config.out_dir.clone_from(dir);
    }
    if let Some(divs) = cli.parse_divs()? {
        config.divs = divs;
    }
    if let Some(choice) = cli.parse_classifier()? {
        config.classifier = choice;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    if let Some(fraction) = cli.test_fraction {
        config.test_fraction = fraction;
    }
    if let Some(precision) = cli.precision {
        config.precision = precision;
    }
    if cli.remove_malformed {
        config.remove_malformed = true;
    }
    config.clamp_all();

    // === Étape 1/3 : Chargement des échantillons bruts ===
    log::info!(
        "Étape 1/3 : Chargement des échantillons depuis {}",
        config.data_dir.display()
    );
    let policy = if config.remove_malformed {
        DiscardPolicy::RemoveFile
    } else {
        DiscardPolicy::Keep
    };
    let data = load_gesture_data(&config.data_dir, cli.gesture.as_deref(), policy)?;
    if data.values().all(Vec::is_empty) {
        anyhow::bail!(
            "Aucun échantillon valide dans {}",
            config.data_dir.display()
        );
    }

    // === Étape 2/3 : Tables de features (cache disque par granularité) ===
    let pairs = grid_pairs(&config.divs);
    log::info!(
        "Étape 2/3 : {} table(s) de features vers {}",
        pairs.len(),
        config.out_dir.display()
    );
    let tables: Vec<FeatureTable> = pairs
        .into_iter()
        .map(|grid| load_or_build(&config.out_dir, &data, grid))
        .collect::<Result<_>>()?;

    // === Étape 3/3 : Balayage et rapport ===
    let classifier = for_choice(config.classifier, config.knn_k);
    log::info!(
        "Étape 3/3 : Balayage {}x{} — méthode {}",
        config.divs.len(),
        config.divs.len(),
        classifier.name()
    );
    let outcome = optimize_feature_dimensions(
        &config.divs,
        &tables,
        classifier.as_ref(),
        config.test_fraction,
        config.seed,
    )?;

    println!(
        "{}",
        render_accuracy(&outcome, classifier.name(), config.precision)
    );
    println!("{}", best_line(&outcome, config.precision));
    if cli.confusion {
        if let Some(best) = outcome.best() {
            println!(
                "\nMatrice de confusion ({}) :\n{}",
                best.grid,
                render_confusion(&best.confusion, config.precision, true)
            );
        }
    }
    if let Some(ref path) = cli.report_json {
        write_json(path, &outcome, classifier.name())?;
    }

    Ok(())
}

/// Resolve config: defaults when the file is absent, loaded + clamped otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<SweepConfig> {
    if cli.config.exists() {
        fg_core::config::load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(SweepConfig::default())
    }
}
