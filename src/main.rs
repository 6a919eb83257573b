use anyhow::{Context, Result};
use nutri_plan::batch::{load_profiles_csv, recommend_batch};
use nutri_plan::cli::{parse_args, BatchArgs, Command, OutputFormat, RecommendArgs};
use nutri_plan::config::AppConfig;
use nutri_plan::export::{plan_to_csv_string, render_text, to_json};
use nutri_plan::inference::ModelArtifacts;
use nutri_plan::profile::UserProfile;
use nutri_plan::recommend::RecommendationPipeline;
use tokio::fs;
use tracing::{error, info, warn};

async fn read_profile(args: &RecommendArgs) -> Result<UserProfile> {
    match &args.profile {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read profile file '{}'", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse profile file '{}'", path.display()))
        }
        None => Ok(args.fields.to_profile()?),
    }
}

async fn run_recommend(pipeline: &RecommendationPipeline, config: &AppConfig, args: RecommendArgs) -> Result<()> {
    let profile = read_profile(&args).await?;
    let recommendation = pipeline.recommend(&profile).map_err(|e| {
        if e.is_caller_fault() {
            warn!("Rejected profile: {}", e);
        } else {
            error!("Pipeline fault: {}", e);
        }
        e
    })?;

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&recommendation)),
        OutputFormat::Json => println!("{}", to_json(&recommendation)?),
        OutputFormat::Csv => print!("{}", plan_to_csv_string(&recommendation.plan)?),
    }

    if let Some(export) = args.export {
        let path = export.unwrap_or_else(|| config.export_path.clone());
        let csv = plan_to_csv_string(&recommendation.plan)?;
        fs::write(&path, csv)
            .await
            .with_context(|| format!("Failed to write export file '{}'", path.display()))?;
        info!(path = %path.display(), "Meal plan exported");
    }
    Ok(())
}

fn run_batch(pipeline: &RecommendationPipeline, args: BatchArgs) -> Result<()> {
    let profiles = load_profiles_csv(&args.input)
        .with_context(|| format!("Failed to load profiles from '{}'", args.input.display()))?;
    info!(count = profiles.len(), "Running batch recommendations");

    let results = recommend_batch(pipeline, &profiles);
    let mut failed = 0usize;
    for (row_index, result) in results.iter().enumerate() {
        match result {
            Ok(recommendation) => println!("{}", serde_json::to_string(recommendation)?),
            Err(e) => {
                failed += 1;
                warn!(row_index, "Profile skipped: {}", e);
            }
        }
    }

    info!(succeeded = results.len() - failed, failed, "Batch complete");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = parse_args();
    let config = AppConfig::from_env().with_artifact_dir(cli_args.artifacts.clone());
    config.logging.init()?;

    // Loaded once; every request shares these read-only
    let artifacts = ModelArtifacts::load_from_dir(&config.artifact_dir).with_context(|| {
        format!("Failed to load model artifacts from '{}'", config.artifact_dir.display())
    })?;
    let pipeline = RecommendationPipeline::from_artifacts(&artifacts);

    match cli_args.command {
        Command::Recommend(args) => run_recommend(&pipeline, &config, args).await,
        Command::Batch(args) => run_batch(&pipeline, args),
    }
}
