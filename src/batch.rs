use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rayon::prelude::*;
use std::path::Path;

use crate::errors::PipelineError;
use crate::profile::UserProfile;
use crate::recommend::{Recommendation, RecommendationPipeline};

/// Reads profiles from a CSV file whose header uses the profile field names.
///
/// Missing columns take the form defaults; categorical columns hold display text
/// (e.g. `Non-smoker`). A malformed row fails the whole load.
pub fn load_profiles_csv(csv_path: &Path) -> Result<Vec<UserProfile>> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!("Profile CSV file not found at: {:?}", csv_path));
    }
    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open profile CSV file at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).trim(csv::Trim::All).from_reader(file);

    let mut profiles = Vec::new();
    for (row_index, result) in rdr.deserialize::<UserProfile>().enumerate() {
        let profile = result.with_context(|| format!("Failed to read profile at row index {}", row_index))?;
        profiles.push(profile);
    }

    if profiles.is_empty() {
        return Err(anyhow::anyhow!("No profiles loaded from {:?}", csv_path));
    }
    Ok(profiles)
}

/// Runs the shared pipeline over every profile in parallel.
///
/// Results come back in input order; one failing profile does not affect the others.
pub fn recommend_batch(
    pipeline: &RecommendationPipeline,
    profiles: &[UserProfile],
) -> Vec<Result<Recommendation, PipelineError>> {
    profiles.par_iter().map(|profile| pipeline.recommend(profile)).collect()
}
