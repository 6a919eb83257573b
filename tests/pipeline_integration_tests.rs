use anyhow::Result;
use nutri_plan::batch::recommend_batch;
use nutri_plan::errors::PipelineError;
use nutri_plan::export::plan_to_csv_string;
use nutri_plan::inference::artifacts::{LABEL_ENCODER_FILE, MODEL_FILE, SCALER_FILE};
use nutri_plan::inference::encoder::FEATURE_NAMES;
use nutri_plan::inference::predictor::{Activation, DenseLayer, NetworkHeads};
use nutri_plan::inference::{DenseNetwork, ModelArtifacts, FEATURE_COUNT};
use nutri_plan::profile::{DietaryHabit, UserProfile};
use nutri_plan::recommend::meal_allocator::menu_for;
use nutri_plan::recommend::{DietArchetype, Meal, RecommendationPipeline};
use std::path::Path;
use tempfile::TempDir;

const CLASSES: [&str; 3] = ["Balanced Diet", "High-Protein Diet", "Low-Carb Diet"];

fn slot(name: &str) -> usize {
    FEATURE_NAMES
        .iter()
        .position(|n| *n == name)
        .expect("feature name exists")
}

// Linear head that copies one input slot through.
fn passthrough(name: &str) -> Vec<DenseLayer> {
    let mut row = vec![0.0; FEATURE_COUNT];
    row[slot(name)] = 1.0;
    vec![DenseLayer { weights: vec![row], bias: vec![0.0], activation: Activation::Linear }]
}

// Class 1 wins for any positive dietary habit code, class 0 otherwise.
fn meal_plan_head() -> Vec<DenseLayer> {
    let mut rows = vec![vec![0.0; FEATURE_COUNT]; CLASSES.len()];
    rows[1][slot("dietary_habit")] = 1.0;
    vec![DenseLayer {
        weights: rows,
        bias: vec![0.0, 0.0, -1.0],
        activation: Activation::Softmax,
    }]
}

fn write_artifacts(dir: &Path, mean: Vec<f64>, scale: Vec<f64>) -> Result<()> {
    let scaler = serde_json::json!({ "mean": mean, "scale": scale });
    std::fs::write(dir.join(SCALER_FILE), scaler.to_string())?;

    let network = DenseNetwork::new(
        Vec::new(),
        NetworkHeads {
            calories: passthrough("caloric_intake"),
            protein: passthrough("protein_intake"),
            carbs: passthrough("carbs_intake"),
            fats: passthrough("fat_intake"),
            meal_plan: meal_plan_head(),
        },
    )?;
    std::fs::write(dir.join(MODEL_FILE), serde_json::to_string(&network)?)?;

    let labels = serde_json::json!({ "classes": CLASSES });
    std::fs::write(dir.join(LABEL_ENCODER_FILE), labels.to_string())?;
    Ok(())
}

fn identity_pipeline() -> Result<(TempDir, RecommendationPipeline)> {
    let dir = TempDir::new()?;
    write_artifacts(dir.path(), vec![0.0; FEATURE_COUNT], vec![1.0; FEATURE_COUNT])?;
    let artifacts = ModelArtifacts::load_from_dir(dir.path())?;
    Ok((dir, RecommendationPipeline::from_artifacts(&artifacts)))
}

fn profile_with_macros(protein: f64, carbs: f64, fat: f64) -> UserProfile {
    UserProfile {
        protein_intake: protein,
        carbs_intake: carbs,
        fat_intake: fat,
        ..Default::default()
    }
}

#[test]
fn test_default_profile_end_to_end() -> Result<()> {
    let (_dir, pipeline) = identity_pipeline()?;
    let rec = pipeline.recommend(&UserProfile::default())?;

    assert_eq!(rec.prediction.calories, 2200.0);
    assert_eq!(rec.prediction.protein, 100.0);
    assert_eq!(rec.prediction.meal_plan_label, "Balanced Diet");
    // 100/370 protein, 70/370 fat
    assert_eq!(rec.archetype, DietArchetype::LowFat);

    let lunch = rec.plan.meal(Meal::Lunch).expect("lunch present");
    assert_eq!(lunch.calories, 2200.0 * 0.4);
    assert_eq!(lunch.food_description, "Steamed vegetables + grilled fish + brown rice");
    assert!((rec.bmi - 24.22).abs() < 0.01);
    Ok(())
}

#[test]
fn test_each_archetype_reachable() -> Result<()> {
    let (_dir, pipeline) = identity_pipeline()?;

    let cases = [
        (profile_with_macros(150.0, 100.0, 60.0), DietArchetype::HighProtein),
        (profile_with_macros(100.0, 200.0, 70.0), DietArchetype::LowFat),
        (profile_with_macros(60.0, 100.0, 150.0), DietArchetype::LowCarb),
        (profile_with_macros(60.0, 200.0, 100.0), DietArchetype::Balanced),
    ];
    for (profile, expected) in cases {
        let rec = pipeline.recommend(&profile)?;
        assert_eq!(rec.archetype, expected, "macros {:?}", (profile.protein_intake, profile.carbs_intake, profile.fat_intake));
        assert_eq!(rec.plan.meals[0].food_description, menu_for(expected, Meal::Breakfast)?);
    }
    Ok(())
}

#[test]
fn test_label_follows_model_output() -> Result<()> {
    let (_dir, pipeline) = identity_pipeline()?;
    let profile = UserProfile { dietary_habit: DietaryHabit::Vegan, ..Default::default() };
    let rec = pipeline.recommend(&profile)?;
    assert_eq!(rec.prediction.meal_plan_label, "High-Protein Diet");
    Ok(())
}

#[test]
fn test_normalization_applied_before_prediction() -> Result<()> {
    let dir = TempDir::new()?;
    let mut mean = vec![0.0; FEATURE_COUNT];
    let mut scale = vec![1.0; FEATURE_COUNT];
    mean[slot("caloric_intake")] = 2000.0;
    scale[slot("caloric_intake")] = 2.0;
    write_artifacts(dir.path(), mean, scale)?;

    let pipeline = RecommendationPipeline::from_artifacts(&ModelArtifacts::load_from_dir(dir.path())?);
    let rec = pipeline.recommend(&UserProfile::default())?;
    assert_eq!(rec.prediction.calories, 100.0);
    Ok(())
}

#[test]
fn test_plan_sums_match_prediction() -> Result<()> {
    let (_dir, pipeline) = identity_pipeline()?;
    let rec = pipeline.recommend(&profile_with_macros(123.4, 321.0, 77.7))?;
    let (calories, protein, carbs, fats) = rec.plan.totals();
    let close = |a: f64, b: f64| (a - b).abs() <= 1e-6 * b.abs();
    assert!(close(calories, rec.prediction.calories));
    assert!(close(protein, rec.prediction.protein));
    assert!(close(carbs, rec.prediction.carbs));
    assert!(close(fats, rec.prediction.fats));
    Ok(())
}

#[test]
fn test_csv_export_of_recommendation() -> Result<()> {
    let (_dir, pipeline) = identity_pipeline()?;
    let rec = pipeline.recommend(&UserProfile::default())?;
    let csv = plan_to_csv_string(&rec.plan)?;

    let mut rdr = csv::Reader::from_reader(csv.as_bytes());
    let headers = rdr.headers()?.clone();
    assert_eq!(&headers[0], "Meal");
    assert_eq!(&headers[1], "Food");
    let meals: Vec<String> = rdr
        .records()
        .map(|r| r.map(|rec| rec[0].to_string()))
        .collect::<Result<_, _>>()?;
    assert_eq!(meals, vec!["Breakfast", "Lunch", "Dinner"]);
    Ok(())
}

#[test]
fn test_batch_preserves_order_and_isolates_failures() -> Result<()> {
    let (_dir, pipeline) = identity_pipeline()?;
    let profiles = vec![
        profile_with_macros(150.0, 100.0, 60.0),
        UserProfile { age: 10.0, ..Default::default() },
        profile_with_macros(60.0, 200.0, 100.0),
    ];

    let results = recommend_batch(&pipeline, &profiles);
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().map(|r| r.archetype), Ok(DietArchetype::HighProtein));
    assert!(matches!(results[1], Err(PipelineError::OutOfRange { field: "age", .. })));
    assert_eq!(results[2].as_ref().map(|r| r.archetype), Ok(DietArchetype::Balanced));
    Ok(())
}

#[test]
fn test_batch_matches_sequential() -> Result<()> {
    let (_dir, pipeline) = identity_pipeline()?;
    let profiles: Vec<UserProfile> = (0..64)
        .map(|i| profile_with_macros(20.0 + i as f64 * 3.0, 50.0 + i as f64 * 5.0, 10.0 + i as f64 * 2.0))
        .collect();

    let parallel = recommend_batch(&pipeline, &profiles);
    for (profile, result) in profiles.iter().zip(parallel) {
        assert_eq!(result, pipeline.recommend(profile));
    }
    Ok(())
}

#[test]
fn test_degenerate_model_output_surfaces() -> Result<()> {
    let dir = TempDir::new()?;
    // shift every macro input to zero
    let mut mean = vec![0.0; FEATURE_COUNT];
    mean[slot("protein_intake")] = 100.0;
    mean[slot("carbs_intake")] = 200.0;
    mean[slot("fat_intake")] = 70.0;
    write_artifacts(dir.path(), mean, vec![1.0; FEATURE_COUNT])?;

    let pipeline = RecommendationPipeline::from_artifacts(&ModelArtifacts::load_from_dir(dir.path())?);
    let err = pipeline.recommend(&UserProfile::default()).unwrap_err();
    assert_eq!(err, PipelineError::DegenerateMacros { total: 0.0 });
    assert!(!err.is_caller_fault());
    Ok(())
}
