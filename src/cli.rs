use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::errors::PipelineError;
use crate::profile::user_profile::{
    AGE, BLOOD_SUGAR, CALORIC_INTAKE, CARBS_INTAKE, CHOLESTEROL, DAILY_STEPS, DIASTOLIC_BP,
    EXERCISE_PER_WEEK, FAT_INTAKE, HEIGHT_CM, PROTEIN_INTAKE, SLEEP_HOURS, SYSTOLIC_BP, WEIGHT_KG,
};
use crate::profile::UserProfile;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding scaler.json, model.json and label_encoder.json
    #[arg(short, long, global = true)]
    pub artifacts: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recommend daily targets and a three-meal plan for one profile
    Recommend(RecommendArgs),
    /// Recommend for every profile in a CSV file, one JSON line per profile
    Batch(BatchArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Read the profile from a JSON file instead of the flags below
    #[arg(long)]
    pub profile: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the meal plan as CSV (to the configured path when no value is given)
    #[arg(long, num_args = 0..=1)]
    pub export: Option<Option<PathBuf>>,

    #[command(flatten)]
    pub fields: ProfileArgs,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// CSV file with one profile per row
    #[arg(short, long)]
    pub input: PathBuf,
}

/// Profile fields as flags, defaulting to the form defaults.
#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[arg(long, default_value_t = AGE.default)]
    pub age: f64,
    #[arg(long, default_value = "Male")]
    pub gender: String,
    #[arg(long, default_value_t = HEIGHT_CM.default)]
    pub height: f64,
    #[arg(long, default_value_t = WEIGHT_KG.default)]
    pub weight: f64,
    #[arg(long, default_value_t = SYSTOLIC_BP.default)]
    pub bp_sys: f64,
    #[arg(long, default_value_t = DIASTOLIC_BP.default)]
    pub bp_dia: f64,
    #[arg(long, default_value_t = CHOLESTEROL.default)]
    pub cholesterol: f64,
    #[arg(long, default_value_t = BLOOD_SUGAR.default)]
    pub sugar: f64,
    #[arg(long, default_value_t = DAILY_STEPS.default)]
    pub daily_steps: f64,
    /// Exercise sessions per week
    #[arg(long, default_value_t = EXERCISE_PER_WEEK.default)]
    pub exercise: f64,
    #[arg(long, default_value_t = SLEEP_HOURS.default)]
    pub sleep: f64,
    /// None, Occasional or Regular
    #[arg(long, default_value = "None")]
    pub alcohol: String,
    /// Non-smoker, Occasional or Regular
    #[arg(long, default_value = "Non-smoker")]
    pub smoking: String,
    /// Vegetarian, Non-Vegetarian, Vegan or Other
    #[arg(long, default_value = "Vegetarian")]
    pub diet: String,
    /// kcal/day
    #[arg(long, default_value_t = CALORIC_INTAKE.default)]
    pub calories: f64,
    /// g/day
    #[arg(long, default_value_t = PROTEIN_INTAKE.default)]
    pub protein: f64,
    #[arg(long, default_value_t = CARBS_INTAKE.default)]
    pub carbs: f64,
    #[arg(long, default_value_t = FAT_INTAKE.default)]
    pub fat: f64,
    /// Western, Indian or Mediterranean
    #[arg(long, default_value = "Western")]
    pub cuisine: String,
}

impl ProfileArgs {
    /// Builds the profile, rejecting category text outside the known choices.
    pub fn to_profile(&self) -> Result<UserProfile, PipelineError> {
        Ok(UserProfile {
            age: self.age,
            gender: self.gender.parse()?,
            height_cm: self.height,
            weight_kg: self.weight,
            systolic_bp: self.bp_sys,
            diastolic_bp: self.bp_dia,
            cholesterol: self.cholesterol,
            blood_sugar: self.sugar,
            daily_steps: self.daily_steps,
            exercise_per_week: self.exercise,
            sleep_hours: self.sleep,
            alcohol: self.alcohol.parse()?,
            smoking: self.smoking.parse()?,
            dietary_habit: self.diet.parse()?,
            caloric_intake: self.calories,
            protein_intake: self.protein,
            carbs_intake: self.carbs,
            fat_intake: self.fat,
            cuisine: self.cuisine.parse()?,
        })
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
