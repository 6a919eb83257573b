use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::io;
use std::path::Path;

use crate::recommend::{MealPlan, Recommendation};

pub const DEFAULT_EXPORT_FILE: &str = "nutrition_results.csv";

/// One CSV row per meal, in the column layout of the downloadable results.
#[derive(Debug, Serialize)]
struct MealRow<'a> {
    #[serde(rename = "Meal")]
    meal: &'static str,
    #[serde(rename = "Food")]
    food: &'a str,
    #[serde(rename = "Calories (kcal)")]
    calories: f64,
    #[serde(rename = "Protein (g)")]
    protein: f64,
    #[serde(rename = "Carbs (g)")]
    carbs: f64,
    #[serde(rename = "Fats (g)")]
    fats: f64,
}

pub fn write_plan_csv<W: io::Write>(plan: &MealPlan, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for meal in &plan.meals {
        wtr.serialize(MealRow {
            meal: meal.meal_name.name(),
            food: &meal.food_description,
            calories: meal.calories,
            protein: meal.protein,
            carbs: meal.carbs,
            fats: meal.fats,
        })
        .with_context(|| format!("Failed to write CSV row for {}", meal.meal_name))?;
    }
    wtr.flush().context("Failed to flush CSV writer")?;
    Ok(())
}

pub fn plan_to_csv_string(plan: &MealPlan) -> Result<String> {
    let mut buf = Vec::new();
    write_plan_csv(plan, &mut buf)?;
    String::from_utf8(buf).context("CSV output was not valid UTF-8")
}

pub fn export_plan_csv(plan: &MealPlan, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create export file at {:?}", path))?;
    write_plan_csv(plan, file)
}

pub fn to_json(recommendation: &Recommendation) -> Result<String> {
    serde_json::to_string_pretty(recommendation).context("Failed to serialize recommendation")
}

/// Human-readable report. Values are rounded to whole units for display only.
pub fn render_text(recommendation: &Recommendation) -> String {
    let p = &recommendation.prediction;
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "BMI: {:.2}", recommendation.bmi);
    let _ = writeln!(out);
    let _ = writeln!(out, "Predicted daily targets");
    let _ = writeln!(out, "  Calories: {:.0} kcal", p.calories);
    let _ = writeln!(out, "  Protein:  {:.0} g", p.protein);
    let _ = writeln!(out, "  Carbs:    {:.0} g", p.carbs);
    let _ = writeln!(out, "  Fats:     {:.0} g", p.fats);
    let _ = writeln!(out, "  Meal plan: {}", p.meal_plan_label);
    let _ = writeln!(out);
    let _ = writeln!(out, "Recommended diet type: {}", recommendation.archetype);
    for meal in &recommendation.plan.meals {
        let _ = writeln!(out, "{}: {}", meal.meal_name, meal.food_description);
        let _ = writeln!(
            out,
            "  Calories: {:.0} kcal, Protein: {:.0} g, Carbs: {:.0} g, Fats: {:.0} g",
            meal.calories, meal.protein, meal.carbs, meal.fats
        );
    }
    out
}
