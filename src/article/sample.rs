//! Synthetic nutrition corpus for demos and tests.
//!
//! Generation is driven by an explicit seed so the same arguments always
//! produce the same corpus.

use std::path::Path;

use chrono::NaiveDate;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::article::{loader, Article, Corpus};
use crate::error::Result;

pub const CATEGORIES: &[&str] = &[
    "Nutrition Basics",
    "Weight Management",
    "Healthy Recipes",
    "Dietary Supplements",
    "Disease Prevention",
    "Sports Nutrition",
    "Age-specific Nutrition",
    "Food Science",
];

pub const TAGS: &[&str] = &[
    "protein", "carbohydrates", "fats", "vitamins", "minerals", "weight loss", "weight gain",
    "muscle building", "diabetes", "heart health", "gut health", "immune system", "energy",
    "metabolism", "vegetarian", "vegan", "keto", "paleo", "mediterranean", "children",
    "teenagers", "adults", "seniors",
];

pub const TITLES: &[&str] = &[
    "The Role of Protein in Muscle Development",
    "Understanding Carbohydrates: Good vs. Bad",
    "Healthy Fats for Heart Health",
    "Vitamins and Minerals: Your Complete Guide",
    "Weight Loss Strategies That Actually Work",
    "Nutrition for Muscle Gain",
    "Dietary Approaches to Managing Diabetes",
    "Heart-Healthy Eating Patterns",
    "Boosting Your Immune System Through Diet",
    "Nutrition for Energy and Performance",
    "Understanding Your Metabolism",
    "Plant-Based Nutrition Guide",
    "Keto Diet: Benefits and Risks",
    "The Mediterranean Diet and Longevity",
    "Nutrition for Children: Building Healthy Habits",
    "Teenage Nutrition: Supporting Growth and Development",
    "Adult Nutrition: Maintaining Health Through Middle Age",
    "Senior Nutrition: Dietary Needs for Aging Well",
];

pub const CONTENT_SNIPPETS: &[&str] = &[
    "Protein is an essential macronutrient that plays a crucial role in muscle development and repair.",
    "Carbohydrates are the body's main source of energy, but choosing the right types is important.",
    "Not all fats are created equal. Healthy fats are essential for hormone production and cell health.",
    "Vitamins and minerals are micronutrients that support numerous bodily functions.",
    "Sustainable weight loss requires a combination of dietary changes, physical activity, and lifestyle adjustments.",
    "Building muscle requires adequate protein intake, caloric surplus, and resistance training.",
    "Managing diabetes through diet involves monitoring carbohydrate intake and choosing foods with a low glycemic index.",
    "A heart-healthy diet emphasizes fruits, vegetables, whole grains, and limits saturated fats and sodium.",
    "Certain nutrients like vitamin C, vitamin D, and zinc play important roles in immune function.",
    "Proper nutrition can significantly impact your energy levels and athletic performance.",
    "Metabolism refers to all chemical processes in the body that convert food into energy.",
    "Plant-based diets can provide all necessary nutrients when properly planned.",
    "The ketogenic diet is a high-fat, low-carbohydrate diet that can help with weight loss.",
    "The Mediterranean diet is associated with reduced risk of heart disease and longer lifespan.",
    "Children need nutrients to support growth, brain development, and establish healthy eating habits.",
    "Teenage years are characterized by rapid growth and development, requiring increased caloric and nutrient intake.",
    "Adult nutrition focuses on maintaining health and preventing chronic diseases.",
    "As we age, our nutritional needs change, often requiring increased protein and certain vitamins.",
];

/// Generate `num_articles` articles with ids `1..=num_articles`
pub fn generate(num_articles: usize, seed: u64) -> Corpus {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut corpus = Corpus::new();
    for i in 0..num_articles {
        let mut title = TITLES[rng.gen_range(0..TITLES.len())].to_string();
        if rng.gen_bool(0.5) {
            title.push_str(&format!(": Part {}", rng.gen_range(1..5)));
        }

        let mut content = CONTENT_SNIPPETS[rng.gen_range(0..CONTENT_SNIPPETS.len())].to_string();
        for _ in 0..rng.gen_range(3..8) {
            content.push(' ');
            content.push_str(CONTENT_SNIPPETS[rng.gen_range(0..CONTENT_SNIPPETS.len())]);
        }

        let category = CATEGORIES[rng.gen_range(0..CATEGORIES.len())];
        let num_tags = rng.gen_range(2..6);
        let tags: Vec<String> = TAGS
            .choose_multiple(&mut rng, num_tags)
            .map(|t| t.to_string())
            .collect();

        let date = NaiveDate::from_ymd_opt(
            rng.gen_range(2022..2024),
            rng.gen_range(1..13),
            rng.gen_range(1..29),
        );

        corpus.push(Article {
            id: i as i64 + 1,
            title,
            content,
            tags,
            category: category.to_string(),
            author: format!("Author {}", rng.gen_range(1..10)),
            date,
        });
    }
    corpus
}

/// Generate a corpus and write it as CSV
pub fn write_sample_csv<P: AsRef<Path>>(path: P, num_articles: usize, seed: u64) -> Result<Corpus> {
    let corpus = generate(num_articles, seed);
    loader::save_articles(&corpus, path)?;
    Ok(corpus)
}
