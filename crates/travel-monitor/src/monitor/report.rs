//! Console rendering of tick results.

use crate::monitor::change::ChangeEvent;

const RULE: &str = "================================";

/// Render a change event as the text printed to stdout.
pub fn render(event: &ChangeEvent) -> String {
    match event {
        ChangeEvent::New {
            recommendation,
            activities,
        } => {
            let mut lines = vec![
                String::new(),
                "=== New Travel Recommendation ===".to_string(),
                format!(
                    "Best City: {}, {}",
                    recommendation.best_city, recommendation.country
                ),
                format!("Reasoning: {}", recommendation.reasoning),
            ];
            if !activities.is_empty() {
                lines.push(String::new());
                lines.push(format!("Top {} Things to Do Today:", activities.len()));
                for (i, activity) in activities.iter().enumerate() {
                    lines.push(format!("{}. {}", i + 1, activity));
                }
            }
            lines.push(RULE.to_string());
            lines.join("\n")
        }
        ChangeEvent::Unchanged { city } => {
            format!("Recommendation unchanged: {} is still the best choice", city)
        }
    }
}

pub fn print(event: &ChangeEvent) {
    println!("{}", render(event));
}
