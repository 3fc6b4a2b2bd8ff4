//! 从用户消息中抽取造型偏好（关键词匹配 + 预算金额）

use std::sync::OnceLock;

use regex::Regex;

use crate::api::types::UserContext;

/// 访谈问题，按顺序逐个提出
pub const INTERVIEW_QUESTIONS: [&str; 4] = [
    "What's the occasion you're dressing for? (e.g., work, date, casual outing, party)",
    "What's your preferred style? (e.g., minimalist, streetwear, classic, bohemian, edgy)",
    "Do you have any color preferences or colors you'd like to avoid?",
    "What's your budget range for this outfit? (e.g., $50-100, $100-200, $200+)",
];

const OCCASIONS: &[(&str, &[&str])] = &[
    ("work", &["work", "office", "professional", "business", "meeting"]),
    ("casual", &["casual", "everyday", "relaxed", "comfortable"]),
    ("date", &["date", "romantic", "dinner"]),
    ("party", &["party", "celebration", "event", "festive"]),
    ("formal", &["formal", "elegant", "sophisticated", "dressy"]),
];

const STYLES: &[(&str, &[&str])] = &[
    ("minimalist", &["minimalist", "simple", "clean", "minimal"]),
    ("streetwear", &["streetwear", "urban", "street", "hip hop"]),
    ("classic", &["classic", "traditional", "timeless", "conservative"]),
    ("bohemian", &["bohemian", "boho", "free-spirited", "artistic"]),
    ("edgy", &["edgy", "bold", "alternative", "punk", "rock"]),
];

const COLORS: &[&str] = &[
    "black", "white", "navy", "beige", "grey", "red", "green", "blue", "pink", "brown",
];

fn budget_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$(\d+)[-\s]*(\d+)?").expect("valid budget pattern"))
}

fn first_match(message: &str, table: &[(&str, &[&str])]) -> Option<String> {
    table
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| message.contains(k)))
        .map(|(name, _)| (*name).to_string())
}

/// 抽取场合 / 风格 / 颜色 / 预算；没有命中的字段保持 None
pub fn extract_context(message: &str) -> UserContext {
    let lower = message.to_lowercase();
    let budget = budget_pattern().captures(message).map(|caps| {
        let min = &caps[1];
        match caps.get(2) {
            Some(max) => format!("${}-{}", min, max.as_str()),
            None => format!("${}+", min),
        }
    });

    UserContext {
        occasion: first_match(&lower, OCCASIONS),
        style_preference: first_match(&lower, STYLES),
        color_preference: COLORS
            .iter()
            .find(|c| lower.contains(*c))
            .map(|c| (*c).to_string()),
        budget,
        body_type: None,
    }
}

/// "$100-200" → 200，"$200+" → None（无上限）
pub fn budget_ceiling(budget: &str) -> Option<f64> {
    let caps = budget_pattern().captures(budget)?;
    caps.get(2)?.as_str().parse().ok()
}

/// 第 n 条用户消息之后应提出的问题
pub fn next_question(user_messages: usize) -> Option<&'static str> {
    INTERVIEW_QUESTIONS.get(user_messages).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_occasion_and_style() {
        let ctx = extract_context("I need something clean and simple for the office");
        assert_eq!(ctx.occasion.as_deref(), Some("work"));
        assert_eq!(ctx.style_preference.as_deref(), Some("minimalist"));
        assert_eq!(ctx.budget, None);
    }

    #[test]
    fn test_extracts_budget_range() {
        assert_eq!(extract_context("around $100-200").budget.as_deref(), Some("$100-200"));
        assert_eq!(extract_context("$150 or more").budget.as_deref(), Some("$150+"));
    }

    #[test]
    fn test_budget_ceiling() {
        assert_eq!(budget_ceiling("$100-200"), Some(200.0));
        assert_eq!(budget_ceiling("$200+"), None);
        assert_eq!(budget_ceiling("cheap"), None);
    }

    #[test]
    fn test_question_sequence() {
        assert_eq!(next_question(0), Some(INTERVIEW_QUESTIONS[0]));
        assert_eq!(next_question(3), Some(INTERVIEW_QUESTIONS[3]));
        assert_eq!(next_question(4), None);
    }
}
