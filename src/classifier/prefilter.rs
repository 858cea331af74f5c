/// Title fragments that make a posting worth an API call.
pub const RELEVANT_KEYWORDS: &[&str] = &[
    "software",
    "developer",
    "engineer",
    "ai",
    "machine learning",
    "ml",
    "deep learning",
    "web",
    "frontend",
    "backend",
    "full stack",
    "data scientist",
    "junior",
    "entry-level",
];

/// Cheap keyword check run before classification.
///
/// Plain substring matching on the lower-cased title, so short keywords
/// such as "ai" also hit inside longer words.
pub fn is_candidate(title: &str) -> bool {
    let lower = title.to_lowercase();
    RELEVANT_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}
