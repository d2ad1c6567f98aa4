//! Placeholder assistant helpers: keyword-driven chat replies and a
//! couple of cheap text heuristics. No model, no network -- these are
//! the stand-ins a real assistant integration would replace.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IssueKind {
    Formatting,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrammarIssue {
    pub kind: IssueKind,
    pub message: String,
    /// Character position of the first occurrence in the checked text.
    pub position: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GrammarReport {
    pub issues: Vec<GrammarIssue>,
    pub suggestions: Vec<String>,
}

pub fn chat_response(message: &str, _context: &str) -> String {
    let lower = message.to_lowercase();
    if lower.contains("grammar") || lower.contains("spell") {
        "I can help you check grammar and spelling! Try using the 'Check Grammar' button or paste your text here.".to_string()
    } else if lower.contains("style") || lower.contains("improve") {
        "I can help improve your writing style! Use the 'Improve Style' button for suggestions.".to_string()
    } else if lower.contains("idea") || lower.contains("suggest") {
        "I can help generate writing ideas! Use the 'Generate Ideas' button or tell me what you're writing about.".to_string()
    } else if lower.contains("hello") || lower.contains("hi") {
        "Hello! I'm your writing assistant. How can I help you with your writing today?".to_string()
    } else if lower.contains("help") {
        "I can help you with:\n\u{2022} Grammar and spelling checks\n\u{2022} Writing style improvements\n\u{2022} Generating ideas\n\u{2022} Organizing your thoughts\n\nWhat would you like help with?".to_string()
    } else {
        format!(
            "I understand you're asking about '{message}'. I'm here to help with your writing! Try asking about grammar, style, or ideas for your piece."
        )
    }
}

pub fn check_grammar(text: &str) -> GrammarReport {
    let mut report = GrammarReport::default();
    if text.is_empty() {
        return report;
    }
    if let Some(byte_pos) = text.find("  ") {
        report.issues.push(GrammarIssue {
            kind: IssueKind::Formatting,
            message: "Double spaces detected".to_string(),
            position: text[..byte_pos].chars().count(),
        });
    }
    for issue in &report.issues {
        match issue.kind {
            IssueKind::Formatting => report
                .suggestions
                .push("Remove extra spaces for better formatting.".to_string()),
        }
    }
    report
}

pub fn style_suggestions(text: &str) -> Vec<String> {
    let mut suggestions = Vec::new();
    if text.is_empty() {
        return suggestions;
    }
    if text.split('.').any(|sentence| sentence.len() > 100) {
        suggestions.push("Consider breaking up long sentences for better readability.".to_string());
    }
    if text
        .split("\n\n")
        .next()
        .is_some_and(|paragraph| paragraph.len() > 500)
    {
        suggestions.push("Consider splitting long paragraphs into shorter ones.".to_string());
    }
    suggestions
}

pub fn writing_ideas(_context: &str, topic: &str) -> Vec<String> {
    if topic.is_empty() {
        return vec![
            "Write about a personal experience that changed your perspective".to_string(),
            "Describe a place that holds special meaning to you".to_string(),
            "Create a dialogue between two contrasting characters".to_string(),
            "Write about a moment of realization or discovery".to_string(),
        ];
    }
    vec![
        format!("Explore different perspectives on '{topic}'"),
        format!("Write a story about '{topic}' from a unique angle"),
        format!("Create a detailed description of '{topic}'"),
    ]
}
