use std::time::{Duration, Instant};

use scribe_tui::editor::{
    parse_markup, to_markup, Caret, EditorSession, FormatKind, NodePath, Selection,
};
use scribe_tui::render::render_document;
use scribe_tui::theme::Theme;

/// Performance benchmark suite for editor operations
///
/// Run with: cargo test --release --bench performance -- --nocapture
///
/// This measures:
/// - Document rendering performance
/// - Linear caret movement
/// - Character insertion/deletion
/// - Formatting over large selections
/// - Markup parsing and serialization
const SMALL_DOC_PARAGRAPHS: usize = 10;
const MEDIUM_DOC_PARAGRAPHS: usize = 100;
const LARGE_DOC_PARAGRAPHS: usize = 1000;

const ITERATIONS: usize = 100;

const SAMPLE_WORDS: &[&str] = &[
    "Lorem",
    "ipsum",
    "dolor",
    "sit",
    "amet",
    "consectetur",
    "adipiscing",
    "elit",
    "sed",
    "do",
    "eiusmod",
    "tempor",
    "incididunt",
    "ut",
    "labore",
    "et",
    "dolore",
    "magna",
    "aliqua",
];

/// Builds markup with the given number of paragraphs, mixing headings,
/// styled runs, and line breaks the way a real document would.
fn build_markup(num_paragraphs: usize, words_per_paragraph: usize) -> String {
    let mut out = String::new();
    for i in 0..num_paragraphs {
        let mut text = String::new();
        for j in 0..words_per_paragraph {
            if j > 0 {
                text.push(' ');
            }
            text.push_str(SAMPLE_WORDS[(i + j) % SAMPLE_WORDS.len()]);
        }
        match i % 5 {
            0 => {
                out.push_str("<h2>");
                out.push_str(&text);
                out.push_str("</h2>");
            }
            1 => {
                out.push_str("<b>");
                out.push_str(&text);
                out.push_str("</b><br>");
            }
            2 => {
                out.push_str("<i>");
                out.push_str(&text);
                out.push_str("</i><br>");
            }
            3 => {
                out.push_str("<b><i>");
                out.push_str(&text);
                out.push_str("</i></b><br>");
            }
            _ => {
                out.push_str(&text);
                out.push_str("<br>");
            }
        }
    }
    out
}

struct BenchmarkResult {
    name: String,
    iterations: usize,
    total_duration: Duration,
    avg_duration: Duration,
    min_duration: Duration,
    max_duration: Duration,
}

impl BenchmarkResult {
    fn print(&self) {
        println!("\n{}", "=".repeat(70));
        println!("Benchmark: {}", self.name);
        println!("{}", "=".repeat(70));
        println!("Iterations:     {}", self.iterations);
        println!("Total time:     {:?}", self.total_duration);
        println!("Average:        {:?}", self.avg_duration);
        println!("Min:            {:?}", self.min_duration);
        println!("Max:            {:?}", self.max_duration);

        if self.avg_duration.as_millis() > 100 {
            println!("\n⚠️  WARNING: Average duration > 100ms (user-perceptible lag)");
        } else if self.avg_duration.as_millis() > 16 {
            println!("\n⚠️  WARNING: Average duration > 16ms (may drop frames)");
        }
    }
}

fn benchmark<F>(name: &str, iterations: usize, mut f: F) -> BenchmarkResult
where
    F: FnMut(),
{
    let mut durations = Vec::with_capacity(iterations);

    // Warmup
    for _ in 0..10 {
        f();
    }

    for _ in 0..iterations {
        let start = Instant::now();
        f();
        durations.push(start.elapsed());
    }

    let total_duration: Duration = durations.iter().sum();
    let avg_duration = total_duration / iterations as u32;
    let min_duration = durations.iter().min().copied().unwrap_or_default();
    let max_duration = durations.iter().max().copied().unwrap_or_default();

    BenchmarkResult {
        name: name.to_string(),
        iterations,
        total_duration,
        avg_duration,
        min_duration,
        max_duration,
    }
}

#[test]
fn bench_rendering_performance() {
    let theme = Theme::default();
    let sizes = [
        ("small", SMALL_DOC_PARAGRAPHS),
        ("medium", MEDIUM_DOC_PARAGRAPHS),
        ("large", LARGE_DOC_PARAGRAPHS),
    ];
    for (label, paragraphs) in sizes {
        let tree = parse_markup(&build_markup(paragraphs, 12));
        let result = benchmark(
            &format!("render {label} document at width 80"),
            ITERATIONS,
            || {
                let rendered = render_document(&tree, 80, None, &theme);
                assert!(rendered.total_lines > 0);
            },
        );
        result.print();
    }
}

#[test]
fn bench_caret_movement() {
    let mut session = EditorSession::from_markup(&build_markup(MEDIUM_DOC_PARAGRAPHS, 12));
    let result = benchmark("move caret left/right through styled runs", ITERATIONS, || {
        for _ in 0..20 {
            session.move_left(false);
        }
        for _ in 0..20 {
            session.move_right(false);
        }
    });
    result.print();
}

#[test]
fn bench_character_insertion() {
    let result = benchmark("insert and delete a sentence", ITERATIONS, || {
        let mut session = EditorSession::from_markup(&build_markup(SMALL_DOC_PARAGRAPHS, 12));
        for ch in "The quick brown fox jumps over the lazy dog.".chars() {
            session.insert_char(ch);
        }
        for _ in 0..45 {
            session.backspace();
        }
    });
    result.print();
}

#[test]
fn bench_formatting_large_selection() {
    let result = benchmark("toggle bold over a whole large document", ITERATIONS, || {
        let mut session = EditorSession::from_markup(&build_markup(LARGE_DOC_PARAGRAPHS, 12));
        session.select_all();
        assert!(session.apply_format(FormatKind::Bold));
        session.set_selection(Selection::collapsed(Caret::new(
            NodePath::from_indices(vec![0, 0, 0]),
            0,
        )));
        assert!(session.apply_format(FormatKind::Bold));
    });
    result.print();
}

#[test]
fn bench_markup_round_trip() {
    let markup = build_markup(LARGE_DOC_PARAGRAPHS, 12);
    let result = benchmark("parse and reserialize a large document", ITERATIONS, || {
        let tree = parse_markup(&markup);
        let out = to_markup(&tree);
        assert!(!out.is_empty());
    });
    result.print();
}
