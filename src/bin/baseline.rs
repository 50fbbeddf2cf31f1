// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Performance baseline script: tokenize a fixed set of synthetic documents
//! and report per-line cost against a latency budget, so a regression shows
//! up as a number instead of a vibe.

use maple_syntax::cache::DocumentHighlightState;
use maple_syntax::edit::EditNotification;
use maple_syntax::token::LanguageId;
use std::time::{Duration, Instant};

struct SampleDocument {
    label: &'static str,
    language: LanguageId,
    lines: Vec<String>,
}

fn synthetic_lines(language: LanguageId, count: usize) -> Vec<String> {
    match language {
        LanguageId::JavaScript | LanguageId::TypeScript => (0..count)
            .map(|i| format!("function handler{i}(event) {{ return state.update(event, {i}); }}"))
            .collect(),
        LanguageId::Python => (0..count).map(|i| format!("def handler_{i}(event): return state.update(event, {i})")).collect(),
        LanguageId::PlainText => (0..count).map(|i| format!("plain text sample line {i}")).collect(),
    }
}

fn sample_documents() -> Vec<SampleDocument> {
    vec![
        SampleDocument { label: "small JavaScript", language: LanguageId::JavaScript, lines: synthetic_lines(LanguageId::JavaScript, 100) },
        SampleDocument { label: "medium TypeScript", language: LanguageId::TypeScript, lines: synthetic_lines(LanguageId::TypeScript, 1_000) },
        SampleDocument { label: "large Python", language: LanguageId::Python, lines: synthetic_lines(LanguageId::Python, 10_000) },
        SampleDocument { label: "plain text", language: LanguageId::PlainText, lines: synthetic_lines(LanguageId::PlainText, 1_000) },
    ]
}

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== maple-syntax tokenization baseline ===\n");

    let documents = sample_documents();
    println!("Running baseline over {} sample documents...\n", documents.len());

    let mut worst_per_line = Duration::ZERO;
    for doc in &documents {
        let start = Instant::now();
        let state = DocumentHighlightState::full_init(doc.language, &doc.lines, 0);
        let elapsed = start.elapsed();
        let per_line = elapsed / doc.lines.len().max(1) as u32;
        if per_line > worst_per_line {
            worst_per_line = per_line;
        }

        println!(
            "{:<20} {:>7} lines  {:>10.3?} total  {:>9.3?}/line  {} tokens",
            doc.label,
            doc.lines.len(),
            elapsed,
            per_line,
            state.line_count(),
        );
    }

    println!("\nWorst per-line cost observed: {worst_per_line:.3?}");
    if worst_per_line.as_micros() > 200 {
        println!("warning: per-line tokenization exceeds the 200us budget this baseline watches for");
    } else {
        println!("all documents tokenized within the per-line latency budget");
    }

    println!("\n=== incremental update early-exit check ===\n");
    for doc in &documents {
        if doc.lines.len() < 1_000 {
            continue;
        }
        let mut state = DocumentHighlightState::full_init(doc.language, &doc.lines, 0);
        let mut edited = doc.lines.clone();
        edited[10] = format!("{} // edited", edited[10]);

        let start = Instant::now();
        state.update(&edited, EditNotification { changed_from_line: 11, total_line_count: edited.len(), version: 1 });
        let elapsed = start.elapsed();

        println!("{:<20} single-line edit re-tokenized in {:>10.3?} (document has {} lines)", doc.label, elapsed, doc.lines.len());
    }

    println!("\n=== Baseline complete ===");
}
