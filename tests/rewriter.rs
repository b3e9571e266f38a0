//! Citation Rewriter Integration Tests
//!
//! Tests for grounding, demotion, idempotence and pass-through behavior.

use citeground::anchor::find_matches;
use citeground::citations::{
    clean_citations, extract_citations, validate_citations, CitationOutcome, ValidateOptions,
};
use citeground::domain::{AgentRun, IndexingScheme, Message, Transcript};

fn sample_run() -> AgentRun {
    AgentRun::new(
        "run-1",
        vec![Transcript::new(
            "t0",
            vec![
                Message::user("Please summarize the report."),
                Message::assistant("I understand the task and will help you."),
                Message::assistant("The  report\nshows   growth in Q3."),
            ],
        )],
    )
}

fn block_text(run: &AgentRun, transcript: usize, block: usize) -> &str {
    run.transcripts[transcript].block_text(block).unwrap()
}

const SAMPLES: &[&str] = &[
    "[T0B1:<RANGE>I understand</RANGE>][T0B1:<RANGE>nonexistent</RANGE>][T0B1]",
    "Growth is up [T0B2:<RANGE>report shows growth</RANGE>] per [T0B0].",
    "Bad [T0B2:<RANGE>shows decline</RANGE>] and missing [T4B0:<RANGE>x</RANGE>] [T0B9].",
    "Malformed [T0B1:<RANGE>unterminated and [T0B0] stays.",
    "Multi-line [T0B2:<RANGE>The report\nshows</RANGE>] and [T0B2:<RANGE>the report</RANGE>]",
    "No citations at all, just [brackets] and [1].",
    "",
];

#[test]
fn test_demotion_example() {
    let run = sample_run();
    let input = "[T0B1:<RANGE>I understand</RANGE>][T0B1:<RANGE>nonexistent</RANGE>][T0B1]";

    assert_eq!(
        clean_citations(input, &run),
        "[T0B1:<RANGE>I understand</RANGE>][T0B1][T0B1]"
    );
}

#[test]
fn test_idempotent() {
    let run = sample_run();
    for input in SAMPLES {
        let once = clean_citations(input, &run);
        let twice = clean_citations(&once, &run);
        assert_eq!(once, twice, "not idempotent for {:?}", input);
    }
}

#[test]
fn test_output_never_longer() {
    let run = sample_run();
    for input in SAMPLES {
        assert!(clean_citations(input, &run).len() <= input.len());
    }
}

#[test]
fn test_surviving_ranges_are_grounded() {
    let run = sample_run();
    for input in SAMPLES {
        let cleaned = clean_citations(input, &run);
        for token in extract_citations(&cleaned) {
            let Some(range) = token.range_text.as_deref() else {
                continue;
            };
            // Only resolvable tokens are checked; unresolved ones pass through
            if let Some(text) = run
                .transcripts
                .get(token.transcript_index)
                .and_then(|t| t.block_text(token.block_index))
            {
                assert!(
                    !find_matches(text, range).is_empty(),
                    "ungrounded range survived: {}",
                    token
                );
            }
        }
    }
}

#[test]
fn test_whitespace_tolerant_grounding_keeps_wording() {
    let run = sample_run();
    let input = "Growth is up [T0B2:<RANGE>report shows growth</RANGE>] per [T0B0].";

    assert_eq!(clean_citations(input, &run), input);
    assert!(!find_matches(block_text(&run, 0, 2), "report shows growth").is_empty());
}

#[test]
fn test_out_of_range_citations_pass_through() {
    let run = sample_run();
    let input = "Bad [T0B2:<RANGE>shows decline</RANGE>] and missing [T4B0:<RANGE>x</RANGE>] [T0B9].";

    assert_eq!(
        clean_citations(input, &run),
        "Bad [T0B2] and missing [T4B0:<RANGE>x</RANGE>] [T0B9]."
    );
}

#[test]
fn test_malformed_syntax_left_alone() {
    let run = sample_run();
    let input = "Malformed [T0B1:<RANGE>unterminated and [T0B0] stays.";
    assert_eq!(clean_citations(input, &run), input);
}

#[test]
fn test_zero_transcripts_pass_through() {
    let run = AgentRun::new("empty", Vec::new());
    for input in SAMPLES {
        assert_eq!(clean_citations(input, &run), *input);
    }
}

#[test]
fn test_report_matches_rewrite() {
    let run = sample_run();
    let input = SAMPLES[2];

    let validation = validate_citations(input, &run, &ValidateOptions::default());
    let summary = validation.report.summary();

    assert_eq!(summary.total, 3);
    assert_eq!(summary.demoted, 1);
    assert_eq!(summary.unresolved, 2);
    assert!(!validation.report.is_clean());

    for citation in &validation.report.citations {
        assert_eq!(&input[citation.span[0]..citation.span[1]], citation.raw);
    }
    assert!(matches!(
        validation.report.citations[0].outcome,
        CitationOutcome::Demoted
    ));
}

#[test]
fn test_multiple_transcripts() {
    let run = AgentRun::new(
        "multi",
        vec![
            Transcript::new("a", vec![Message::user("apples are red")]),
            Transcript::new(
                "b",
                vec![Message::user("bananas"), Message::assistant("are yellow")],
            ),
        ],
    );

    let input = "[T1B1:<RANGE>are yellow</RANGE>] [T0B0:<RANGE>are yellow</RANGE>]";
    assert_eq!(
        clean_citations(input, &run),
        "[T1B1:<RANGE>are yellow</RANGE>] [T0B0]"
    );

    let continuous = ValidateOptions {
        scheme: IndexingScheme::Continuous,
        ..Default::default()
    };
    let input = "[T0B2:<RANGE>are yellow</RANGE>] [T0B1:<RANGE>are yellow</RANGE>]";
    assert_eq!(
        validate_citations(input, &run, &continuous).text,
        "[T0B2:<RANGE>are yellow</RANGE>] [T0B1]"
    );
}
