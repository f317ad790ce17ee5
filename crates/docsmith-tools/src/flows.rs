//! Scripted driver flows built on the tools
//!
//! The formatting demo issues six literal formatting calls and reads the
//! result back. The conversion check builds a sample document whose name
//! contains spaces, converts it and classifies the outcome.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use docsmith_pdf::{assess_outcome, candidate_paths, Converter, Verdict};
use tracing::{debug, info};

use crate::tools::content::{
    add_heading, add_paragraph, describe_formatting, HeadingOptions, ParagraphOptions,
};
use crate::tools::convert::convert_outcome_with;
use crate::tools::document::create_document;

/// One formatting call of the demo
#[derive(Debug, Clone)]
pub enum DemoCall {
    Paragraph {
        text: &'static str,
        options: ParagraphOptions,
    },
    Heading {
        text: &'static str,
        options: HeadingOptions,
    },
}

/// A labelled formatting call
#[derive(Debug, Clone)]
pub struct DemoStep {
    pub label: &'static str,
    pub call: DemoCall,
}

fn font(name: &str, size: f32) -> (Option<String>, Option<f32>) {
    (Some(name.to_string()), Some(size))
}

/// The six formatting calls, in order
pub fn formatting_demo_steps() -> Vec<DemoStep> {
    let (helvetica, size14) = font("Helvetica", 14.0);
    let section = |text: &'static str| DemoCall::Heading {
        text,
        options: HeadingOptions {
            level: 2,
            font_name: helvetica.clone(),
            font_size: size14,
            bold: Some(true),
            border_bottom: true,
            ..Default::default()
        },
    };

    vec![
        DemoStep {
            label: "Name in Helvetica 36pt bold",
            call: DemoCall::Paragraph {
                text: "JAMES MEHORTER",
                options: ParagraphOptions {
                    font_name: helvetica.clone(),
                    font_size: Some(36.0),
                    bold: Some(true),
                    ..Default::default()
                },
            },
        },
        DemoStep {
            label: "Title line in Helvetica 14pt",
            call: DemoCall::Paragraph {
                text: "Principal Software Engineer | Technical Team Lead",
                options: ParagraphOptions {
                    font_name: helvetica.clone(),
                    font_size: size14,
                    ..Default::default()
                },
            },
        },
        DemoStep {
            label: "Section heading with bottom border",
            call: section("PROFESSIONAL SUMMARY"),
        },
        DemoStep {
            label: "Body text in Times New Roman 14pt",
            call: DemoCall::Paragraph {
                text: "This is body text that should be in Times New Roman at 14pt. It demonstrates the ability to apply different fonts to different paragraphs.",
                options: ParagraphOptions {
                    font_name: Some("Times New Roman".to_string()),
                    font_size: size14,
                    ..Default::default()
                },
            },
        },
        DemoStep {
            label: "Another section heading",
            call: section("SKILLS"),
        },
        DemoStep {
            label: "Italic text with color",
            call: DemoCall::Paragraph {
                text: "This text is italic and colored blue.",
                options: ParagraphOptions {
                    font_name: Some("Arial".to_string()),
                    font_size: Some(12.0),
                    italic: Some(true),
                    color: Some("0000FF".to_string()),
                    ..Default::default()
                },
            },
        },
    ]
}

/// Messages produced by one demo run
#[derive(Debug, Clone)]
pub struct FormattingDemo {
    /// Message from creating the document
    pub created: String,
    /// Step label and tool message, per formatting call
    pub results: Vec<(&'static str, String)>,
    /// Read-back formatting report
    pub report: String,
}

/// Create `filename` and run the six formatting calls against it.
///
/// Individual failures are recorded in the results, never raised.
pub async fn run_formatting_demo(filename: &str) -> FormattingDemo {
    let created = create_document(filename, Some("Formatting Test"), Some("Test Script")).await;

    let mut results = Vec::new();
    for step in formatting_demo_steps() {
        let message = match &step.call {
            DemoCall::Paragraph { text, options } => add_paragraph(filename, text, options).await,
            DemoCall::Heading { text, options } => add_heading(filename, text, options).await,
        };
        results.push((step.label, message));
    }

    let report = describe_formatting(filename).await;
    FormattingDemo {
        created,
        results,
        report,
    }
}

/// Source document name used by the conversion check
pub const SAMPLE_SOURCE_NAME: &str = "sample document with spaces.docx";
/// Requested PDF name used by the conversion check
pub const SAMPLE_OUTPUT_NAME: &str = "converted output.pdf";

/// Outcome of the conversion check
#[derive(Debug, Clone)]
pub struct ConversionCheck {
    pub source: PathBuf,
    pub requested: PathBuf,
    /// Message returned by the conversion tool
    pub message: String,
    pub verdict: Verdict,
}

/// Write the sample document into `work_dir`
pub async fn write_sample_document(work_dir: &Path) -> Result<PathBuf, String> {
    let source = work_dir.join(SAMPLE_SOURCE_NAME);
    let name = source.to_string_lossy().into_owned();

    let created = create_document(&name, Some("Conversion Test Document"), None).await;
    if !created.ends_with("created successfully") {
        return Err(created);
    }
    let heading = HeadingOptions {
        level: 1,
        ..Default::default()
    };
    let steps = [
        add_heading(&name, "Conversion Test Document", &heading).await,
        add_paragraph(
            &name,
            "This is a test paragraph for PDF conversion. Contains ASCII too.",
            &ParagraphOptions::default(),
        )
        .await,
        add_paragraph(
            &name,
            "Second paragraph: Contains special characters and spaces to cover path/content edge cases.",
            &ParagraphOptions::default(),
        )
        .await,
    ];
    if let Some(failure) = steps.into_iter().find(|m| !m.contains(" added to ")) {
        return Err(failure);
    }
    Ok(source)
}

/// Build the sample document, convert it and classify the result
pub async fn check_conversion(converter: &Converter, work_dir: &Path) -> ConversionCheck {
    let requested = work_dir.join(SAMPLE_OUTPUT_NAME);
    let source = match write_sample_document(work_dir).await {
        Ok(source) => source,
        Err(message) => {
            return ConversionCheck {
                source: work_dir.join(SAMPLE_SOURCE_NAME),
                requested,
                verdict: Verdict::Fail {
                    reason: format!("could not build the sample document: {}", message),
                },
                message,
            }
        }
    };

    // A reused work dir may still hold output from an earlier check
    for stale in candidate_paths(&requested, &source) {
        if let Err(e) = std::fs::remove_file(&stale) {
            if e.kind() != std::io::ErrorKind::NotFound {
                let reason = format!("could not clear {}: {}", stale.display(), e);
                return ConversionCheck {
                    source,
                    requested,
                    message: reason.clone(),
                    verdict: Verdict::Fail { reason },
                };
            }
        } else {
            debug!(path = %stale.display(), "removed PDF left by an earlier check");
        }
    }

    let started = SystemTime::now();
    let outcome = convert_outcome_with(
        converter,
        &source.to_string_lossy(),
        Some(requested.to_string_lossy().as_ref()),
    )
    .await;
    let verdict = assess_outcome(&outcome, &requested, &source, work_dir, started);
    info!(%verdict, "conversion check finished");

    ConversionCheck {
        source,
        requested,
        message: outcome.message,
        verdict,
    }
}
