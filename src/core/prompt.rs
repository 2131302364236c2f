//! Instruction payload sent to the generator.

use crate::domain::SizeTier;

/// Section headings requested from the model, in order
pub const REQUESTED_SECTIONS: [&str; 4] = [
    "Document Analysis",
    "Relevant Data and Metrics",
    "Strategic Insights",
    "Recommended Next Actions",
];

const PREAMBLE: &str = "You are an executive analyst. Read the document below and write an \
executive report in the same language as the document. Base every statement on the \
document; do not invent figures.";

/// Build the single instruction string for one request
pub fn assemble(content: &str, tier: SizeTier, focus: Option<&str>) -> String {
    let mut prompt = String::with_capacity(content.len() + 1024);

    prompt.push_str(PREAMBLE);
    prompt.push_str("\n\nStructure the report in these sections:\n");
    for (i, section) in REQUESTED_SECTIONS.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", i + 1, section));
    }

    prompt.push_str("\nLength: ");
    prompt.push_str(tier.verbosity());
    prompt.push_str("\n\nDocument:\n\"\"\"\n");
    prompt.push_str(content);
    prompt.push_str("\n\"\"\"\n");

    if let Some(focus) = focus {
        prompt.push_str("\nAdditional focus requested by the reader:\n");
        prompt.push_str(focus);
        prompt.push('\n');
    }

    prompt
}
