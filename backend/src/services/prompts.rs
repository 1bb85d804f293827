//! Prompt text sent to the explainer for generation and blending.

use crate::models::ExplanationBlock;

const GENERATE_PREAMBLE: &str = "\
You are an excellent explainer tasked with writing a natural, paragraph-style explanation.

Instructions:
- Seamlessly weave together the communicative intentions listed below.
- Assume the reader is intelligent and curious.
- Prioritize clarity, cohesion, and conciseness; avoid unnecessary verbosity.
- Do not use headings, numbers, bullet points, or explicit references to block types.
- Output only the final paragraph, without any introductory phrases or commentary.
- If a block relates to something specific, especially a language or person, weight those blocks much more highly.
- If a block mentions a language, explain only in that language. Otherwise, explain in English";

const BLEND_PREAMBLE: &str = "\
You are tasked with writing a single, natural explanation by blending the communicative purposes of the following explanation blocks.

Instructions:
- Seamlessly integrate the ideas as if explaining to an intelligent, curious reader.
- Reflect the specific purpose and nuance of each block within the final explanation.
- Do not copy block labels, numbers, or headings.
- Maintain a smooth, coherent narrative; avoid abrupt transitions.
- Match tone naturally to the block content (e.g., if a block is an analogy, weave it conversationally).
- Output only the final paragraph, with no titles, introductions, or commentary.
- If a block relates to something specific, especially a language or person, weight those blocks much more highly.
- If a block mentions a language, explain only in that language. Otherwise, explain in English";

/// `- <description>` per block, one per line.
pub fn structure_hints(blocks: &[ExplanationBlock]) -> String {
    blocks
        .iter()
        .map(|b| format!("- {}", b.description))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prompt asking for one paragraph that follows the chain's structure.
pub fn generate_prompt(user_prompt: &str, blocks: &[ExplanationBlock]) -> String {
    format!(
        "{}\nPrompt: \"{}\"\n\nStructure Hints:\n{}",
        GENERATE_PREAMBLE,
        user_prompt,
        structure_hints(blocks)
    )
}

/// Prompt asking for one paragraph that fuses the given blocks.
pub fn blend_prompt(blocks: &[ExplanationBlock]) -> String {
    let listing = blocks
        .iter()
        .map(|b| format!("({}) - {}", b.block_type, b.description))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n\nBlocks:\n{}", BLEND_PREAMBLE, listing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockId;

    fn block(kind: &str, desc: &str) -> ExplanationBlock {
        ExplanationBlock {
            id: BlockId::new(format!("id-{}", kind)),
            block_type: kind.to_string(),
            description: desc.to_string(),
            icon: String::new(),
            color: "#cccccc".to_string(),
            full_text: None,
        }
    }

    #[test]
    fn test_generate_prompt_contains_prompt_and_hints() {
        let blocks = vec![block("Claim", "State it"), block("Example", "Show it")];
        let prompt = generate_prompt("Rust lifetimes", &blocks);
        assert!(prompt.starts_with("You are an excellent explainer"));
        assert!(prompt.contains("Prompt: \"Rust lifetimes\""));
        assert!(prompt.ends_with("Structure Hints:\n- State it\n- Show it"));
    }

    #[test]
    fn test_blend_prompt_lists_blocks() {
        let blocks = vec![block("X", "first"), block("Y", "second")];
        let prompt = blend_prompt(&blocks);
        assert!(prompt.contains("Blocks:\n(X) - first\n(Y) - second"));
        assert!(prompt.contains("explain in English"));
    }
}
