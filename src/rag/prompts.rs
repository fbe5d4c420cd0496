use crate::models::RetrievedChunk;

pub const ANSWER_SYSTEM_INSTRUCTION: &str = "You are a helpful assistant. Answer the user query ONLY using the provided context. \
If the answer is not in the context, state that you do not know.";

pub const EVAL_SYSTEM_INSTRUCTION: &str = "You are a strict QA auditor. You will be given a User Query, the Context that was retrieved \
from a knowledge base, and the Generated Answer produced by another AI.\n\n\
Your task:\n\
1. Hallucination Check - Does the answer contain any facts or claims NOT supported by the context?\n\
2. Relevance Check - Does the answer actually address the user query?\n\n\
Respond ONLY with a JSON object (no markdown fences) in this exact schema:\n\
{\"score\": <int 1-10>, \"verdict\": \"<Pass or Fail>\", \"reasoning\": \"<brief explanation>\"}\n\n\
Scoring guide:\n\
9-10 = Fully grounded in context, directly answers the query.\n\
7-8 = Mostly grounded, minor gaps or slight tangents.\n\
4-6 = Partially grounded; some unsupported claims or only partially relevant.\n\
1-3 = Mostly hallucinated or off-topic.\n\
Verdict: Pass if score >= 7, else Fail.";

pub fn build_answer_prompt(query: &str, chunks: &[RetrievedChunk]) -> String {
    let context_block = chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| format!("[Chunk {}]\n{}", i + 1, chunk.content))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("Context:\n{context_block}\n\nUser Query: {query}\n\nAnswer:")
}

pub fn build_eval_prompt(query: &str, context: &str, answer: &str) -> String {
    format!(
        "User Query:\n{query}\n\nRetrieved Context:\n{context}\n\nGenerated Answer:\n{answer}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_prompt_numbers_chunks() {
        let chunks = vec![
            RetrievedChunk {
                content: "alpha".to_string(),
                similarity: 0.9,
                metadata: None,
            },
            RetrievedChunk {
                content: "beta".to_string(),
                similarity: 0.7,
                metadata: None,
            },
        ];
        assert_eq!(
            build_answer_prompt("what?", &chunks),
            "Context:\n[Chunk 1]\nalpha\n\n[Chunk 2]\nbeta\n\nUser Query: what?\n\nAnswer:"
        );
    }

    #[test]
    fn test_eval_prompt_layout() {
        let prompt = build_eval_prompt("q", "ctx", "ans");
        assert_eq!(prompt, "User Query:\nq\n\nRetrieved Context:\nctx\n\nGenerated Answer:\nans");
    }
}
