//! Prompt templates and rendering.
//!
//! Templates use `{name}` placeholders with plain substitution. Rendered
//! prompts are ephemeral: computed per request, never persisted.

/// Template used for retrieval-augmented answers.
pub const RAG_TEMPLATE: &str = "\
<INST>You are an AI assistant answering questions about uploaded documents. \
Use only the information in the context below. If the answer is not in the \
context, do not guess, just say \"I don't know\".</INST>
context:
{context}

question: {question}
";

/// Substitute `{name}` placeholders in `template`.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in vars {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

/// Assemble the RAG prompt from retrieved chunk texts and the question.
pub fn rag_prompt(context: &[String], question: &str) -> String {
    let joined = context.join("\n\n");
    render(
        RAG_TEMPLATE,
        &[("context", joined.as_str()), ("question", question)],
    )
}
