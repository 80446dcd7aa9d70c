/// Assemble the generator prompt from retrieved chunks (nearest first) and
/// the user's question.
pub fn build_prompt<S: AsRef<str>>(context_chunks: &[S], query: &str) -> String {
    let context = context_chunks.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ");
    format!("Context: {context}\n\nQuestion: {query}\nAnswer:")
}

/// The context block of a prompt produced by [`build_prompt`], if it has one.
pub fn context_of(prompt: &str) -> Option<&str> {
    let rest = prompt.strip_prefix("Context: ")?;
    let end = rest.rfind("\n\nQuestion: ")?;
    Some(&rest[..end])
}
