/// Permissive substring predicate used for library and file matching.
///
/// `"quer"` matches `"jquery"`; an empty fragment matches every candidate.
pub fn contains_fragment<'a, I>(candidates: I, fragment: &str) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    candidates.into_iter().any(|candidate| candidate.contains(fragment))
}

/// Last `/`-separated segment of a path or URL
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
