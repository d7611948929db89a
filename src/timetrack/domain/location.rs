//! Assignment location parsing.

/// Remote project and assignment identifiers extracted from a location path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentLocation {
    /// Remote project identifier.
    pub project_id: u64,
    /// Remote task assignment identifier.
    pub assignment_id: u64,
}

/// Parses a provider `Location` path of the form
/// `/projects/{project}/task_assignments/{assignment}`.
///
/// Segment names are matched case-insensitively; a scheme and host prefix,
/// extra segments, or non-numeric identifiers all yield `None`.
#[must_use]
pub fn parse_assignment_location(path: &str) -> Option<AssignmentLocation> {
    let mut segments = path.trim_start_matches('/').split('/');
    if !segments.next()?.eq_ignore_ascii_case("projects") {
        return None;
    }
    let project_id = segments.next()?.parse().ok()?;
    if !segments.next()?.eq_ignore_ascii_case("task_assignments") {
        return None;
    }
    let assignment_id = segments.next()?.parse().ok()?;
    if segments.next().is_some() {
        return None;
    }
    Some(AssignmentLocation {
        project_id,
        assignment_id,
    })
}
